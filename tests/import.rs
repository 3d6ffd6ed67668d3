//! CSV registration import.

use tournament_engine::{
    import_registrations, CheckInStatus, Tournament, TournamentConfig, TournamentError,
};

#[test]
fn imports_rows_with_optional_columns() {
    let mut t = Tournament::new("Import", TournamentConfig::default());
    let csv = "name,faction,checked_in\nAlice,Orks,yes\nBob,,\n  Carol , Elves ,false\n";
    let added = import_registrations(&mut t, csv.as_bytes()).unwrap();
    assert_eq!(added, 3);

    let alice = &t.registrations[0];
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.faction.as_deref(), Some("Orks"));
    assert_eq!(alice.status, CheckInStatus::CheckedIn);

    let bob = &t.registrations[1];
    assert_eq!(bob.faction, None);
    assert_eq!(bob.status, CheckInStatus::Pending);

    let carol = &t.registrations[2];
    assert_eq!(carol.name, "Carol");
    assert_eq!(carol.faction.as_deref(), Some("Elves"));
    assert_eq!(carol.status, CheckInStatus::Pending);
}

#[test]
fn name_only_csv_is_accepted() {
    let mut t = Tournament::new("Import", TournamentConfig::default());
    let added = import_registrations(&mut t, "name\nAlice\nBob\n".as_bytes()).unwrap();
    assert_eq!(added, 2);
}

#[test]
fn duplicate_row_rejects_whole_import() {
    let mut t = Tournament::new("Import", TournamentConfig::default());
    let err = import_registrations(&mut t, "name\nAlice\nBob\nalice\n".as_bytes()).unwrap_err();
    assert!(matches!(err, TournamentError::Import { line: 4, .. }));
    assert!(t.registrations.is_empty());
}

#[test]
fn clashes_with_existing_registrations_are_reported() {
    let mut t = Tournament::new("Import", TournamentConfig::default());
    t.add_registration("Alice", None).unwrap();
    let err = import_registrations(&mut t, "name\nALICE\n".as_bytes()).unwrap_err();
    assert!(matches!(err, TournamentError::Import { line: 2, .. }));
    assert_eq!(t.registrations.len(), 1);
}
