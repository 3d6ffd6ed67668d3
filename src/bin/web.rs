//! Single binary JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use tournament_engine::logic::{registry, standings};
use tournament_engine::{
    advance_round, bracket_rounds, finish_tournament, import_registrations, report_result,
    start_tournament, GameRecord, MatchId, MatchResult, ParticipantId, SideScore, SwapError,
    SwapRequest, Tournament, TournamentConfig, TournamentError, TournamentId, TournamentStore,
};

type AppState = Data<TournamentStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default = "default_tournament_name")]
    name: String,
    #[serde(default)]
    config: TournamentConfig,
}

fn default_tournament_name() -> String {
    "Tournament".to_string()
}

#[derive(Deserialize)]
struct AddRegistrationBody {
    name: String,
    #[serde(default)]
    faction: Option<String>,
}

#[derive(Deserialize)]
struct CheckInBody {
    #[serde(default = "default_checked_in")]
    checked_in: bool,
}

fn default_checked_in() -> bool {
    true
}

#[derive(Deserialize)]
struct ScoresBody {
    #[serde(default)]
    a: Option<SideScore>,
    #[serde(default)]
    b: Option<SideScore>,
}

#[derive(Deserialize)]
struct ReportResultBody {
    result: MatchResult,
    #[serde(default)]
    scores: Option<ScoresBody>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id.
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::StoreUnavailable => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Run a mutating engine operation and answer with the updated tournament.
fn mutate<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let result = state.transaction(id, |t| {
        f(t)?;
        Ok::<_, TournamentError>(t.clone())
    });
    match result {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-engine",
    })
}

/// Registered pairing, primary and tie-break strategies (key -> label).
#[get("/api/strategies")]
async fn api_strategies() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "pairing": registry::pairing_strategies(),
        "primary": registry::primary_strategies(),
        "tiebreak": registry::tiebreak_strategies(),
    }))
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let (name, config) = match body {
        Some(b) => {
            let b = b.into_inner();
            (b.name, b.config)
        }
        None => (default_tournament_name(), TournamentConfig::default()),
    };
    let tournament = Tournament::new(name, config);
    let response = HttpResponse::Ok().json(&tournament);
    match state.insert(tournament) {
        Ok(_) => response,
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.snapshot(path.id) {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => error_response(&e),
    }
}

/// Register a participant (Setup or Running).
#[post("/api/tournaments/{id}/registrations")]
async fn api_add_registration(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddRegistrationBody>,
) -> HttpResponse {
    let body = body.into_inner();
    mutate(&state, path.id, |t| {
        t.add_registration(body.name, body.faction).map(|_| ())
    })
}

/// Bulk registration from a CSV body with header `name,faction,checked_in`.
#[post("/api/tournaments/{id}/registrations/import")]
async fn api_import_registrations(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    mutate(&state, path.id, |t| import_registrations(t, body.as_bytes()).map(|_| ()))
}

#[put("/api/tournaments/{id}/registrations/{participant_id}/check-in")]
async fn api_check_in(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Option<Json<CheckInBody>>,
) -> HttpResponse {
    let checked_in = body.map_or_else(default_checked_in, |b| b.checked_in);
    mutate(&state, path.id, |t| t.set_checked_in(path.participant_id, checked_in))
}

/// Start the tournament (Setup -> Running; builds the bracket for elimination).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, start_tournament)
}

#[post("/api/tournaments/{id}/finish")]
async fn api_finish_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, finish_tournament)
}

/// Pair and create the next round (Swiss/open).
#[post("/api/tournaments/{id}/rounds")]
async fn api_advance_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, |t| advance_round(t).map(|_| ()))
}

#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let game = body.scores.map(|s| GameRecord::new(s.a, s.b));
    mutate(&state, path.id, |t| report_result(t, path.match_id, body.result, game))
}

/// Swap failures are expected outcomes: answered as `{ ok: false, error: kind }`.
#[post("/api/tournaments/{id}/swap")]
async fn api_swap(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SwapRequest>,
) -> HttpResponse {
    let result = state.transaction(path.id, |t| Ok::<_, TournamentError>(body.apply(t)));
    match result {
        Ok(Ok(outcome)) => {
            HttpResponse::Ok().json(serde_json::json!({ "ok": true, "outcome": outcome }))
        }
        Ok(Err(e)) => swap_error_response(e),
        Err(e) => error_response(&e),
    }
}

fn swap_error_response(e: SwapError) -> HttpResponse {
    log::info!("Swap rejected: {}", e);
    HttpResponse::UnprocessableEntity().json(serde_json::json!({
        "ok": false,
        "error": e.kind(),
        "message": e.to_string(),
    }))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.snapshot(path.id) {
        Ok(t) => HttpResponse::Ok().json(standings::compute(&t)),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.snapshot(path.id) {
        Ok(t) => HttpResponse::Ok().json(bracket_rounds(&t)),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(TournamentStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_strategies)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_registration)
            .service(api_import_registrations)
            .service(api_check_in)
            .service(api_start_tournament)
            .service(api_finish_tournament)
            .service(api_advance_round)
            .service(api_report_result)
            .service(api_swap)
            .service(api_standings)
            .service(api_bracket)
    })
    .bind(bind)?
    .run()
    .await
}
