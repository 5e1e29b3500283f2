//! Single binary web server: JSON API for pool play scheduling and playoff brackets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, INACTIVITY_HOURS (tournament cleanup, default 12).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::time::Duration;
use tournament_scheduler_web::{
    generate_playoff_brackets, import_teams_csv, pool_completion_status, record_match_result,
    schedule_pool_play, Advancement, ErrorKind, InMemoryStore, MatchScore, ScheduleOptions, Team,
    TeamId, Tournament, TournamentError, TournamentId, TournamentSettings, TournamentStore,
};
use uuid::Uuid;

/// All tournaments in memory. Entries are purged after a period of inactivity.
type AppState = Data<InMemoryStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    settings: TournamentSettings,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    #[serde(default)]
    skill_level: Option<String>,
}

#[derive(Deserialize)]
struct CheckInBody {
    checked_in: bool,
}

#[derive(Deserialize)]
struct GenerateBracketsBody {
    #[serde(default)]
    teams_per_pool: Option<Advancement>,
}

#[derive(serde::Serialize)]
struct BracketsResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and team id
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Internal => HttpResponse::InternalServerError().json(body),
        ErrorKind::Input | ErrorKind::IncompleteData | ErrorKind::InvalidState => {
            HttpResponse::BadRequest().json(body)
        }
    }
}

fn load(state: &AppState, id: TournamentId) -> Result<Tournament, TournamentError> {
    state
        .tournament(id)?
        .ok_or(TournamentError::TournamentNotFound(id))
}

/// Change a tournament under the store lock and respond with the updated tournament.
fn update_tournament(
    state: &AppState,
    id: TournamentId,
    mut change: impl FnMut(&mut Tournament) -> Result<(), TournamentError>,
) -> HttpResponse {
    match state.update_tournament(id, &mut change) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-scheduler-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = Tournament::new(body.name.trim(), body.settings);
    match state.save_tournament(tournament.clone()) {
        Ok(()) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(&TournamentError::from(e)),
    }
}

/// Get a tournament by id (404 if not found). Touching it refreshes its activity time.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match load(&state, path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Register one team.
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<TournamentPath>, body: Json<AddTeamBody>) -> HttpResponse {
    let body = body.into_inner();
    let skill_level = body.skill_level.filter(|s| !s.trim().is_empty());
    update_tournament(&state, path.id, |t| {
        let mut team = Team::new(body.name.as_str());
        team.skill_level = skill_level.clone();
        t.add_team(team).map(|_| ())
    })
}

/// Register teams from a CSV body (`name,skill_level,checked_in`).
#[post("/api/tournaments/{id}/teams/import")]
async fn api_import_teams(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        for team in import_teams_csv(body.as_bytes())? {
            t.add_team(team)?;
        }
        Ok(())
    })
}

/// Mark a team as checked in (or not). Only checked-in teams are scheduled.
#[put("/api/tournaments/{id}/teams/{team_id}/check-in")]
async fn api_check_in(
    state: AppState,
    path: Path<TournamentTeamPath>,
    body: Json<CheckInBody>,
) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.set_checked_in(path.team_id, body.checked_in))
}

/// Generate and store pool play (replaces an earlier schedule with no results).
#[post("/api/tournaments/{id}/schedule")]
async fn api_generate_schedule(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<ScheduleOptions>>,
) -> HttpResponse {
    let options = body.map(Json::into_inner).unwrap_or_default();
    match schedule_pool_play(state.get_ref(), path.id, options, &mut rand::thread_rng()) {
        Ok(scheduled) => HttpResponse::Ok().json(scheduled),
        Err(e) => error_response(&e),
    }
}

/// All matches of a tournament (pool play then playoffs, in creation order).
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = load(&state, path.id)
        .and_then(|_| state.matches(path.id, None).map_err(TournamentError::from));
    match result {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Enter a match result. Playoff winners are moved into the next round.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<MatchScore>,
) -> HttpResponse {
    let belongs = state
        .get_match(path.match_id)
        .map(|m| m.is_some_and(|m| m.tournament_id == path.id));
    match belongs {
        Ok(true) => {}
        Ok(false) => return error_response(&TournamentError::MatchNotFound(path.match_id)),
        Err(e) => return error_response(&TournamentError::from(e)),
    }
    match record_match_result(state.get_ref(), path.match_id, body.into_inner()) {
        Ok(recorded) => HttpResponse::Ok().json(recorded),
        Err(e) => error_response(&e),
    }
}

/// Per-pool progress and standings; `ready_for_brackets` once all pools are done.
#[get("/api/tournaments/{id}/pools/status")]
async fn api_pool_status(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match pool_completion_status(state.get_ref(), path.id) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => error_response(&e),
    }
}

/// Seed and create playoff brackets from final pool standings.
#[post("/api/tournaments/{id}/brackets")]
async fn api_generate_brackets(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<GenerateBracketsBody>>,
) -> HttpResponse {
    let advancement = body.and_then(|b| b.teams_per_pool);
    match generate_playoff_brackets(state.get_ref(), path.id, advancement) {
        Ok(generated) => HttpResponse::Ok().json(BracketsResponse {
            success: true,
            message: Some(generated.message()),
            error: None,
        }),
        Err(e) => {
            log::warn!("Bracket generation failed for tournament {}: {}", path.id, e);
            let mut status = match e.kind() {
                ErrorKind::NotFound => HttpResponse::NotFound(),
                ErrorKind::Internal => HttpResponse::InternalServerError(),
                _ => HttpResponse::BadRequest(),
            };
            status.json(BracketsResponse {
                success: false,
                message: None,
                error: Some(e.to_string()),
            })
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let inactivity_hours: u64 = std::env::var("INACTIVITY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let inactivity_timeout = Duration::from_secs(inactivity_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(InMemoryStore::new());

    // Background task: every 30 minutes, remove inactive tournaments
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            match state_cleanup.purge_inactive(inactivity_timeout) {
                Ok(0) => {}
                Ok(removed) => log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    removed,
                    inactivity_hours
                ),
                Err(e) => log::warn!("Tournament cleanup skipped: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_team)
            .service(api_import_teams)
            .service(api_check_in)
            .service(api_generate_schedule)
            .service(api_list_matches)
            .service(api_record_result)
            .service(api_pool_status)
            .service(api_generate_brackets)
    })
    .bind(bind)?
    .run()
    .await
}
