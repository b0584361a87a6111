//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Game settings come from COURT_CAPACITY, HALF_MINUTES, MAX_ROSTER_SIZE.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use rotation_planner_web::{
    generate_plan, playtime_csv, rotation_csv, shuffle_roster, ExportError, GameSettings,
    PlanOutput, RotationPlan, Roster, RosterId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-roster entry: roster data + last activity time (for auto-cleanup).
struct RosterEntry {
    roster: Roster,
    last_activity: Instant,
}

/// In-memory state: rosters by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<RosterId, RosterEntry>>>;

type Settings = Data<GameSettings>;

/// Inactivity threshold: rosters not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Session key holding the browser's roster id.
const SESSION_ROSTER_KEY: &str = "roster_id";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct PlanResponse<'a> {
    plan: &'a PlanOutput,
    message: Option<String>,
}

#[derive(Deserialize, Default)]
struct CreateRosterBody {
    #[serde(default)]
    names: Vec<String>,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SetSelectedBody {
    selected: bool,
}

/// Path segment: roster id (e.g. /api/rosters/{id})
#[derive(Deserialize)]
struct RosterPath {
    id: RosterId,
}

/// Path segments: roster id and player name (e.g. /api/rosters/{id}/players/{name})
#[derive(Deserialize)]
struct RosterPlayerPath {
    id: RosterId,
    name: String,
}

fn error_json(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

/// Look up a roster, refresh its activity time, and run `f` on it.
fn with_roster<F>(state: &AppState, id: RosterId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Roster) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.roster)
        }
        None => HttpResponse::NotFound().json(error_json("No roster")),
    }
}

/// Store a roster and remember it in the browser session.
fn insert_roster(state: &AppState, session: &Session, roster: Roster) -> HttpResponse {
    let id = roster.id;
    if let Err(e) = session.insert(SESSION_ROSTER_KEY, id) {
        log::warn!("Could not store roster id in session: {}", e);
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&roster);
    g.insert(
        id,
        RosterEntry {
            roster,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Run the planner on the roster's active players.
fn plan_for(roster: &Roster, settings: &GameSettings) -> Result<PlanOutput, HttpResponse> {
    let active = roster.active_players();
    generate_plan(&active, settings).map_err(|e| HttpResponse::BadRequest().json(error_json(e)))
}

/// CSV download of a plan; only full rotations have anything to export.
fn csv_response<F>(roster: &Roster, settings: &GameSettings, filename: &str, render: F) -> HttpResponse
where
    F: FnOnce(&RotationPlan) -> Result<String, ExportError>,
{
    let output = match plan_for(roster, settings) {
        Ok(output) => output,
        Err(resp) => return resp,
    };
    let plan = match output.rotation() {
        Some(plan) => plan,
        None => {
            let message = output.message().unwrap_or_default();
            return HttpResponse::BadRequest().json(error_json(message));
        }
    };
    match render(plan) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(body),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(error_json(e))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "rotation-planner-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Court capacity, game length and roster limit the server plans with.
#[get("/api/settings")]
async fn api_settings(settings: Settings) -> HttpResponse {
    HttpResponse::Ok().json(settings.get_ref())
}

/// The browser's roster (from the session cookie). Creates a starter roster if missing or expired.
#[get("/api/rosters/current")]
async fn api_current_roster(state: AppState, settings: Settings, session: Session) -> HttpResponse {
    let id = match session.get::<RosterId>(SESSION_ROSTER_KEY) {
        Ok(id) => id,
        Err(e) => {
            log::warn!("Unreadable session, starting a new roster: {}", e);
            None
        }
    };
    if let Some(id) = id {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        if let Some(entry) = g.get_mut(&id) {
            entry.last_activity = Instant::now();
            return HttpResponse::Ok().json(&entry.roster);
        }
    }
    insert_roster(&state, &session, Roster::starter(settings.max_roster_size()))
}

/// Create a new roster (optionally from names); it becomes the session's roster.
#[post("/api/rosters")]
async fn api_create_roster(
    state: AppState,
    settings: Settings,
    session: Session,
    body: Option<Json<CreateRosterBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner).unwrap_or_default();
    match Roster::with_names(&body.names, settings.max_roster_size()) {
        Ok(roster) => {
            log::info!("Created roster {} with {} player(s)", roster.id, roster.len());
            insert_roster(&state, &session, roster)
        }
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Get a roster by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/rosters/{id}")]
async fn api_get_roster(state: AppState, path: Path<RosterPath>) -> HttpResponse {
    with_roster(&state, path.id, |r| HttpResponse::Ok().json(&*r))
}

/// Add a player (selected by default).
#[post("/api/rosters/{id}/players")]
async fn api_add_player(state: AppState, path: Path<RosterPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    with_roster(&state, path.id, |r| match r.add_player(body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(&*r),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    })
}

/// Remove a player by name.
#[delete("/api/rosters/{id}/players/{name}")]
async fn api_remove_player(state: AppState, path: Path<RosterPlayerPath>) -> HttpResponse {
    with_roster(&state, path.id, |r| match r.remove_player(&path.name) {
        Ok(()) => HttpResponse::Ok().json(&*r),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    })
}

/// Select or deselect a player for the next plan.
#[put("/api/rosters/{id}/players/{name}/selected")]
async fn api_set_selected(
    state: AppState,
    path: Path<RosterPlayerPath>,
    body: Json<SetSelectedBody>,
) -> HttpResponse {
    with_roster(&state, path.id, |r| match r.set_selected(&path.name, body.selected) {
        Ok(()) => HttpResponse::Ok().json(&*r),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    })
}

/// Randomize roster order. Does not regenerate the plan; the client asks for that separately.
#[post("/api/rosters/{id}/shuffle")]
async fn api_shuffle(state: AppState, path: Path<RosterPath>) -> HttpResponse {
    with_roster(&state, path.id, |r| {
        shuffle_roster(r);
        HttpResponse::Ok().json(&*r)
    })
}

/// Generate the substitution plan for the roster's selected players.
#[post("/api/rosters/{id}/plan")]
async fn api_generate_plan(state: AppState, settings: Settings, path: Path<RosterPath>) -> HttpResponse {
    with_roster(&state, path.id, |r| match plan_for(r, &settings) {
        Ok(output) => {
            log::info!(
                "Roster {}: plan with {} period(s) for {} active player(s)",
                r.id,
                output.periods().len(),
                r.active_players().len()
            );
            HttpResponse::Ok().json(PlanResponse {
                message: output.message(),
                plan: &output,
            })
        }
        Err(resp) => resp,
    })
}

/// Rotation table as CSV.
#[get("/api/rosters/{id}/plan.csv")]
async fn api_plan_csv(state: AppState, settings: Settings, path: Path<RosterPath>) -> HttpResponse {
    with_roster(&state, path.id, |r| {
        csv_response(r, &settings, "rotation.csv", rotation_csv)
    })
}

/// Playtime summary as CSV.
#[get("/api/rosters/{id}/playtime.csv")]
async fn api_playtime_csv(state: AppState, settings: Settings, path: Path<RosterPath>) -> HttpResponse {
    with_roster(&state, path.id, |r| {
        csv_response(r, &settings, "playtime.csv", playtime_csv)
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Signing key for the session cookie: SESSION_KEY (at least 64 bytes) or a per-process random key.
fn session_key() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(raw) => match Key::try_from(raw.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                log::warn!("SESSION_KEY must be at least 64 bytes; using a random key");
                Key::generate()
            }
        },
        Err(_) => Key::generate(),
    }
}

/// Cookie session holding the roster id. Not `Secure` so plain-HTTP deployments keep working.
fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

/// JSON and CSV endpoints.
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(favicon)
        .service(api_settings)
        // before /api/rosters/{id} so "current" is not parsed as an id
        .service(api_current_roster)
        .service(api_create_roster)
        .service(api_get_roster)
        .service(api_add_player)
        .service(api_remove_player)
        .service(api_set_selected)
        .service(api_shuffle)
        .service(api_generate_plan)
        .service(api_plan_csv)
        .service(api_playtime_csv);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = GameSettings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    log::info!(
        "Planning {}-a-side games of {} minutes, up to {} players per roster",
        settings.court_capacity(),
        settings.total_minutes(),
        settings.max_roster_size()
    );

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<RosterId, RosterEntry>::new()));
    let settings = Data::new(settings);
    let key = session_key();

    // Background task: every 30 minutes, remove rosters inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive roster(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(key.clone()))
            .app_data(state.clone())
            .app_data(settings.clone())
            .route("/", web::get().to(serve_index_async))
            .configure(api_routes)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(session_middleware(Key::generate()))
                    .app_data(Data::new(RwLock::new(HashMap::<RosterId, RosterEntry>::new())))
                    .app_data(Data::new(GameSettings::default()))
                    .configure(api_routes),
            )
            .await
        };
    }

    macro_rules! create_roster {
        ($app:expr, $names:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/rosters")
                .set_json(json!({ "names": $names }))
                .to_request();
            let roster: Roster = test::call_and_read_body_json(&$app, req).await;
            roster
        }};
    }

    fn plan_request(id: RosterId) -> actix_web::test::TestRequest {
        test::TestRequest::post().uri(&format!("/api/rosters/{}/plan", id))
    }

    #[actix_web::test]
    async fn settings_endpoint_reports_defaults() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/api/settings").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["court_capacity"], 5);
        assert_eq!(body["half_minutes"], 20.0);
        assert_eq!(body["max_roster_size"], 10);
    }

    #[actix_web::test]
    async fn created_roster_carries_timestamps() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/rosters")
            .set_json(json!({ "names": ["A", "B"] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["players"].as_array().map(Vec::len), Some(2));
        assert!(body["created_at"].is_string());
        assert!(body["updated_at"].is_string());
    }

    #[actix_web::test]
    async fn too_few_players_is_a_bad_request() {
        let app = test_app!();
        let roster = create_roster!(app, ["A", "B", "C", "D"]);
        let resp = test::call_service(&app, plan_request(roster.id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("at least 5"));
    }

    #[actix_web::test]
    async fn full_lineup_returns_message_and_no_periods() {
        let app = test_app!();
        let roster = create_roster!(app, ["A", "B", "C", "D", "E"]);
        let resp = test::call_service(&app, plan_request(roster.id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["plan"]["kind"], "no_rotation_needed");
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn rotation_plan_lists_periods() {
        let app = test_app!();
        let roster = create_roster!(app, ["A", "B", "C", "D", "E", "F"]);
        let body: Value =
            test::call_and_read_body_json(&app, plan_request(roster.id).to_request()).await;
        assert_eq!(body["plan"]["kind"], "rotation");
        assert_eq!(body["plan"]["periods"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["plan"]["periods"][0]["bench"], json!(["F"]));
        assert!(body["message"].is_null());
    }

    #[actix_web::test]
    async fn deselecting_a_player_changes_the_plan() {
        let app = test_app!();
        let roster = create_roster!(app, ["A", "B", "C", "D", "E", "F"]);
        let req = test::TestRequest::put()
            .uri(&format!("/api/rosters/{}/players/F/selected", roster.id))
            .set_json(json!({ "selected": false }))
            .to_request();
        let updated: Roster = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.active_players().len(), 5);

        let body: Value =
            test::call_and_read_body_json(&app, plan_request(roster.id).to_request()).await;
        assert_eq!(body["plan"]["kind"], "no_rotation_needed");
    }

    #[actix_web::test]
    async fn unknown_roster_is_not_found() {
        let app = test_app!();
        let id = RosterId::new_v4();
        let req = test::TestRequest::get()
            .uri(&format!("/api/rosters/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, plan_request(id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn duplicate_or_blank_names_are_rejected() {
        let app = test_app!();
        let roster = create_roster!(app, ["Ava"]);
        for name in ["ava", "   "] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/rosters/{}/players", roster.id))
                .set_json(json!({ "name": name }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "name {:?}", name);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn names_with_reserved_characters_can_be_removed() {
        let app = test_app!();
        let roster = create_roster!(app, ["A/B", "C+D", "E%F", "G H"]);
        for encoded in ["A%2FB", "C%2BD", "E%25F", "G%20H"] {
            let req = test::TestRequest::delete()
                .uri(&format!("/api/rosters/{}/players/{}", roster.id, encoded))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", encoded);
        }
        let req = test::TestRequest::get()
            .uri(&format!("/api/rosters/{}", roster.id))
            .to_request();
        let after: Roster = test::call_and_read_body_json(&app, req).await;
        assert!(after.is_empty());
    }

    #[actix_web::test]
    async fn shuffle_returns_the_roster_without_a_plan() {
        let app = test_app!();
        let roster = create_roster!(app, ["A", "B", "C", "D", "E", "F"]);
        let req = test::TestRequest::post()
            .uri(&format!("/api/rosters/{}/shuffle", roster.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.get("plan").is_none());
        assert!(body.get("periods").is_none());
        let mut names: Vec<&str> = body["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[actix_web::test]
    async fn csv_needs_a_rotation() {
        let app = test_app!();
        let lineup = create_roster!(app, ["A", "B", "C", "D", "E"]);
        for path in ["plan.csv", "playtime.csv"] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/rosters/{}/{}", lineup.id, path))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
        }

        let squad = create_roster!(app, ["A", "B", "C", "D", "E", "F"]);
        let req = test::TestRequest::get()
            .uri(&format!("/api/rosters/{}/plan.csv", squad.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/csv"));
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"half,start,end,on_court,bench"));
    }

    #[actix_web::test]
    async fn current_roster_is_remembered_by_the_session() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/api/rosters/current").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();
        let first: Roster = test::read_body_json(resp).await;
        assert_eq!(first.names(), vec!["Player 1"]);

        let req = test::TestRequest::get()
            .uri("/api/rosters/current")
            .cookie(cookie)
            .to_request();
        let second: Roster = test::call_and_read_body_json(&app, req).await;
        assert_eq!(second.id, first.id);
    }
}
