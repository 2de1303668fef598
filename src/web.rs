use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_files::Files;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::export::person_csv_bytes;
use crate::parser::{input_errors, load_roster, load_roster_from_reader, Roster};
use crate::schedule::summary::{group_headcount, person_load, slot_availability, PersonLoad, SlotAvailability};
use crate::schedule::{generate_shift, JobConfig, ShiftOutcome};

/// The uploaded roster is the only shared state. Every generate request
/// builds its own scheduling state from a copy of it.
pub struct AppState {
    pub roster: Mutex<Option<Roster>>,
}

impl AppState {
    pub fn new(roster: Option<Roster>) -> Self {
        Self { roster: Mutex::new(roster) }
    }
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    jobs: Vec<JobConfig>,
}

#[derive(Serialize)]
pub struct RosterResponse {
    people: usize,
    time_slots: Vec<String>,
    availability: Vec<SlotAvailability>,
    groups: BTreeMap<String, u32>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    generated_at: DateTime<Utc>,
    time_slots: Vec<String>,
    jobs: Vec<String>,
    assignments: HashMap<String, HashMap<String, Vec<String>>>,
    warnings: Vec<String>,
    load: Vec<PersonLoad>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    errors: Vec<String>,
}

fn current_roster(state: &AppState) -> Result<Option<Roster>> {
    let guard = state
        .roster
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("roster lock poisoned"))?;
    Ok(guard.clone())
}

fn roster_summary(roster: &Roster) -> RosterResponse {
    RosterResponse {
        people: roster.people.len(),
        time_slots: roster.time_slots.clone(),
        availability: slot_availability(&roster.people, &roster.time_slots),
        groups: group_headcount(&roster.people),
    }
}

/// Validates the request and runs the scheduler, or returns the 400 body
fn run_generate(state: &AppState, req: GenerateRequest) -> Result<std::result::Result<(Roster, ShiftOutcome), ErrorResponse>> {
    let roster = match current_roster(state)? {
        Some(roster) => roster,
        None => {
            return Ok(Err(ErrorResponse { errors: vec!["no roster has been uploaded".to_string()] }));
        }
    };

    // Rows left blank in the form are not jobs
    let jobs: Vec<JobConfig> = req
        .jobs
        .into_iter()
        .filter(|j| !j.name.trim().is_empty())
        .map(|j| JobConfig::new(j.name.trim(), j.required))
        .collect();

    let errors = input_errors(&jobs, &roster.time_slots);
    if !errors.is_empty() {
        warn!(errors = errors.len(), "generate request rejected");
        return Ok(Err(ErrorResponse { errors }));
    }

    let outcome = generate_shift(&roster.people, &jobs, &roster.time_slots);
    Ok(Ok((roster, outcome)))
}

// Roster upload endpoint, body is CSV
async fn upload_roster(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    match load_roster_from_reader(body.as_ref()) {
        Ok(roster) => {
            info!(people = roster.people.len(), time_slots = roster.time_slots.len(), "roster uploaded");
            let summary = roster_summary(&roster);
            let mut guard = state
                .roster
                .lock()
                .map_err(|_| actix_web::error::ErrorInternalServerError("roster lock poisoned"))?;
            *guard = Some(roster);
            Ok(HttpResponse::Ok().json(summary))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(ErrorResponse { errors: vec![e.to_string()] })),
    }
}

async fn get_roster(state: web::Data<AppState>) -> Result<HttpResponse> {
    match current_roster(&state)? {
        Some(roster) => Ok(HttpResponse::Ok().json(roster_summary(&roster))),
        None => Ok(HttpResponse::NotFound().json(ErrorResponse { errors: vec!["no roster has been uploaded".to_string()] })),
    }
}

async fn generate(req: web::Json<GenerateRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match run_generate(&state, req.into_inner())? {
        Ok((roster, outcome)) => Ok(HttpResponse::Ok().json(GenerateResponse {
            generated_at: Utc::now(),
            load: person_load(&roster.people, &outcome),
            warnings: outcome.warning_messages(),
            time_slots: outcome.time_slots,
            jobs: outcome.jobs,
            assignments: outcome.assignments,
        })),
        Err(body) => Ok(HttpResponse::BadRequest().json(body)),
    }
}

async fn download(req: web::Json<GenerateRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match run_generate(&state, req.into_inner())? {
        Ok((roster, outcome)) => {
            let bytes = person_csv_bytes(&roster.people, &outcome)
                .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to build CSV: {}", e)))?;
            Ok(HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename("shift_output.csv".to_string())],
                })
                .body(bytes))
        }
        Err(body) => Ok(HttpResponse::BadRequest().json(body)),
    }
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/roster", web::get().to(get_roster))
        .route("/api/roster", web::post().to(upload_roster))
        .route("/api/generate", web::post().to(generate))
        .route("/api/generate/download", web::post().to(download));
}

pub async fn start_server(port: u16, roster_path: &Path) -> std::io::Result<()> {
    // A missing roster is fine, one can be uploaded later
    let roster = if roster_path.exists() {
        match load_roster(roster_path) {
            Ok(roster) => {
                info!(path = %roster_path.display(), people = roster.people.len(), "roster loaded");
                Some(roster)
            }
            Err(e) => {
                warn!(path = %roster_path.display(), error = %e, "could not load roster");
                None
            }
        }
    } else {
        None
    };

    let app_state = web::Data::new(AppState::new(roster));

    info!(port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    const ROSTER: &str = "name,grade,group,09-10,10-11\nSato,4,Events,〇,〇\nAki,1,Press,〇,〇\nBen,2,Press,〇,〇\n";

    fn app_state(roster: Option<Roster>) -> web::Data<AppState> {
        web::Data::new(AppState::new(roster))
    }

    fn sample_roster() -> Roster {
        load_roster_from_reader(ROSTER.as_bytes()).unwrap()
    }

    #[actix_web::test]
    async fn test_upload_then_generate() {
        let state = app_state(None);
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/api/roster").set_payload(ROSTER).to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["people"], 3);
        assert_eq!(resp["time_slots"], serde_json::json!(["09-10", "10-11"]));

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({"jobs": [{"name": "Gate", "required": 2}, {"name": " ", "required": 0}]}))
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["jobs"], serde_json::json!(["Gate"]));
        assert_eq!(resp["assignments"]["09-10"]["Gate"], serde_json::json!(["Sato", "Aki"]));
        assert_eq!(resp["assignments"]["10-11"]["Gate"], serde_json::json!(["Sato", "Ben"]));
        assert_eq!(resp["warnings"], serde_json::json!([]));
        assert_eq!(resp["load"][0]["shifts"], 2);
    }

    #[actix_web::test]
    async fn test_generate_without_roster() {
        let app = test::init_service(App::new().app_data(app_state(None)).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({"jobs": [{"name": "Gate", "required": 1}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_generate_rejects_invalid_jobs() {
        let app = test::init_service(App::new().app_data(app_state(Some(sample_roster()))).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({"jobs": [{"name": "Gate", "required": 0}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], serde_json::json!(["Gate: required headcount must be at least 1"]));
    }

    #[actix_web::test]
    async fn test_generate_rejects_repeated_job_names() {
        let app = test::init_service(App::new().app_data(app_state(Some(sample_roster()))).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({"jobs": [{"name": "Gate", "required": 2}, {"name": " Gate ", "required": 2}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], serde_json::json!(["Gate: job name is declared more than once"]));
    }

    #[actix_web::test]
    async fn test_index_page_renders_names_as_text() {
        let app = test::init_service(App::new().app_data(app_state(None)).configure(configure)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();

        assert!(html.contains("textContent"));
        assert!(!html.contains("innerHTML"));
    }

    #[actix_web::test]
    async fn test_download_returns_csv_attachment() {
        let app = test::init_service(App::new().app_data(app_state(Some(sample_roster()))).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/generate/download")
            .set_json(serde_json::json!({"jobs": [{"name": "Gate", "required": 2}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let disposition = resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        assert!(disposition.contains("shift_output.csv"));

        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("name,grade,group,09-10,10-11\nSato,4,Events,Gate,Gate\n"));
    }

    #[actix_web::test]
    async fn test_get_roster_reports_availability() {
        let app = test::init_service(App::new().app_data(app_state(Some(sample_roster()))).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/roster").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["availability"][0]["supervisory"], 1);
        assert_eq!(resp["availability"][0]["core"], 2);
        assert_eq!(resp["groups"]["Press"], 2);
    }
}
