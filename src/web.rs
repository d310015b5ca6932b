use std::sync::{Mutex, MutexGuard};

use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::export::export_schedule_csv;
use crate::session::{Action, Session, ViewMode};
use crate::store::KeyValueStore;

pub type SharedSession = Session<Box<dyn KeyValueStore + Send>>;

/// The one live session, applied to serially
pub struct AppState {
    pub session: Mutex<SharedSession>,
}

impl AppState {
    pub fn new(session: SharedSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, SharedSession>> {
        self.session
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("session lock poisoned"))
    }
}

#[derive(Serialize, Deserialize)]
pub struct ViewResponse {
    pub view: ViewMode,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn get_grid(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.session()?;
    Ok(HttpResponse::Ok().json(session.grid()))
}

async fn get_list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.session()?;
    Ok(HttpResponse::Ok().json(session.list()))
}

async fn get_view(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.session()?;
    Ok(HttpResponse::Ok().json(ViewResponse {
        view: session.view(),
    }))
}

// Every mutation goes through here
async fn post_action(
    action: web::Json<Action>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut session = state.session()?;
    match session.apply(action.into_inner()) {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(e) => Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: e.to_string(),
        })),
    }
}

async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let grid = state.session()?.grid();
    let mut body = Vec::new();
    export_schedule_csv(&grid, &mut body)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to export schedule: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", "attachment; filename=\"schedule.csv\""))
        .body(body))
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Registers the page and the JSON API
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/grid", web::get().to(get_grid))
        .route("/api/list", web::get().to(get_list))
        .route("/api/view", web::get().to(get_view))
        .route("/api/actions", web::post().to(post_action))
        .route("/api/export.csv", web::get().to(export_csv));
}

pub async fn start_server(bind_addr: &str, session: SharedSession) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(session));

    info!(%bind_addr, "starting lineup server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
