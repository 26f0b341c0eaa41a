// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::auth::{AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::config::AppConfig;
use crate::database::{DatabaseConfig, SqliteProfileStore};
use crate::jobs::{JobSearchParams, JobSource, LinkedinJobClient};
use crate::profile::{MemoryProfileStore, Profile, ProfileService, ProfileStore};
use anyhow::{Context, Result};
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, put, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Shared services handed to every route
pub struct ServerState {
    pub profiles: ProfileService,
    pub jobs: Arc<dyn JobSource>,
    /// Minimum time a settings save shows as in progress
    pub save_indicator: Duration,
}

// Slack for field names, separators and conversation_id
const BODY_OVERHEAD: u64 = 64 * 1024;

/// Body limits large enough for two full-size profile fields. URL encoding
/// can triple a byte and JSON escapes can grow it sixfold.
pub fn request_limits(max_field_bytes: usize) -> Limits {
    let field = max_field_bytes as u64;
    Limits::default()
        .limit("form", (field.saturating_mul(2 * 3) + BODY_OVERHEAD).bytes())
        .limit("json", (field.saturating_mul(2 * 6) + BODY_OVERHEAD).bytes())
}

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

// API routes

#[get("/health")]
pub async fn health(auth: OptionalAuth) -> Json<TextResponse> {
    handlers::health_handler(auth).await
}

#[get("/profile")]
pub async fn get_profile(
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<Profile>> {
    handlers::get_profile_handler(auth, state).await
}

#[put("/profile", data = "<request>")]
pub async fn save_profile(
    request: Json<StandardRequest<ProfileInput>>,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<ActionResponse> {
    handlers::save_profile_handler(request, auth, state).await
}

#[put("/profile/resume", data = "<request>")]
pub async fn save_resume(
    request: Json<StandardRequest<ResumeInput>>,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<ActionResponse> {
    handlers::save_resume_handler(request, auth, state).await
}

#[put("/profile/instructions", data = "<request>")]
pub async fn save_instructions(
    request: Json<StandardRequest<UserInstructionsInput>>,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<ActionResponse> {
    handlers::save_instructions_handler(request, auth, state).await
}

#[post("/jobs/search", data = "<request>")]
pub async fn search_jobs(
    request: Json<StandardRequest<JobSearchParams>>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<JobSearchData>> {
    handlers::search_jobs_handler(request, state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Pages

#[get("/?<keywords>&<location>")]
pub async fn dashboard_page(
    keywords: Option<String>,
    location: Option<String>,
    state: &State<ServerState>,
) -> RawHtml<String> {
    handlers::dashboard_page_handler(keywords, location, state).await
}

#[get("/settings")]
pub async fn settings_page(auth: OptionalAuth, state: &State<ServerState>) -> RawHtml<String> {
    handlers::settings_page_handler(auth, state).await
}

#[post("/settings", data = "<form>")]
pub async fn save_settings_page(
    form: Form<SettingsForm>,
    auth: OptionalAuth,
    state: &State<ServerState>,
) -> (Status, RawHtml<String>) {
    handlers::save_settings_page_handler(form, auth, state).await
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Authentication required".to_string(),
        "UNAUTHORIZED".to_string(),
        vec!["Send a valid bearer token in the Authorization header".to_string()],
        None,
    ))
}

#[rocket::catch(404)]
pub fn api_not_found(req: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No endpoint at {}", req.uri().path()),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path and method".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected schema".to_string(),
        "VALIDATION_ERROR".to_string(),
        vec![
            "Verify all required fields are present".to_string(),
            "Check field types".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn page_not_found(req: &Request<'_>) -> RawHtml<String> {
    handlers::not_found_page(req.uri().path().as_str())
}

/// Assemble the application with default server settings; used by tests.
pub fn build_rocket(state: ServerState, auth_config: AuthConfig) -> Rocket<Build> {
    build_rocket_with(rocket::Config::figment(), state, auth_config)
}

pub fn build_rocket_with(
    figment: Figment,
    state: ServerState,
    auth_config: AuthConfig,
) -> Rocket<Build> {
    let figment = figment.merge(("limits", request_limits(state.profiles.max_field_bytes())));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .manage(auth_config)
        .register("/", catchers![page_not_found])
        .register(
            "/api",
            catchers![bad_request, unauthorized, api_not_found, unprocessable, internal_error],
        )
        .mount("/", routes![dashboard_page, settings_page, save_settings_page])
        .mount(
            "/api",
            routes![
                health,
                get_profile,
                save_profile,
                save_resume,
                save_instructions,
                search_jobs,
                options,
            ],
        )
}

/// Profiles live in SQLite unless `memory` is set
pub async fn open_profile_store(config: &AppConfig, memory: bool) -> Result<Arc<dyn ProfileStore>> {
    if memory {
        info!("Using in-memory profile store; settings are lost on restart");
        return Ok(Arc::new(MemoryProfileStore::new()));
    }

    let mut db_config = DatabaseConfig::new(config.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;
    Ok(Arc::new(SqliteProfileStore::new(db_config.pool()?.clone())))
}

// Main server start function
pub async fn start_web_server(config: AppConfig, memory: bool) -> Result<()> {
    let secret = AppConfig::jwt_secret()?;
    let auth_config = AuthConfig::new(&secret, config.auth.issuer.clone(), config.auth.token_ttl_hours);

    let store = open_profile_store(&config, memory).await?;
    let jobs = LinkedinJobClient::from_settings(&config.linkedin)?;

    let state = ServerState {
        profiles: ProfileService::new(store, config.profile.max_field_bytes),
        jobs: Arc::new(jobs),
        save_indicator: config.save_indicator(),
    };

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address))
        .merge(("port", config.server.port));

    info!("Starting Scoutling server");
    info!("Database: {}", config.database_path.display());
    info!(
        "Server: http://{}:{}",
        config.server.address, config.server.port
    );

    let _rocket = build_rocket_with(figment, state, auth_config)
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}
