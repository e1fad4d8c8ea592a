// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::auth::{AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::database::DatabaseConfig;
use crate::environment::EnvironmentConfig;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, patch, post, put, routes, Request, Response, State};
use tracing::{error, info};

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
            "POST, GET, PUT, PATCH, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/health")]
pub async fn health(auth: OptionalAuth) -> Json<TextResponse> {
    handlers::health_handler(auth).await
}

#[get("/me")]
pub async fn get_current_user(auth: AuthenticatedUser) -> Json<DataResponse<UserInfo>> {
    handlers::me_handler(auth).await
}

#[get("/me", rank = 2)]
pub async fn get_current_user_error() -> Json<StandardErrorResponse> {
    handlers::me_error_handler().await
}

#[post("/me/avatar", data = "<upload>")]
pub async fn upload_avatar(
    upload: Form<AvatarUploadForm<'_>>,
    auth: AuthenticatedUser,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::upload_avatar_handler(upload, auth, config, db_config).await
}

#[get("/profile")]
pub async fn get_profile(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<ProfileView>>, Json<StandardErrorResponse>> {
    handlers::get_profile_handler(auth, db_config).await
}

#[put("/profile", data = "<request>")]
pub async fn upsert_profile(
    request: Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::upsert_profile_handler(request, auth, db_config).await
}

#[get("/profile/completeness")]
pub async fn profile_completeness(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CompletenessReport>>, Json<StandardErrorResponse>> {
    handlers::completeness_report_handler(auth, db_config).await
}

#[post("/profile/cv", data = "<upload>")]
pub async fn upload_cv(
    upload: Form<CvUploadForm<'_>>,
    auth: AuthenticatedUser,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::upload_cv_handler(upload, auth, config, db_config).await
}

#[get("/profile/cv")]
pub async fn download_cv(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<DocumentResponse, Json<StandardErrorResponse>> {
    handlers::download_cv_handler(auth, db_config).await
}

#[get("/opportunities")]
pub async fn list_opportunities(
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<crate::types::Opportunity>>>, Json<StandardErrorResponse>> {
    handlers::list_opportunities_handler(auth, db_config).await
}

#[get("/opportunities/<id>")]
pub async fn get_opportunity(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<crate::types::Opportunity>>, Json<StandardErrorResponse>> {
    handlers::get_opportunity_handler(id, db_config).await
}

#[post("/applications", data = "<request>")]
pub async fn submit_application(
    request: Json<SubmitApplicationRequest>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::submit_application_handler(request, auth, db_config).await
}

#[get("/applications")]
pub async fn list_applications(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<crate::types::Application>>>, Json<StandardErrorResponse>> {
    handlers::list_applications_handler(auth, db_config).await
}

#[get("/applications/summary")]
pub async fn application_summary(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<StatusSummary>>, Json<StandardErrorResponse>> {
    handlers::status_summary_handler(auth, db_config).await
}

#[post("/applications/<id>/withdraw")]
pub async fn withdraw_application(
    id: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::withdraw_application_handler(id, auth, db_config).await
}

#[patch("/applications/<id>/status", data = "<request>")]
pub async fn update_application_status(
    id: String,
    request: Json<UpdateApplicationStatusRequest>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::update_application_status_handler(id, request, auth, db_config).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
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
    ))
}

// Main server start function
pub async fn start_web_server(environment: EnvironmentConfig, port: u16) -> Result<()> {
    let server_config = ServerConfig {
        avatar_max_bytes: environment.avatar_max_bytes,
        cv_max_bytes: environment.cv_max_bytes,
    };

    let mut db_config = DatabaseConfig::new(environment.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    let auth_config = AuthConfig::from_env()?;

    info!("Starting TalentHub API server");
    info!("Database: {}", db_config.database_path.display());
    info!("Server: http://0.0.0.0:{}", port);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(server_config)
        .manage(auth_config)
        .manage(db_config)
        .register("/api", catchers![bad_request, internal_error])
        .mount(
            "/api",
            routes![
                health,
                get_current_user,
                get_current_user_error,
                upload_avatar,
                get_profile,
                upsert_profile,
                profile_completeness,
                upload_cv,
                download_cv,
                list_opportunities,
                get_opportunity,
                submit_application,
                list_applications,
                application_summary,
                withdraw_application,
                update_application_status,
                options,
            ],
        )
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed to launch: {}", e))?;

    Ok(())
}
