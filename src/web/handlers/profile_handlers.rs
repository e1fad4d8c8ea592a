// src/web/handlers/profile_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::database::{DatabaseConfig, ProfileRepository};
use crate::upload_gate;
use crate::web::types::{
    ActionResponse, CompletenessReport, CvUploadForm, DataResponse, DocumentResponse,
    ProfileView, ServerConfig, StandardErrorResponse, UpdateProfileRequest,
};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn get_profile_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<ProfileView>>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ProfileRepository::new(pool);

    match repo.find_by_email(auth.email()).await {
        Ok(Some(profile)) => Ok(Json(DataResponse::success(
            "Profile loaded".to_string(),
            ProfileView::from_profile(profile),
        ))),
        Ok(None) => Err(Json(StandardErrorResponse::new(
            "Profile not found".to_string(),
            "PROFILE_NOT_FOUND".to_string(),
            vec!["Create your profile first".to_string()],
        ))),
        Err(e) => {
            error!("Failed to load profile for {}: {}", auth.email(), e);
            Err(Json(StandardErrorResponse::new(
                "Failed to load profile".to_string(),
                "PROFILE_LOAD_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}

pub async fn upsert_profile_handler(
    request: Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ProfileRepository::new(pool);

    let profile = request.into_inner().into_profile();

    if let Err(e) = repo.upsert(auth.email(), &profile).await {
        error!("Failed to save profile for {}: {}", auth.email(), e);
        return Err(Json(StandardErrorResponse::new(
            "Failed to save profile".to_string(),
            "PROFILE_SAVE_ERROR".to_string(),
            vec!["Try again or contact support".to_string()],
        )));
    }

    info!("Profile saved for {}", auth.email());

    Ok(Json(
        ActionResponse::success("Profile saved successfully".to_string(), "saved".to_string())
            .with_next_actions(vec![
                "Upload your CV".to_string(),
                "Check your profile completeness".to_string(),
            ]),
    ))
}

pub async fn completeness_report_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<CompletenessReport>>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ProfileRepository::new(pool);

    let profile = match repo.find_by_email(auth.email()).await {
        Ok(profile) => profile,
        Err(e) => {
            error!("Failed to load profile for {}: {}", auth.email(), e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to compute profile completeness".to_string(),
                "PROFILE_LOAD_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )));
        }
    };

    let report = CompletenessReport::for_profile(profile.as_ref());
    Ok(Json(DataResponse::success(
        "Profile completeness computed".to_string(),
        report,
    )))
}

pub async fn upload_cv_handler(
    mut upload: Form<CvUploadForm<'_>>,
    auth: AuthenticatedUser,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ProfileRepository::new(pool);

    info!(
        "User {} uploading CV ({} bytes declared)",
        auth.email(),
        upload.file.len()
    );

    let file_bytes = match read_upload(&mut upload.file).await {
        Ok(bytes) => bytes,
        Err(response) => return Err(response),
    };

    let encoded = match upload_gate::validate_and_encode(&file_bytes, config.cv_max_bytes) {
        Ok(encoded) => encoded,
        Err(e) => {
            info!("CV upload rejected for {}: {}", auth.email(), e);
            return Err(Json(StandardErrorResponse::from_upload_error(&e)));
        }
    };

    match repo.set_cv(auth.email(), &encoded).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "CV uploaded successfully".to_string(),
            "uploaded".to_string(),
        ))),
        Ok(false) => Err(Json(StandardErrorResponse::new(
            "Profile not found".to_string(),
            "PROFILE_NOT_FOUND".to_string(),
            vec!["Create your profile before uploading a CV".to_string()],
        ))),
        Err(e) => {
            error!("Failed to store CV for {}: {}", auth.email(), e);
            Err(Json(StandardErrorResponse::new(
                "Failed to store CV".to_string(),
                "CV_SAVE_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}

pub async fn download_cv_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<DocumentResponse, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ProfileRepository::new(pool);

    let profile = match repo.find_by_email(auth.email()).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return Err(Json(StandardErrorResponse::new(
                "Profile not found".to_string(),
                "PROFILE_NOT_FOUND".to_string(),
                vec!["Create your profile first".to_string()],
            )))
        }
        Err(e) => {
            error!("Failed to load profile for {}: {}", auth.email(), e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to load profile".to_string(),
                "PROFILE_LOAD_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )));
        }
    };

    let payload = match profile.cv_file.as_deref() {
        Some(payload) if !payload.trim().is_empty() => payload.to_string(),
        _ => {
            return Err(Json(StandardErrorResponse::new(
                "No CV on file".to_string(),
                "CV_NOT_FOUND".to_string(),
                vec!["Upload a CV first".to_string()],
            )))
        }
    };

    match upload_gate::decode_payload(&payload) {
        Ok(bytes) => Ok(DocumentResponse::with_filename(bytes, "cv".to_string())),
        Err(e) => {
            error!("Stored CV for {} is unreadable: {}", auth.email(), e);
            Err(Json(StandardErrorResponse::new(
                "Stored CV could not be decoded".to_string(),
                "CV_DECODE_ERROR".to_string(),
                vec!["Re-upload your CV".to_string()],
            )))
        }
    }
}

/// Read the multipart temp file into memory.
pub(crate) async fn read_upload(
    file: &mut rocket::fs::TempFile<'_>,
) -> Result<Vec<u8>, Json<StandardErrorResponse>> {
    let path = match file.path() {
        Some(path) => path.to_path_buf(),
        None => {
            error!("Uploaded file has no path");
            return Err(Json(StandardErrorResponse::new(
                "Invalid uploaded file".to_string(),
                "UPLOAD_ERROR".to_string(),
                vec!["Please try uploading again".to_string()],
            )));
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            error!("Failed to read uploaded file: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to process uploaded file".to_string(),
                "UPLOAD_ERROR".to_string(),
                vec!["Please try uploading again".to_string()],
            )))
        }
    }
}

pub(crate) fn internal_error(e: anyhow::Error) -> Json<StandardErrorResponse> {
    error!("Database unavailable: {}", e);
    Json(StandardErrorResponse::new(
        "Service temporarily unavailable".to_string(),
        "DATABASE_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}
