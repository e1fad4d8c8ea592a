// src/web/handlers/account_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::database::{DatabaseConfig, UserRepository};
use crate::upload_gate;
use crate::web::handlers::profile_handlers::{internal_error, read_upload};
use crate::web::types::{
    ActionResponse, AvatarUploadForm, DataResponse, ServerConfig, StandardErrorResponse, UserInfo,
};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn me_handler(auth: AuthenticatedUser) -> Json<DataResponse<UserInfo>> {
    let user = auth.user();
    Json(DataResponse::success(
        "User authenticated successfully".to_string(),
        UserInfo {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            user_img: user.user_img.clone(),
        },
    ))
}

pub async fn me_error_handler() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Authentication required".to_string(),
        "AUTHORIZATION_ERROR".to_string(),
        vec![
            "Login is required".to_string(),
            "Check that your session has not expired".to_string(),
        ],
    ))
}

pub async fn upload_avatar_handler(
    mut upload: Form<AvatarUploadForm<'_>>,
    auth: AuthenticatedUser,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = UserRepository::new(pool);

    let declared_mime = upload.file.content_type().map(|ct| ct.to_string());

    let file_bytes = match read_upload(&mut upload.file).await {
        Ok(bytes) => bytes,
        Err(response) => return Err(response),
    };

    let encoded = match upload_gate::prepare_avatar(
        &file_bytes,
        declared_mime.as_deref(),
        config.avatar_max_bytes,
    ) {
        Ok(encoded) => encoded,
        Err(e) => {
            info!("Avatar upload rejected for {}: {}", auth.email(), e);
            return Err(Json(StandardErrorResponse::from_upload_error(&e)));
        }
    };

    match repo.set_avatar(auth.email(), &encoded).await {
        Ok(true) => {
            info!("Avatar updated for {}", auth.email());
            Ok(Json(ActionResponse::success(
                "Avatar updated successfully".to_string(),
                "uploaded".to_string(),
            )))
        }
        Ok(false) => Err(Json(StandardErrorResponse::new(
            "User account not found".to_string(),
            "USER_NOT_FOUND".to_string(),
            vec!["Contact support".to_string()],
        ))),
        Err(e) => {
            error!("Failed to store avatar for {}: {}", auth.email(), e);
            Err(Json(StandardErrorResponse::new(
                "Failed to store avatar".to_string(),
                "AVATAR_SAVE_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}
