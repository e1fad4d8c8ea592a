// src/web/handlers/application_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::database::{ApplicationRepository, DatabaseConfig, OpportunityRepository};
use crate::status_projector::project_status_counts;
use crate::types::Application;
use crate::utils::normalize_status;
use crate::web::handlers::profile_handlers::internal_error;
use crate::web::types::{
    ActionResponse, DataResponse, StandardErrorResponse, StatusSummary, SubmitApplicationRequest,
    UpdateApplicationStatusRequest,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn submit_application_handler(
    request: Json<SubmitApplicationRequest>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let opportunities = OpportunityRepository::new(pool);
    let applications = ApplicationRepository::new(pool);

    let opportunity_id = request.opportunity_id;

    let opportunity = match opportunities.find_by_id(opportunity_id).await {
        Ok(Some(opportunity)) if opportunity.is_active => opportunity,
        Ok(_) => {
            return Err(Json(StandardErrorResponse::new(
                format!("Opportunity {} not found", opportunity_id),
                "OPPORTUNITY_NOT_FOUND".to_string(),
                vec!["Browse open opportunities and try again".to_string()],
            )))
        }
        Err(e) => {
            error!("Failed to load opportunity {}: {}", opportunity_id, e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to load opportunity".to_string(),
                "OPPORTUNITY_LOAD_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )));
        }
    };

    match applications.exists_for(auth.email(), opportunity_id).await {
        Ok(true) => {
            return Err(Json(StandardErrorResponse::new(
                format!("You already applied to '{}'", opportunity.title),
                "ALREADY_APPLIED".to_string(),
                vec!["Check your applications dashboard".to_string()],
            )))
        }
        Ok(false) => {}
        Err(e) => {
            error!("Duplicate check failed for {}: {}", auth.email(), e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to submit application".to_string(),
                "APPLICATION_SAVE_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )));
        }
    }

    match applications.create(auth.email(), opportunity_id).await {
        Ok(application) => {
            info!(
                "User {} applied to opportunity {} ({})",
                auth.email(),
                opportunity_id,
                application.id
            );
            Ok(Json(
                ActionResponse::success(
                    format!("Application submitted for '{}'", opportunity.title),
                    "submitted".to_string(),
                )
                .with_next_actions(vec![
                    "Track the status on your dashboard".to_string(),
                    "Complete your profile to improve your chances".to_string(),
                ]),
            ))
        }
        Err(e) => {
            error!("Failed to create application for {}: {}", auth.email(), e);
            Err(Json(StandardErrorResponse::new(
                "Failed to submit application".to_string(),
                "APPLICATION_SAVE_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}

pub async fn list_applications_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<Application>>>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ApplicationRepository::new(pool);

    match repo.list_for_candidate(auth.email()).await {
        Ok(applications) => Ok(Json(DataResponse::success(
            format!("{} application(s)", applications.len()),
            applications,
        ))),
        Err(e) => {
            error!("Failed to list applications for {}: {}", auth.email(), e);
            Err(Json(StandardErrorResponse::new(
                "Failed to list applications".to_string(),
                "APPLICATION_LIST_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}

pub async fn withdraw_application_handler(
    id: String,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ApplicationRepository::new(pool);

    // Ownership check doubles as the existence check; someone else's
    // application looks the same as a missing one.
    let application = match repo.find_by_id(&id).await {
        Ok(Some(application)) if application.candidate_email == auth.email() => application,
        Ok(_) => {
            return Err(Json(StandardErrorResponse::new(
                "Application not found".to_string(),
                "APPLICATION_NOT_FOUND".to_string(),
                vec!["Check your applications dashboard".to_string()],
            )))
        }
        Err(e) => {
            error!("Failed to load application {}: {}", id, e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to load application".to_string(),
                "APPLICATION_LOAD_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )));
        }
    };

    if application.is_withdrawn() {
        return Err(Json(StandardErrorResponse::new(
            "Application is already withdrawn".to_string(),
            "ALREADY_WITHDRAWN".to_string(),
            vec!["No further action is needed".to_string()],
        )));
    }

    if let Err(e) = repo.set_status(&id, Application::STATUS_WITHDRAWN).await {
        error!("Failed to withdraw application {}: {}", id, e);
        return Err(Json(StandardErrorResponse::new(
            "Failed to withdraw application".to_string(),
            "APPLICATION_SAVE_ERROR".to_string(),
            vec!["Try again or contact support".to_string()],
        )));
    }

    info!("User {} withdrew application {}", auth.email(), id);

    Ok(Json(ActionResponse::success(
        "Application withdrawn".to_string(),
        "withdrawn".to_string(),
    )))
}

pub async fn update_application_status_handler(
    id: String,
    request: Json<UpdateApplicationStatusRequest>,
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    if !auth.user().can_review_applications() {
        return Err(Json(StandardErrorResponse::new(
            "Only recruiters can update application status".to_string(),
            "FORBIDDEN".to_string(),
            vec!["Contact a recruiter or administrator".to_string()],
        )));
    }

    let status = normalize_status(&request.status);
    if !Application::is_review_status(&status) {
        return Err(Json(StandardErrorResponse::new(
            format!("'{}' is not a valid review status", request.status),
            "INVALID_STATUS".to_string(),
            vec!["Use one of: pending, accepted, rejected".to_string()],
        )));
    }

    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ApplicationRepository::new(pool);

    match repo.set_status(&id, &status).await {
        Ok(true) => {
            info!(
                "Reviewer {} set application {} to {}",
                auth.email(),
                id,
                status
            );
            Ok(Json(ActionResponse::success(
                format!("Application marked as {}", status),
                "status_updated".to_string(),
            )))
        }
        Ok(false) => Err(Json(StandardErrorResponse::new(
            "Application not found".to_string(),
            "APPLICATION_NOT_FOUND".to_string(),
            vec!["Check the application id".to_string()],
        ))),
        Err(e) => {
            error!("Failed to update application {}: {}", id, e);
            Err(Json(StandardErrorResponse::new(
                "Failed to update application".to_string(),
                "APPLICATION_SAVE_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}

pub async fn status_summary_handler(
    auth: AuthenticatedUser,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<StatusSummary>>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = ApplicationRepository::new(pool);

    let applications = match repo.list_for_candidate(auth.email()).await {
        Ok(applications) => applications,
        Err(e) => {
            error!("Failed to list applications for {}: {}", auth.email(), e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to compute application summary".to_string(),
                "APPLICATION_LIST_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )));
        }
    };

    let summary = StatusSummary::from_counts(project_status_counts(&applications));
    Ok(Json(DataResponse::success(
        "Application summary computed".to_string(),
        summary,
    )))
}
