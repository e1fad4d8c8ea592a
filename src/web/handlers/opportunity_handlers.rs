// src/web/handlers/opportunity_handlers.rs
use crate::auth::OptionalAuth;
use crate::database::{DatabaseConfig, OpportunityRepository};
use crate::types::Opportunity;
use crate::web::handlers::profile_handlers::internal_error;
use crate::web::types::{DataResponse, StandardErrorResponse};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

// Browsing is open: candidates look at openings before they sign up.

pub async fn list_opportunities_handler(
    auth: OptionalAuth,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Vec<Opportunity>>>, Json<StandardErrorResponse>> {
    if let Some(user) = &auth.user {
        info!("Opportunity listing requested by {}", user.email());
    }

    let pool = db_config.pool().map_err(internal_error)?;
    let repo = OpportunityRepository::new(pool);

    match repo.list_active().await {
        Ok(opportunities) => Ok(Json(DataResponse::success(
            format!("{} open opportunity(ies)", opportunities.len()),
            opportunities,
        ))),
        Err(e) => {
            error!("Failed to list opportunities: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to list opportunities".to_string(),
                "OPPORTUNITY_LIST_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}

pub async fn get_opportunity_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<Opportunity>>, Json<StandardErrorResponse>> {
    let pool = db_config.pool().map_err(internal_error)?;
    let repo = OpportunityRepository::new(pool);

    match repo.find_by_id(id).await {
        Ok(Some(opportunity)) if opportunity.is_active => Ok(Json(DataResponse::success(
            "Opportunity loaded".to_string(),
            opportunity,
        ))),
        Ok(_) => Err(Json(StandardErrorResponse::new(
            format!("Opportunity {} not found", id),
            "OPPORTUNITY_NOT_FOUND".to_string(),
            vec!["Browse open opportunities".to_string()],
        ))),
        Err(e) => {
            error!("Failed to load opportunity {}: {}", id, e);
            Err(Json(StandardErrorResponse::new(
                "Failed to load opportunity".to_string(),
                "OPPORTUNITY_LOAD_ERROR".to_string(),
                vec!["Try again or contact support".to_string()],
            )))
        }
    }
}
