// src/types/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate's application to an opportunity. `application_status` is kept
/// as a free string because historical rows may carry values outside the
/// current domain set; the dashboard projector tolerates them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: String,
    pub candidate_email: String,
    pub opportunity_id: i64,
    pub application_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub const STATUS_PENDING: &'static str = "pending";
    pub const STATUS_ACCEPTED: &'static str = "accepted";
    pub const STATUS_REJECTED: &'static str = "rejected";
    pub const STATUS_WITHDRAWN: &'static str = "withdrawn";

    /// Statuses a recruiter may assign during review.
    pub fn is_review_status(status: &str) -> bool {
        matches!(
            status,
            Self::STATUS_PENDING | Self::STATUS_ACCEPTED | Self::STATUS_REJECTED
        )
    }

    pub fn is_withdrawn(&self) -> bool {
        self.application_status == Self::STATUS_WITHDRAWN
    }
}
