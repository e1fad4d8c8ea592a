// src/types/opportunity.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Opportunity {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when an opportunity is created (CLI import).
#[derive(Debug, Clone, Deserialize)]
pub struct NewOpportunity {
    pub title: String,
    pub company: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}
