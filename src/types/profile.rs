// src/types/profile.rs
//! Candidate profile records exchanged with the API and stored per user

use serde::{Deserialize, Serialize};

/// A candidate's professional record. Every section is optional; the
/// completeness calculator reports which ones are still missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub educations: Vec<Education>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    /// Base64-encoded CV document, never carrying a data-URL prefix.
    #[serde(default)]
    pub cv_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub years: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub university: String,
    pub degree: String,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Profile {
    pub fn has_cv(&self) -> bool {
        self.cv_file
            .as_deref()
            .map(str::trim)
            .is_some_and(|cv| !cv.is_empty())
    }
}
