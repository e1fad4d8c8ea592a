// src/web/types.rs

use crate::completeness;
use crate::status_projector::StatusCounts;
use crate::types::{Education, Experience, Profile, Skill};
use crate::upload_gate::UploadError;
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

/// Binary attachment response for stored documents (CV download).
pub struct DocumentResponse {
    pub data: Vec<u8>,
    pub filename: Option<String>,
}

impl DocumentResponse {
    pub fn with_filename(data: Vec<u8>, filename: String) -> Self {
        Self {
            data,
            filename: Some(filename),
        }
    }
}

impl<'r> Responder<'r, 'static> for DocumentResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut binding = Response::build();
        let mut response = binding
            .header(ContentType::Binary)
            .sized_body(self.data.len(), std::io::Cursor::new(self.data));

        if let Some(filename) = self.filename {
            response = response.raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            );
        }

        response.ok()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }

    /// Map an upload-gate failure onto the standard error envelope.
    pub fn from_upload_error(error: &UploadError) -> Self {
        Self::new(
            error.message.clone(),
            error.error_type.code().to_string(),
            vec![error.suggestion.clone()],
        )
    }
}

// ===== Request bodies =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct UpdateProfileRequest {
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
}

impl UpdateProfileRequest {
    pub fn into_profile(self) -> Profile {
        Profile {
            summary: self.summary,
            skills: self.skills,
            experiences: self.experiences,
            educations: self.educations,
            linkedin_url: self.linkedin_url,
            cv_file: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SubmitApplicationRequest {
    pub opportunity_id: i64,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
}

// ===== Multipart forms =====

#[derive(FromForm)]
pub struct CvUploadForm<'f> {
    pub file: TempFile<'f>,
}

#[derive(FromForm)]
pub struct AvatarUploadForm<'f> {
    pub file: TempFile<'f>,
}

// ===== Response payloads =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UserInfo {
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub user_img: Option<String>,
}

/// Profile as shown to its owner. The CV payload itself is served by the
/// download endpoint; listings only carry its presence.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ProfileView {
    pub summary: Option<String>,
    pub skills: Vec<Skill>,
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub linkedin_url: Option<String>,
    pub has_cv: bool,
    pub completeness: u8,
}

impl ProfileView {
    pub fn from_profile(profile: Profile) -> Self {
        let completeness = completeness::compute_completeness(Some(&profile));
        let has_cv = profile.has_cv();
        Self {
            summary: profile.summary,
            skills: profile.skills,
            experiences: profile.experiences,
            educations: profile.educations,
            linkedin_url: profile.linkedin_url,
            has_cv,
            completeness,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CompletenessReport {
    /// Distinguishes a never-created profile from an empty one; the client
    /// picks the create or edit flow off this flag.
    pub exists: bool,
    pub percent: u8,
    pub completed: Vec<String>,
    pub missing: Vec<String>,
}

impl CompletenessReport {
    pub fn for_profile(profile: Option<&Profile>) -> Self {
        Self {
            exists: profile.is_some(),
            percent: completeness::compute_completeness(profile),
            completed: completeness::completed_sections(profile)
                .into_iter()
                .map(str::to_string)
                .collect(),
            missing: completeness::missing_sections(profile)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StatusSummary {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub pending_percent: u8,
    pub accepted_percent: u8,
    pub rejected_percent: u8,
}

impl StatusSummary {
    pub fn from_counts(counts: StatusCounts) -> Self {
        let pending_percent = counts.pending_percent();
        let accepted_percent = counts.accepted_percent();
        let rejected_percent = counts.rejected_percent();
        Self {
            counts,
            pending_percent,
            accepted_percent,
            rejected_percent,
        }
    }
}

/// Per-request upload limits, from the environment config.
pub struct ServerConfig {
    pub avatar_max_bytes: u64,
    pub cv_max_bytes: u64,
}
