pub mod admin_cli;
pub mod auth;
pub mod completeness;
pub mod database;
pub mod environment;
pub mod status_projector;
pub mod types;
pub mod upload_gate;
pub mod utils;
pub mod web;

pub use completeness::{completed_sections, compute_completeness, missing_sections, SECTION_LABELS};
pub use status_projector::{project_status_counts, StatusCounts};
pub use upload_gate::{
    decode_payload, prepare_avatar, strip_data_url_prefix, validate_and_encode, UploadError,
};
