// src/utils.rs
use std::path::Path;

/// Format a byte count as megabytes with one decimal, e.g. "0.7MB".
pub fn format_mb(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Canonical form for application statuses: trimmed, lowercase.
pub fn normalize_status(status: &str) -> String {
    status.trim().to_ascii_lowercase()
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mb() {
        assert_eq!(format_mb(1024 * 1024), "1.0MB");
        assert_eq!(format_mb(700 * 1024), "0.7MB");
        assert_eq!(format_mb(10 * 1024 * 1024), "10.0MB");
    }

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status("Pending"), "pending");
        assert_eq!(normalize_status("  ACCEPTED  "), "accepted");
        assert_eq!(normalize_status("withdrawn"), "withdrawn");
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("cv.pdf"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("resume.DOCX"), Some("docx".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }
}
