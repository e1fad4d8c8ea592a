// src/status_projector.rs
//! Application status dashboard projection
//!
//! Buckets a candidate's applications into the three reviewed statuses and
//! shapes the result for the dashboard chart. `total` is always the input
//! length; statuses outside the named buckets (such as `withdrawn`) count
//! toward `total` only, so the bucket sum may be smaller than `total`. That
//! asymmetry is deliberate and covered by tests.

use crate::types::Application;
use crate::utils::normalize_status;
use serde::Serialize;

/// Chart labels, in series order. Consumers index into the series data by
/// this order, so it must not be permuted.
pub const STATUS_LABELS: [&str; 3] = ["Pending", "Accepted", "Rejected"];

const SERIES_NAME: &str = "Applications";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSeries {
    pub name: String,
    pub data: [u64; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub total: u64,
    pub series: Vec<StatusSeries>,
    pub labels: [&'static str; 3],
}

/// Tally applications by status. Matching is case-insensitive on trimmed
/// values; stored rows are canonical lowercase but imported history may not
/// be.
pub fn project_status_counts(applications: &[Application]) -> StatusCounts {
    let mut pending = 0u64;
    let mut accepted = 0u64;
    let mut rejected = 0u64;

    for application in applications {
        match normalize_status(&application.application_status).as_str() {
            Application::STATUS_PENDING => pending += 1,
            Application::STATUS_ACCEPTED => accepted += 1,
            Application::STATUS_REJECTED => rejected += 1,
            _ => {}
        }
    }

    StatusCounts {
        pending,
        accepted,
        rejected,
        total: applications.len() as u64,
        series: vec![StatusSeries {
            name: SERIES_NAME.to_string(),
            data: [pending, accepted, rejected],
        }],
        labels: STATUS_LABELS,
    }
}

impl StatusCounts {
    pub fn pending_percent(&self) -> u8 {
        percent_of(self.pending, self.total)
    }

    pub fn accepted_percent(&self) -> u8 {
        percent_of(self.accepted, self.total)
    }

    pub fn rejected_percent(&self) -> u8 {
        percent_of(self.rejected, self.total)
    }
}

// total of zero yields 0%, not a division error
fn percent_of(count: u64, total: u64) -> u8 {
    (count as f64 / total.max(1) as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn application(status: &str) -> Application {
        let now = Utc::now();
        Application {
            id: uuid::Uuid::new_v4().to_string(),
            candidate_email: "candidate@example.com".to_string(),
            opportunity_id: 1,
            application_status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_list_projects_to_zeroes() {
        let counts = project_status_counts(&[]);
        assert_eq!(counts.total, 0);
        assert_eq!(
            (counts.pending, counts.accepted, counts.rejected),
            (0, 0, 0)
        );
        assert_eq!(counts.labels, ["Pending", "Accepted", "Rejected"]);
        assert_eq!(
            counts.series,
            vec![StatusSeries {
                name: "Applications".to_string(),
                data: [0, 0, 0],
            }]
        );
        assert_eq!(counts.pending_percent(), 0);
        assert_eq!(counts.accepted_percent(), 0);
        assert_eq!(counts.rejected_percent(), 0);
    }

    #[test]
    fn series_data_follows_label_order() {
        let applications = vec![
            application("pending"),
            application("pending"),
            application("accepted"),
            application("rejected"),
        ];
        let counts = project_status_counts(&applications);
        assert_eq!(counts.series[0].data, [2, 1, 1]);
        assert_eq!(counts.series[0].name, "Applications");
    }

    #[test]
    fn withdrawn_counts_toward_total_only() {
        let applications = vec![
            application("pending"),
            application("accepted"),
            application("withdrawn"),
        ];
        let counts = project_status_counts(&applications);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.pending + counts.accepted + counts.rejected, 2);
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let applications = vec![
            application("Pending"),
            application("  ACCEPTED "),
            application("Rejected"),
        ];
        let counts = project_status_counts(&applications);
        assert_eq!(
            (counts.pending, counts.accepted, counts.rejected),
            (1, 1, 1)
        );
    }

    #[test]
    fn percentages_round_to_nearest_integer() {
        let applications = vec![
            application("pending"),
            application("pending"),
            application("accepted"),
        ];
        let counts = project_status_counts(&applications);
        assert_eq!(counts.pending_percent(), 67);
        assert_eq!(counts.accepted_percent(), 33);
        assert_eq!(counts.rejected_percent(), 0);
    }
}
