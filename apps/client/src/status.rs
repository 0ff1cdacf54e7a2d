//! Application status rules shared by the job forms and the dashboard.
//!
//! Drawing the doughnut is the chart library's job; this module only produces
//! the `{ labels, data }` series it is fed and the palette it is drawn with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Unknown application status: {0}")]
    Unknown(String),

    #[error("Chart data is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Chart data has {labels} labels but {data} values")]
    LengthMismatch { labels: usize, data: usize },
}

/// Where a job application currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    #[default]
    Saved,
    Applied,
    PhoneInterview,
    TechnicalInterview,
    OnsiteInterview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Applied,
        ApplicationStatus::PhoneInterview,
        ApplicationStatus::TechnicalInterview,
        ApplicationStatus::OnsiteInterview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "Saved",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::PhoneInterview => "Phone Interview",
            ApplicationStatus::TechnicalInterview => "Technical Interview",
            ApplicationStatus::OnsiteInterview => "Onsite Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Whether the "date applied" field is shown for this status.
    /// Only jobs that are merely saved have no application date.
    pub fn shows_date_applied(self) -> bool {
        !matches!(self, ApplicationStatus::Saved)
    }

    pub fn bucket(self) -> StatusBucket {
        match self {
            ApplicationStatus::Saved => StatusBucket::Saved,
            ApplicationStatus::Applied => StatusBucket::Applied,
            ApplicationStatus::PhoneInterview
            | ApplicationStatus::TechnicalInterview
            | ApplicationStatus::OnsiteInterview => StatusBucket::Interview,
            ApplicationStatus::Offer => StatusBucket::Offer,
            ApplicationStatus::Rejected => StatusBucket::Rejected,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| StatusError::Unknown(s.to_string()))
    }
}

/// A status select submits its form as soon as a non-empty value is picked.
pub fn auto_submits(selected: &str) -> bool {
    !selected.trim().is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard breakdown
// ────────────────────────────────────────────────────────────────────────────

/// Dashboard slices, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Applied,
    Interview,
    Offer,
    Rejected,
    Saved,
}

impl StatusBucket {
    pub const ORDER: [StatusBucket; 5] = [
        StatusBucket::Applied,
        StatusBucket::Interview,
        StatusBucket::Offer,
        StatusBucket::Rejected,
        StatusBucket::Saved,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusBucket::Applied => "Applied",
            StatusBucket::Interview => "Interview",
            StatusBucket::Offer => "Offer",
            StatusBucket::Rejected => "Rejected",
            StatusBucket::Saved => "Saved",
        }
    }

    /// Bootstrap-derived (fill, border) colours.
    pub fn colors(self) -> SliceColors {
        let (r, g, b) = match self {
            StatusBucket::Applied => (13, 110, 253),   // primary
            StatusBucket::Interview => (13, 202, 240), // info
            StatusBucket::Offer => (25, 135, 84),      // success
            StatusBucket::Rejected => (220, 53, 69),   // danger
            StatusBucket::Saved => (108, 117, 125),    // secondary
        };
        SliceColors {
            fill: format!("rgba({r}, {g}, {b}, 0.7)"),
            border: format!("rgba({r}, {g}, {b}, 1)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceColors {
    pub fill: String,
    pub border: String,
}

/// The `{ labels, data }` series behind the dashboard doughnut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub labels: Vec<String>,
    pub data: Vec<u32>,
}

impl StatusBreakdown {
    /// Counts raw status strings. Interview stages fold together and anything
    /// unrecognised counts as Saved.
    pub fn tally<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = [0u32; StatusBucket::ORDER.len()];
        for raw in statuses {
            let bucket = raw
                .parse::<ApplicationStatus>()
                .map(ApplicationStatus::bucket)
                .unwrap_or(StatusBucket::Saved);
            if let Some(i) = StatusBucket::ORDER.iter().position(|b| *b == bucket) {
                counts[i] = counts[i].saturating_add(1);
            }
        }

        Self {
            labels: StatusBucket::ORDER
                .iter()
                .map(|b| b.label().to_string())
                .collect(),
            data: counts.to_vec(),
        }
    }

    /// Parses the JSON carried in the dashboard's `data-chart` attribute.
    pub fn from_json(raw: &str) -> Result<Self, StatusError> {
        let breakdown: StatusBreakdown =
            serde_json::from_str(raw).map_err(|e| StatusError::InvalidJson(e.to_string()))?;
        if breakdown.labels.len() != breakdown.data.len() {
            return Err(StatusError::LengthMismatch {
                labels: breakdown.labels.len(),
                data: breakdown.data.len(),
            });
        }
        Ok(breakdown)
    }

    /// Sum of all slices, widened so any `u32` counts add without overflow.
    pub fn total(&self) -> u64 {
        self.data.iter().map(|&n| u64::from(n)).sum()
    }

    /// Colours per slice, matched by label; unknown labels get the Saved grey.
    pub fn colors(&self) -> Vec<SliceColors> {
        self.labels
            .iter()
            .map(|label| {
                StatusBucket::ORDER
                    .into_iter()
                    .find(|b| b.label() == label.as_str())
                    .unwrap_or(StatusBucket::Saved)
                    .colors()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.label().parse::<ApplicationStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert_eq!(
            "Ghosted".parse::<ApplicationStatus>(),
            Err(StatusError::Unknown("Ghosted".to_string()))
        );
    }

    #[test]
    fn test_only_saved_hides_date_applied() {
        assert!(!ApplicationStatus::Saved.shows_date_applied());
        for status in ApplicationStatus::ALL
            .into_iter()
            .filter(|s| *s != ApplicationStatus::Saved)
        {
            assert!(status.shows_date_applied(), "{status} should show date");
        }
    }

    #[test]
    fn test_auto_submit_requires_a_value() {
        assert!(auto_submits("Offer"));
        assert!(!auto_submits(""));
        assert!(!auto_submits("  "));
    }

    #[test]
    fn test_tally_folds_interviews_and_unknowns() {
        let breakdown = StatusBreakdown::tally([
            "Applied",
            "Phone Interview",
            "Technical Interview",
            "Onsite Interview",
            "Offer",
            "Rejected",
            "Rejected",
            "Saved",
            "Interview", // legacy label, not a real status
        ]);

        assert_eq!(
            breakdown.labels,
            vec!["Applied", "Interview", "Offer", "Rejected", "Saved"]
        );
        assert_eq!(breakdown.data, vec![1, 3, 1, 2, 2]);
        assert_eq!(breakdown.total(), 9);
    }

    #[test]
    fn test_tally_of_nothing_is_all_zero() {
        let breakdown = StatusBreakdown::tally(Vec::<&str>::new());
        assert_eq!(breakdown.data, vec![0; 5]);
    }

    #[test]
    fn test_from_json_reads_chart_attribute() {
        let raw = r#"{"labels": ["Applied", "Interview", "Offer", "Rejected", "Saved"], "data": [4, 2, 1, 3, 5]}"#;
        let breakdown = StatusBreakdown::from_json(raw).unwrap();
        assert_eq!(breakdown.total(), 15);
        assert_eq!(
            breakdown,
            StatusBreakdown {
                labels: StatusBucket::ORDER
                    .iter()
                    .map(|b| b.label().to_string())
                    .collect(),
                data: vec![4, 2, 1, 3, 5],
            }
        );
    }

    #[test]
    fn test_total_of_huge_counts_does_not_overflow() {
        let raw = r#"{"labels": ["Applied", "Saved"], "data": [4294967295, 1]}"#;
        let breakdown = StatusBreakdown::from_json(raw).unwrap();
        assert_eq!(breakdown.total(), 4_294_967_296);
    }

    #[test]
    fn test_from_json_rejects_length_mismatch() {
        let raw = r#"{"labels": ["Applied", "Offer"], "data": [1]}"#;
        assert_eq!(
            StatusBreakdown::from_json(raw),
            Err(StatusError::LengthMismatch { labels: 2, data: 1 })
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            StatusBreakdown::from_json("not json"),
            Err(StatusError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_colors_follow_labels() {
        let breakdown = StatusBreakdown {
            labels: vec!["Offer".to_string(), "Mystery".to_string()],
            data: vec![1, 1],
        };
        let colors = breakdown.colors();
        assert_eq!(colors[0].fill, "rgba(25, 135, 84, 0.7)");
        assert_eq!(colors[0].border, "rgba(25, 135, 84, 1)");
        assert_eq!(colors[1], StatusBucket::Saved.colors());
    }
}
