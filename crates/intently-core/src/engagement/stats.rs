//! Long-lived usage counters persisted per browser profile.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// NPS band for a 0-10 survey score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpsCategory {
    Detractor,
    Passive,
    Promoter,
}

impl NpsCategory {
    /// Categorize a validated 0-10 score.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=6 => NpsCategory::Detractor,
            7..=8 => NpsCategory::Passive,
            _ => NpsCategory::Promoter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NpsCategory::Detractor => "detractor",
            NpsCategory::Passive => "passive",
            NpsCategory::Promoter => "promoter",
        }
    }
}

/// Per-profile usage statistics.
///
/// `sessions_completed` increments exactly once per completed session
/// (timer expiry or explicit finish). `celebrated_milestones` only grows
/// and never holds a value outside the milestone schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub sessions_completed: u32,
    #[serde(default)]
    pub feedback_requested: bool,
    #[serde(default)]
    pub feedback_given: bool,
    /// Number of times a feedback prompt has been shown. Indexes the
    /// progressive feedback schedule; incremented only when a prompt is
    /// shown, not on every check.
    #[serde(default)]
    pub feedback_attempts: u32,
    #[serde(default)]
    pub nps_score: Option<u8>,
    #[serde(default)]
    pub nps_category: Option<NpsCategory>,
    #[serde(default)]
    pub nps_submission_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub celebrated_milestones: BTreeSet<u32>,
    #[serde(default = "Utc::now")]
    pub install_date: DateTime<Utc>,
    #[serde(default)]
    pub last_session_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_feedback_request: Option<DateTime<Utc>>,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            sessions_completed: 0,
            feedback_requested: false,
            feedback_given: false,
            feedback_attempts: 0,
            nps_score: None,
            nps_category: None,
            nps_submission_date: None,
            celebrated_milestones: BTreeSet::new(),
            install_date: Utc::now(),
            last_session_date: None,
            last_feedback_request: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_bands() {
        assert_eq!(NpsCategory::from_score(0), NpsCategory::Detractor);
        assert_eq!(NpsCategory::from_score(6), NpsCategory::Detractor);
        assert_eq!(NpsCategory::from_score(7), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_score(8), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_score(9), NpsCategory::Promoter);
        assert_eq!(NpsCategory::from_score(10), NpsCategory::Promoter);
    }

    #[test]
    fn stats_deserialize_from_sparse_json() {
        // Records written by older revisions carry only a subset of fields.
        let stats: UsageStats =
            serde_json::from_str(r#"{"sessions_completed": 4, "feedback_given": false}"#).unwrap();
        assert_eq!(stats.sessions_completed, 4);
        assert_eq!(stats.feedback_attempts, 0);
        assert!(stats.celebrated_milestones.is_empty());
    }
}
