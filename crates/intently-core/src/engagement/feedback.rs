//! Progressive NPS feedback prompting.
//!
//! The prompt schedule backs off as attempts accumulate, so a user who
//! keeps declining sees the survey less and less often. This supersedes the
//! earlier request-once-retry-at-six policy.

use chrono::{DateTime, Utc};

use super::stats::{NpsCategory, UsageStats};
use crate::error::ValidationError;

/// Session-count thresholds indexed by the number of prompts already shown.
pub const FEEDBACK_SCHEDULE: [u32; 6] = [2, 5, 12, 30, 70, 100];

/// Threshold applied once the schedule is exhausted.
const FALLBACK_THRESHOLD: u32 = 100;

/// Session count at which the next prompt becomes eligible.
pub fn next_threshold(attempts: u32) -> u32 {
    FEEDBACK_SCHEDULE
        .get(attempts as usize)
        .copied()
        .unwrap_or(FALLBACK_THRESHOLD)
}

/// Whether a feedback prompt should be shown now.
pub fn should_request(stats: &UsageStats) -> bool {
    stats.sessions_completed >= next_threshold(stats.feedback_attempts) && !stats.feedback_given
}

/// Record that a prompt was shown. Advances the schedule.
pub fn mark_requested(stats: &mut UsageStats, now: DateTime<Utc>) {
    stats.feedback_requested = true;
    stats.feedback_attempts += 1;
    stats.last_feedback_request = Some(now);
}

/// User declined the prompt: noted, but a future prompt stays possible per
/// the schedule.
pub fn mark_declined(stats: &mut UsageStats) {
    stats.feedback_requested = true;
}

/// Validate and persist an NPS rating. Terminal: once feedback is given, no
/// further prompts are ever eligible.
///
/// # Errors
///
/// Rejects scores outside 0-10 without mutating `stats`.
pub fn save_nps(
    stats: &mut UsageStats,
    score: i32,
    now: DateTime<Utc>,
) -> Result<NpsCategory, ValidationError> {
    if !(0..=10).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange { score });
    }
    let score = score as u8;
    let category = NpsCategory::from_score(score);

    stats.nps_score = Some(score);
    stats.nps_category = Some(category);
    stats.nps_submission_date = Some(now);
    stats.feedback_given = true;

    Ok(category)
}
