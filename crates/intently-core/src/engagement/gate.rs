//! Engagement gate: decides which dialog, if any, follows a completed
//! session.
//!
//! Two ordered policies run after every completion. The milestone check
//! always goes first; if a milestone fires, the feedback check is skipped
//! for that cycle. That mutual exclusion is a product policy choice, not a
//! hard invariant.

use chrono::{DateTime, Utc};

use super::feedback;
use super::milestones::{self, MilestonePresentation};
use super::stats::UsageStats;

/// Decision surfaced to the presentation layer after a session ends.
#[derive(Debug, Clone, PartialEq)]
pub enum EngagementOutcome {
    /// Celebrate a freshly reached milestone.
    Celebrate {
        milestone: u32,
        presentation: MilestonePresentation,
    },
    /// Show the NPS feedback prompt.
    RequestFeedback { sessions_completed: u32 },
    /// Nothing to show this cycle.
    Nothing,
}

/// Count a completed session and evaluate both policies.
///
/// The caller persists the mutated stats afterwards; concurrent tabs can
/// race on that read-modify-write, and a miscount of one is tolerated.
pub fn record_completion(stats: &mut UsageStats, now: DateTime<Utc>) -> EngagementOutcome {
    stats.sessions_completed += 1;
    stats.last_session_date = Some(now);
    evaluate(stats, now)
}

/// Evaluate the milestone and feedback policies without counting a session.
pub fn evaluate(stats: &mut UsageStats, now: DateTime<Utc>) -> EngagementOutcome {
    if let Some(milestone) = milestones::check_milestone(stats) {
        milestones::mark_celebrated(stats, milestone);
        return EngagementOutcome::Celebrate {
            milestone,
            presentation: milestones::presentation_for(milestone),
        };
    }

    if feedback::should_request(stats) {
        feedback::mark_requested(stats, now);
        return EngagementOutcome::RequestFeedback {
            sessions_completed: stats.sessions_completed,
        };
    }

    EngagementOutcome::Nothing
}
