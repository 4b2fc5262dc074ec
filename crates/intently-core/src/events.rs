use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engagement::MilestonePresentation;

/// Every state change in the core produces an Event.
/// The presentation layer (dialogs, buttons, the CLI) renders these and
/// forwards user choices back into the widget's operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        /// Requested duration; absent for open-ended sessions.
        minutes: Option<u64>,
        infinite: bool,
        at: DateTime<Utc>,
    },
    /// Periodic display refresh for a running countdown.
    Tick {
        remaining_seconds: u64,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    /// Fired exactly once per session when the deadline elapses.
    SessionCompleted {
        at: DateTime<Utc>,
    },
    SessionExtended {
        minutes: u64,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// Session explicitly finished by the user.
    SessionFinished {
        at: DateTime<Utc>,
    },
    /// Session abandoned; intention cleared without counting a completion.
    IntentionReset {
        at: DateTime<Utc>,
    },
    MilestoneReached {
        milestone: u32,
        presentation: MilestonePresentation,
        at: DateTime<Utc>,
    },
    FeedbackEligible {
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
}
