//! Intently core library.
//!
//! The engine behind the intention widget: declare an intention for a
//! browsing session, run a countdown (or an open-ended session) against a
//! wall-clock deadline, and on completion run the engagement gate that
//! decides between a milestone celebration, a feedback prompt, or nothing.
//!
//! State survives page reloads through two stores: a per-tab JSON record
//! for the intention and timer, and a per-profile SQLite database for
//! usage statistics, the anonymous survey id, and the session log.
//!
//! [`IntentionWidget`] ties the pieces together; the individual modules
//! are usable on their own.

pub mod engagement;
pub mod error;
pub mod events;
pub mod storage;
pub mod survey;
pub mod timer;
mod widget;

pub use engagement::{
    EngagementOutcome, MilestonePresentation, NpsCategory, UsageStats, FEEDBACK_SCHEDULE,
    MILESTONE_SCHEDULE,
};
pub use error::{CoreError, Result, StorageError, SurveyError, ValidationError};
pub use events::Event;
pub use storage::{Config, ProfileDb, SessionSummary, TabRecord, TabStore};
pub use survey::{NpsReport, SurveyClient, DEFAULT_SURVEY_ENDPOINT};
pub use timer::{SessionLength, SessionState, SessionTimer, TimerRecord, SUGGESTED_MAX_MINUTES};
pub use widget::IntentionWidget;
