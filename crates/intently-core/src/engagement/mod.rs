pub mod feedback;
pub mod gate;
pub mod milestones;
mod stats;

pub use gate::{evaluate, record_completion, EngagementOutcome};
pub use milestones::{MilestonePresentation, MILESTONE_SCHEDULE};
pub use feedback::FEEDBACK_SCHEDULE;
pub use stats::{NpsCategory, UsageStats};
