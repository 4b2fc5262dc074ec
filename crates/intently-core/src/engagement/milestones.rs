//! Milestone celebration schedule and presentation content.

use serde::{Deserialize, Serialize};

use super::stats::UsageStats;

/// Fixed ascending schedule of session-count thresholds that earn a
/// one-time celebration.
pub const MILESTONE_SCHEDULE: [u32; 6] = [3, 7, 15, 30, 50, 100];

/// Content for a celebration dialog, keyed by milestone value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestonePresentation {
    pub icon: String,
    pub title: String,
    pub message: String,
    pub subtitle: String,
    /// Call-to-action label on the share button.
    pub cta: String,
}

/// Smallest scheduled threshold the profile has reached but not yet
/// celebrated, if any.
pub fn check_milestone(stats: &UsageStats) -> Option<u32> {
    MILESTONE_SCHEDULE
        .iter()
        .copied()
        .find(|m| stats.sessions_completed >= *m && !stats.celebrated_milestones.contains(m))
}

/// Record that a milestone has been celebrated. Idempotent; values outside
/// the schedule never enter the set.
pub fn mark_celebrated(stats: &mut UsageStats, milestone: u32) {
    if MILESTONE_SCHEDULE.contains(&milestone) {
        stats.celebrated_milestones.insert(milestone);
    }
}

/// Celebration content for a milestone. Unrecognized values fall back to
/// the first schedule entry's content.
pub fn presentation_for(milestone: u32) -> MilestonePresentation {
    match milestone {
        7 => MilestonePresentation {
            icon: "🔥".into(),
            title: "You're on Fire!".into(),
            message: format!("{milestone} sessions down!"),
            subtitle: "You're becoming more focused every day.".into(),
            cta: "Share Your Progress".into(),
        },
        15 => MilestonePresentation {
            icon: "🧘".into(),
            title: "Mindful Master!".into(),
            message: format!("{milestone} sessions completed!"),
            subtitle: "You're mastering the art of intentional browsing.".into(),
            cta: "Give Feedback".into(),
        },
        30 => MilestonePresentation {
            icon: "👑".into(),
            title: "Consistency Champion!".into(),
            message: format!("{milestone} sessions! You're a champion!"),
            subtitle: "Your focus is inspiring. Keep it up!".into(),
            cta: "Share Your Experience".into(),
        },
        50 => MilestonePresentation {
            icon: "⭐".into(),
            title: "Legend Status!".into(),
            message: format!("Half century! {milestone} focused sessions!"),
            subtitle: "You're an absolute legend!".into(),
            cta: "Connect With Us".into(),
        },
        100 => MilestonePresentation {
            icon: "🎊".into(),
            title: "CENTURY!".into(),
            message: format!("{milestone} SESSIONS! You're unstoppable!"),
            subtitle: "This calls for a celebration! 🎉".into(),
            cta: "Celebrate With Us!".into(),
        },
        // 3, and the fallback for anything unrecognized.
        other => MilestonePresentation {
            icon: "🎯".into(),
            title: "Great Start!".into(),
            message: format!("You've completed {other} focused sessions!"),
            subtitle: "You're building a mindful habit!".into(),
            cta: "Share Feedback".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_uncelebrated_threshold_wins() {
        let mut stats = UsageStats::default();
        stats.sessions_completed = 3;
        assert_eq!(check_milestone(&stats), Some(3));

        mark_celebrated(&mut stats, 3);
        stats.sessions_completed = 5;
        assert_eq!(check_milestone(&stats), None);

        stats.sessions_completed = 7;
        assert_eq!(check_milestone(&stats), Some(7));
    }

    #[test]
    fn skipped_thresholds_surface_lowest_first() {
        let mut stats = UsageStats::default();
        // A profile can jump several thresholds between checks (e.g. counter
        // races from concurrent tabs); the smallest fires first.
        stats.sessions_completed = 20;
        assert_eq!(check_milestone(&stats), Some(3));
        mark_celebrated(&mut stats, 3);
        assert_eq!(check_milestone(&stats), Some(7));
    }

    #[test]
    fn mark_celebrated_is_idempotent() {
        let mut stats = UsageStats::default();
        mark_celebrated(&mut stats, 3);
        mark_celebrated(&mut stats, 3);
        assert_eq!(stats.celebrated_milestones.iter().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn values_outside_schedule_never_enter_the_set() {
        let mut stats = UsageStats::default();
        mark_celebrated(&mut stats, 4);
        mark_celebrated(&mut stats, 0);
        assert!(stats.celebrated_milestones.is_empty());
    }

    #[test]
    fn unknown_milestone_falls_back_to_first_entry_content() {
        let p = presentation_for(42);
        assert_eq!(p.title, "Great Start!");
        assert!(p.message.contains("42"));
    }

    #[test]
    fn every_scheduled_milestone_has_distinct_content() {
        let titles: Vec<String> = MILESTONE_SCHEDULE
            .iter()
            .map(|m| presentation_for(*m).title)
            .collect();
        let mut deduped = titles.clone();
        deduped.dedup();
        assert_eq!(titles, deduped);
    }
}
