//! Widget façade consumed by the presentation layer.
//!
//! Owns the session timer plus explicit handles to the tab-local and
//! profile stores -- no ambient globals, no lookup by string identifier.
//! Every operation returns the events it emitted; the surrounding UI layer
//! renders them and forwards user choices back in.
//!
//! Storage failures are logged and swallowed here: the widget degrades to
//! in-memory operation for the rest of the session and nothing is surfaced
//! to the user.

use chrono::{DateTime, Utc};

use crate::engagement::{self, feedback, EngagementOutcome, UsageStats};
use crate::error::{CoreError, StorageError, ValidationError};
use crate::events::Event;
use crate::storage::{Config, ProfileDb, TabRecord, TabStore};
use crate::survey::NpsReport;
use crate::timer::{SessionLength, SessionState, SessionTimer, TimerRecord};

fn warn_storage(context: &str, err: &StorageError) {
    eprintln!("Warning: {context}: {err}");
}

/// One intention widget instance, as injected into a single tab.
pub struct IntentionWidget {
    timer: SessionTimer,
    intention: Option<String>,
    tab: Option<TabStore>,
    profile: Option<ProfileDb>,
    /// Last known stats, used when the profile store is unavailable.
    fallback_stats: UsageStats,
    celebrations_enabled: bool,
}

impl IntentionWidget {
    /// Construct with explicit store handles. `None` means the matching
    /// storage already failed and the widget runs in-memory.
    pub fn new(
        tab: Option<TabStore>,
        profile: Option<ProfileDb>,
        celebrations_enabled: bool,
    ) -> Self {
        Self {
            timer: SessionTimer::new(),
            intention: None,
            tab,
            profile,
            fallback_stats: UsageStats::default(),
            celebrations_enabled,
        }
    }

    /// Open both stores for a tab, degrading to in-memory on failure.
    pub fn open(tab_id: &str) -> Self {
        let tab = TabStore::open(tab_id)
            .map_err(|e| warn_storage("tab store unavailable", &e))
            .ok();
        let profile = ProfileDb::open()
            .map_err(|e| warn_storage("profile store unavailable", &e))
            .ok();
        let config = Config::load_or_default();
        Self::new(tab, profile, config.engagement.celebrations)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.timer.state()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn intention(&self) -> Option<&str> {
        self.intention.as_deref()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.timer.remaining_seconds()
    }

    /// Current usage statistics (in-memory copy when storage is down).
    pub fn usage_stats(&mut self) -> UsageStats {
        self.load_stats()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Restore persisted state on page (re)load.
    ///
    /// A timed session whose deadline passed while the tab was gone
    /// completes now and runs the engagement gate, unless a previous load
    /// already handled that completion.
    pub fn restore(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        let record = match &self.tab {
            Some(tab) => tab.load().unwrap_or_else(|e| {
                warn_storage("failed to restore tab state", &e);
                TabRecord::default()
            }),
            None => TabRecord::default(),
        };

        self.intention = record.intention;

        match record.timer {
            Some(timer_record) if timer_record.active => {
                if let Some(event) = self.timer.resume(timer_record) {
                    let completed = matches!(event, Event::SessionCompleted { .. });
                    events.push(event);
                    if completed {
                        self.persist_tab();
                        self.handle_completion(&mut events);
                    }
                }
            }
            Some(timer_record) => {
                // Completion was already counted before the reload.
                self.timer.restore_completed(timer_record);
            }
            None => {
                if self.intention.is_some() {
                    self.timer.begin_selection();
                }
            }
        }

        events
    }

    /// Declare (or replace) the intention and show the duration picker.
    pub fn set_intention(&mut self, text: &str) {
        self.intention = Some(text.to_string());
        self.timer.begin_selection();
        self.persist_tab();
    }

    /// Start a session: a countdown or the "no timer" sentinel.
    ///
    /// # Errors
    /// Rejects a zero-minute countdown.
    pub fn start_session(
        &mut self,
        length: SessionLength,
        selected_label: Option<String>,
    ) -> Result<Vec<Event>, ValidationError> {
        let event = self.timer.start(length, selected_label)?;
        self.persist_tab();
        Ok(vec![event])
    }

    /// Advance the countdown once. Call at 1 Hz while a session runs.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(event) = self.timer.tick() {
            let completed = matches!(event, Event::SessionCompleted { .. });
            events.push(event);
            if completed {
                self.persist_tab();
                self.handle_completion(&mut events);
            }
        }
        events
    }

    /// Extend a completed session, anchored at now.
    ///
    /// # Errors
    /// Rejects a zero-minute extension.
    pub fn extend_session(&mut self, minutes: u64) -> Result<Vec<Event>, ValidationError> {
        let mut events = Vec::new();
        if let Some(event) = self.timer.extend(minutes)? {
            events.push(event);
            self.persist_tab();
        }
        Ok(events)
    }

    /// Explicitly finish the session ("new intention"). Counts as a
    /// completed session unless timer expiry already counted it.
    pub fn finish_session(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.timer.state() == SessionState::NoSession && self.intention.is_none() {
            return events;
        }

        events.push(Event::SessionFinished { at: Utc::now() });
        if self.timer.record().is_some() && !self.timer.completion_fired() {
            self.handle_completion(&mut events);
        }

        self.clear_tab();
        events
    }

    /// Abandon the session and clear the intention without counting a
    /// completion.
    pub fn reset_intention(&mut self) -> Vec<Event> {
        self.clear_tab();
        vec![Event::IntentionReset { at: Utc::now() }]
    }

    /// Validate and persist an NPS rating, returning the report to submit
    /// to the survey endpoint. Local state is final once this returns Ok;
    /// the network send is the caller's fire-and-forget concern.
    ///
    /// # Errors
    /// Rejects scores outside 0-10 without touching persisted state.
    pub fn submit_nps(&mut self, score: i32) -> Result<NpsReport, CoreError> {
        let now = Utc::now();
        let mut stats = self.load_stats();
        let category = feedback::save_nps(&mut stats, score, now)?;
        self.store_stats(&stats);

        let anonymous_id = match &self.profile {
            Some(profile) => profile.anonymous_id().unwrap_or_else(|e| {
                warn_storage("failed to load anonymous id", &e);
                "user-anonymous".to_string()
            }),
            None => "user-anonymous".to_string(),
        };

        Ok(NpsReport {
            score: score as u8,
            category,
            sessions_completed: stats.sessions_completed,
            submitted_at: now,
            anonymous_id,
        })
    }

    /// User declined the feedback prompt; future prompts stay possible.
    pub fn skip_feedback(&mut self) {
        let mut stats = self.load_stats();
        feedback::mark_declined(&mut stats);
        self.store_stats(&stats);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn handle_completion(&mut self, events: &mut Vec<Event>) {
        let now = Utc::now();
        let mut stats = self.load_stats();
        let mut outcome = engagement::record_completion(&mut stats, now);
        if !self.celebrations_enabled {
            if let EngagementOutcome::Celebrate { .. } = outcome {
                outcome = EngagementOutcome::Nothing;
            }
        }
        self.store_stats(&stats);
        self.log_session(now);

        match outcome {
            EngagementOutcome::Celebrate {
                milestone,
                presentation,
            } => events.push(Event::MilestoneReached {
                milestone,
                presentation,
                at: now,
            }),
            EngagementOutcome::RequestFeedback { sessions_completed } => {
                events.push(Event::FeedbackEligible {
                    sessions_completed,
                    at: now,
                })
            }
            EngagementOutcome::Nothing => {}
        }
    }

    fn log_session(&self, completed_at: DateTime<Utc>) {
        let Some(profile) = &self.profile else { return };
        let Some(record) = self.timer.record() else {
            return;
        };
        let started_at = DateTime::<Utc>::from_timestamp_millis(record.start_time as i64)
            .unwrap_or(completed_at);
        if let Err(e) = profile.record_session(
            self.intention.as_deref(),
            record.minutes,
            record.infinite,
            started_at,
            completed_at,
        ) {
            warn_storage("failed to log session", &e);
        }
    }

    fn load_stats(&mut self) -> UsageStats {
        if let Some(profile) = &self.profile {
            match profile.load_stats() {
                Ok(stats) => {
                    self.fallback_stats = stats.clone();
                    return stats;
                }
                Err(e) => warn_storage("failed to load usage stats", &e),
            }
        }
        self.fallback_stats.clone()
    }

    fn store_stats(&mut self, stats: &UsageStats) {
        self.fallback_stats = stats.clone();
        if let Some(profile) = &self.profile {
            if let Err(e) = profile.save_stats(stats) {
                warn_storage("failed to save usage stats", &e);
            }
        }
    }

    /// Write the current intention and timer record, marking the record
    /// inactive once the session has completed.
    fn persist_tab(&self) {
        let Some(tab) = &self.tab else { return };

        if self.intention.is_none() && self.timer.record().is_none() {
            if let Err(e) = tab.clear() {
                warn_storage("failed to clear tab state", &e);
            }
            return;
        }

        let timer = self.timer.record().cloned().map(|mut r| {
            r.active = self.timer.is_running();
            r
        });
        let record = TabRecord {
            intention: self.intention.clone(),
            timer,
        };
        if let Err(e) = tab.save(&record) {
            warn_storage("failed to persist tab state", &e);
        }
    }

    fn clear_tab(&mut self) {
        self.timer.clear();
        self.intention = None;
        if let Some(tab) = &self.tab {
            if let Err(e) = tab.clear() {
                warn_storage("failed to clear tab state", &e);
            }
        }
    }
}
