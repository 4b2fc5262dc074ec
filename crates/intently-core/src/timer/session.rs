//! Session timer implementation.
//!
//! The timer is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` at roughly 1 Hz.
//! Remaining time is always derived from the absolute deadline, never from
//! a decrementing counter, so slow or missed ticks cannot drift the clock.
//!
//! ## State Transitions
//!
//! ```text
//! NoSession -> Selecting -> Running -> Completed -> (Running | NoSession)
//!                        -> InfiniteRunning -------> NoSession
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

/// Suggested upper bound for a session duration. Not a hard cap.
pub const SUGGESTED_MAX_MINUTES: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No intention set, nothing running.
    NoSession,
    /// Intention declared, duration not yet chosen.
    Selecting,
    Running,
    /// Open-ended session: no countdown, no completion except explicit finish.
    InfiniteRunning,
    Completed,
}

/// Requested session length: a countdown in minutes, or the "no timer"
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLength {
    Minutes(u64),
    Infinite,
}

/// One persisted timer record per tab.
///
/// Field names mirror the JSON blob stored by the content script so that
/// records survive across widget revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    pub active: bool,
    #[serde(default)]
    pub infinite: bool,
    /// Epoch milliseconds.
    pub start_time: u64,
    /// Epoch milliseconds. Absent for infinite sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    /// Recomputed whenever the timer is (re)started or extended.
    #[serde(default)]
    pub total_seconds: u64,
    /// Original requested duration, kept for display and restoration.
    #[serde(default)]
    pub minutes: u64,
    /// Label of the UI control that initiated the session, used to restore
    /// selection state after a reload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_label: Option<String>,
}

impl TimerRecord {
    /// Build a countdown record anchored at `now_ms`. Absurdly large
    /// durations saturate rather than wrap; the deadline never precedes
    /// the start.
    pub fn timed(minutes: u64, selected_label: Option<String>, now_ms: u64) -> Self {
        let total_seconds = minutes.saturating_mul(60);
        Self {
            active: true,
            infinite: false,
            start_time: now_ms,
            end_time: Some(now_ms.saturating_add(total_seconds.saturating_mul(1000))),
            total_seconds,
            minutes,
            selected_label,
        }
    }

    /// Build an open-ended record anchored at `now_ms`.
    pub fn infinite(selected_label: Option<String>, now_ms: u64) -> Self {
        Self {
            active: true,
            infinite: true,
            start_time: now_ms,
            end_time: None,
            total_seconds: 0,
            minutes: 0,
            selected_label,
        }
    }

    /// Seconds left on the countdown at `now_ms`, rounded up. Never negative;
    /// always 0 for infinite records.
    pub fn remaining_seconds(&self, now_ms: u64) -> u64 {
        match self.end_time {
            Some(end) => end.saturating_sub(now_ms).saturating_add(999) / 1000,
            None => 0,
        }
    }
}

/// Core session timer.
///
/// Operates on wall-clock deltas -- no internal thread. Persisting and
/// reloading the record is the owner's concern; see `IntentionWidget`.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    state: SessionState,
    record: Option<TimerRecord>,
    /// Guards completion so it fires exactly once even if several ticks
    /// observe `remaining == 0` before the caller stops its interval.
    completed_fired: bool,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: SessionState::NoSession,
            record: None,
            completed_fired: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn record(&self) -> Option<&TimerRecord> {
        self.record.as_ref()
    }

    /// Seconds left right now. 0 when idle, completed, or infinite.
    pub fn remaining_seconds(&self) -> u64 {
        match self.state {
            SessionState::Running => self
                .record
                .as_ref()
                .map(|r| r.remaining_seconds(now_ms()))
                .unwrap_or(0),
            _ => 0,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.record.as_ref().map(|r| r.total_seconds).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            SessionState::Running | SessionState::InfiniteRunning
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Intention declared; show the duration picker.
    pub fn begin_selection(&mut self) {
        if self.state == SessionState::NoSession {
            self.state = SessionState::Selecting;
        }
    }

    /// Start a new session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Rejects a zero-minute countdown. Durations above
    /// [`SUGGESTED_MAX_MINUTES`] are allowed.
    pub fn start(
        &mut self,
        length: SessionLength,
        selected_label: Option<String>,
    ) -> Result<Event, ValidationError> {
        let now = now_ms();
        let (record, minutes, infinite) = match length {
            SessionLength::Minutes(0) => {
                return Err(ValidationError::InvalidDuration { minutes: 0 });
            }
            SessionLength::Minutes(m) => (TimerRecord::timed(m, selected_label, now), Some(m), false),
            SessionLength::Infinite => (TimerRecord::infinite(selected_label, now), None, true),
        };

        self.record = Some(record);
        self.completed_fired = false;
        self.state = if infinite {
            SessionState::InfiniteRunning
        } else {
            SessionState::Running
        };

        Ok(Event::SessionStarted {
            minutes,
            infinite,
            at: Utc::now(),
        })
    }

    /// Call periodically while running. Returns a display refresh, or
    /// `SessionCompleted` exactly once when the deadline elapses. No-op for
    /// infinite sessions.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        let record = self.record.as_ref()?;
        let remaining = record.remaining_seconds(now_ms());

        if remaining == 0 {
            if self.completed_fired {
                return None;
            }
            self.completed_fired = true;
            self.state = SessionState::Completed;
            return Some(Event::SessionCompleted { at: Utc::now() });
        }

        Some(Event::Tick {
            remaining_seconds: remaining,
            total_seconds: record.total_seconds,
            at: Utc::now(),
        })
    }

    /// Extend a completed session. The new deadline is anchored at now --
    /// never added to the stale expired deadline, which would produce
    /// incorrect remaining-time displays.
    ///
    /// Returns `Ok(None)` when no completed session is waiting.
    ///
    /// # Errors
    ///
    /// Rejects a zero-minute extension.
    pub fn extend(&mut self, minutes: u64) -> Result<Option<Event>, ValidationError> {
        if minutes == 0 {
            return Err(ValidationError::InvalidDuration { minutes: 0 });
        }
        if self.state != SessionState::Completed {
            return Ok(None);
        }

        let selected_label = self
            .record
            .as_ref()
            .and_then(|r| r.selected_label.clone());
        let record = TimerRecord::timed(minutes, selected_label, now_ms());
        let remaining_seconds = record.total_seconds;

        self.record = Some(record);
        self.completed_fired = false;
        self.state = SessionState::Running;

        Ok(Some(Event::SessionExtended {
            minutes,
            remaining_seconds,
            at: Utc::now(),
        }))
    }

    /// Restore a persisted record after a page reload.
    ///
    /// Infinite sessions restore silently. A timed record whose deadline has
    /// already passed completes immediately -- remaining time is never
    /// negative. Otherwise ticking resumes from the persisted deadline so a
    /// reload does not reset the apparent remaining time.
    pub fn resume(&mut self, record: TimerRecord) -> Option<Event> {
        if !record.active {
            return None;
        }

        if record.infinite {
            self.record = Some(record);
            self.completed_fired = false;
            self.state = SessionState::InfiniteRunning;
            return None;
        }

        let end = record.end_time?;
        let now = now_ms();

        if now >= end {
            self.record = Some(record);
            self.completed_fired = true;
            self.state = SessionState::Completed;
            return Some(Event::SessionCompleted { at: Utc::now() });
        }

        let remaining_seconds = record.remaining_seconds(now);
        let total_seconds = record.total_seconds;
        self.record = Some(record);
        self.completed_fired = false;
        self.state = SessionState::Running;

        Some(Event::Tick {
            remaining_seconds,
            total_seconds,
            at: Utc::now(),
        })
    }

    /// Restore a session whose completion was already handled in a previous
    /// load, without firing completion again.
    pub fn restore_completed(&mut self, record: TimerRecord) {
        self.record = Some(record);
        self.completed_fired = true;
        self.state = SessionState::Completed;
    }

    /// Drop all timer state and return to `NoSession`.
    pub fn clear(&mut self) {
        self.state = SessionState::NoSession;
        self.record = None;
        self.completed_fired = false;
    }

    /// Whether completion has already been signalled for this session.
    pub fn completion_fired(&self) -> bool {
        self.completed_fired
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
