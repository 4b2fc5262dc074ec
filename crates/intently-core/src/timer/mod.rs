mod session;

pub(crate) use session::now_ms;
pub use session::{
    SessionLength, SessionState, SessionTimer, TimerRecord, SUGGESTED_MAX_MINUTES,
};
