//! Composition Context: the environment a prompt is built in
use chrono::{Local, NaiveDateTime};

/// Messages kept in the history block unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

pub const DEFAULT_SESSION_INFO: &str = "New conversation session";

/// Inputs that would otherwise be read from the environment during
/// composition. Passing them in keeps block construction deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    /// Moment the current turn is stamped with
    pub now: NaiveDateTime,
    /// Most recent messages kept in the history block
    pub history_limit: usize,
    pub session_info: String,
}

impl PromptContext {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            history_limit: DEFAULT_HISTORY_LIMIT,
            session_info: DEFAULT_SESSION_INFO.to_string(),
        }
    }

    /// Context stamped with the local wall-clock time
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_session_info(mut self, info: impl Into<String>) -> Self {
        self.session_info = info.into();
        self
    }
}
