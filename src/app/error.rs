use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub error: String,
    pub code: String,
    pub trace_id: String,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            trace_id: trace_id.into(),
        }
    }

    pub fn validation(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new("ERR_VALIDATION", message, trace_id)
    }

    pub fn dependency(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new("ERR_DEPENDENCY", message, trace_id)
    }

    pub fn system(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new("ERR_SYSTEM", message, trace_id)
    }

    /// An expected UI or network state was not observed within its timeout.
    /// Fails the current BVT case immediately; never retried at this level.
    pub fn assertion(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new("ERR_ASSERTION", message, trace_id)
    }

    /// A UI element that no longer exists in a launcher's design.
    /// Permanent capability gap, not a transient failure.
    pub fn unsupported(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new("ERR_UNSUPPORTED", message, trace_id)
    }

    pub fn is_unsupported(&self) -> bool {
        self.code == "ERR_UNSUPPORTED"
    }

    pub fn is_assertion(&self) -> bool {
        self.code == "ERR_ASSERTION"
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.code)
    }
}

impl std::error::Error for AppError {}
