//! Rate limit result types

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// The sliding windows tracked per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitWindow {
    Minute,
    Hour,
}

impl LimitWindow {
    pub fn duration(&self) -> Duration {
        match self {
            LimitWindow::Minute => Duration::from_secs(60),
            LimitWindow::Hour => Duration::from_secs(60 * 60),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitWindow::Minute => "minute",
            LimitWindow::Hour => "hour",
        }
    }
}

impl fmt::Display for LimitWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Which window was exceeded, if any.
    pub exceeded_window: Option<LimitWindow>,
}

impl RateLimitResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            exceeded_window: None,
        }
    }

    pub fn rejected(window: LimitWindow) -> Self {
        Self {
            allowed: false,
            exceeded_window: Some(window),
        }
    }
}
