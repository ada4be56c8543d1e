//! User-facing feedback produced at the tool boundary.

use std::fmt;

use crate::RenderError;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    /// Something happened as requested.
    Info,
    /// The action completed with a fallback.
    Warning,
    /// The action did not complete.
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A non-fatal message for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Warning notice.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Whether this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

impl From<RenderError> for Notice {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::SurfaceUnavailable(reason) => {
                Self::error(format!("The canvas is not available ({reason})"))
            }
            RenderError::SourceImageLoad(reason) => {
                Self::warning(format!("Could not use that image, drawing without it ({reason})"))
            }
            RenderError::MalformedPrimitive(reason) => {
                Self::warning(format!("Shape skipped: {reason}"))
            }
            other => Self::error(other.to_string()),
        }
    }
}
