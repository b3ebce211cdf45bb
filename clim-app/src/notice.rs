use clim_core::ClimateError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Dismissible banner; the chart keeps its last good drawing.
    Banner,
    /// One-off alert, e.g. after an invalid route was redirected.
    Alert,
    /// Nothing works until the page or process is reloaded.
    Fatal,
}

/// A user-visible message raised by the draw orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn from_error(err: &ClimateError) -> Self {
        let kind = match err {
            ClimateError::StorageDeprecated { .. } | ClimateError::StorageUnsupported(_) => {
                NoticeKind::Fatal
            }
            ClimateError::InvalidRoute(_) => NoticeKind::Alert,
            ClimateError::DataUnavailable { .. } | ClimateError::Storage(_) => NoticeKind::Banner,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }

    pub fn is_dismissible(&self) -> bool {
        self.kind != NoticeKind::Fatal
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Fatal => write!(f, "[fatal] {}", self.message),
            NoticeKind::Alert => write!(f, "[alert] {}", self.message),
            NoticeKind::Banner => write!(f, "{}", self.message),
        }
    }
}
