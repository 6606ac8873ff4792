//! Error types
//!
//! Collisions and game over are gameplay events, not errors. Only bad
//! configuration and high-score storage can fail.

/// Rejected game configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// High-score storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store format error: {0}")]
    Format(#[from] serde_json::Error),
}
