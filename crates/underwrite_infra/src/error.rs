//! Infra error types. One enum per subsystem.

/// Why a policy source could not become the active policy.
///
/// Never surfaces through the engine API: the store answers every variant by
/// installing the embedded fallback and recording the message for status.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy source {origin} unreadable: {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("policy source {origin} is not a valid policy document: {message}")]
    Parse { origin: String, message: String },

    #[error("policy source {origin} failed validation: {}", .diagnostics.join("; "))]
    Invalid {
        origin: String,
        diagnostics: Vec<String>,
    },
}

impl PolicyError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Parse { .. } => "parse",
            Self::Invalid { .. } => "invalid",
        }
    }
}

/// Engine configuration errors. An explicit value that cannot be used is
/// rejected rather than replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config fail-closed: {name}={value:?} is invalid ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}
