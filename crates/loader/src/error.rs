use manifest::ManifestError;
use thiserror::Error;

/// Why bootstrap stopped.
///
/// There is no recovery path for any of these: the loader is a one-shot
/// trust gate, so every variant ends the process with a diagnostic and a
/// non-zero exit. The variants classify the diagnostic, nothing more.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    /// A manifest key is missing, malformed or contradictory.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The host refused an open, read, map or allocation.
    #[error("resource error: {0}")]
    Resource(String),
    /// A binary image, string-table file or manifest document is malformed.
    #[error("format error: {0}")]
    Format(String),
    /// Untrusted input was presented without a matching opt-in.
    #[error("policy violation: {0}")]
    PolicyViolation(String),
}

impl BootstrapError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub fn policy(message: impl Into<String>) -> Self {
        Self::PolicyViolation(message.into())
    }

    /// Prefixes the diagnostic, keeping the classification.
    pub fn context(self, prefix: &str) -> Self {
        match self {
            Self::Configuration(m) => Self::Configuration(format!("{prefix}: {m}")),
            Self::Resource(m) => Self::Resource(format!("{prefix}: {m}")),
            Self::Format(m) => Self::Format(format!("{prefix}: {m}")),
            Self::PolicyViolation(m) => Self::PolicyViolation(format!("{prefix}: {m}")),
        }
    }
}

impl From<ManifestError> for BootstrapError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Syntax(_) => Self::Format(err.to_string()),
            _ => Self::Configuration(err.to_string()),
        }
    }
}
