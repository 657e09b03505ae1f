use thiserror::Error;

/// Failure reported by a host operation.
///
/// The loader treats every one of these as unrecoverable; the variants
/// exist so diagnostics can say what the host refused to do.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("stream does not exist")]
    NotFound,
    #[error("access denied")]
    Denied,
    #[error("invalid argument")]
    Invalid,
    #[error("{0}")]
    Io(String),
}
