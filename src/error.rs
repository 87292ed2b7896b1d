use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodScoreError {
    #[error("Invalid pod record at index {index}: {reason}")]
    ValidationError { index: usize, reason: String },

    #[error("Cannot score pod {pod_name}: {reason}")]
    DomainError { pod_name: String, reason: String },

    #[error("Failed to decode pod metrics: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of a [`PodScoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Domain,
    Decode,
    Config,
    Metrics,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Domain => "domain",
            ErrorKind::Decode => "decode",
            ErrorKind::Config => "config",
            ErrorKind::Metrics => "metrics",
            ErrorKind::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PodScoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PodScoreError::ValidationError { .. } => ErrorKind::Validation,
            PodScoreError::DomainError { .. } => ErrorKind::Domain,
            PodScoreError::DecodeError(_) => ErrorKind::Decode,
            PodScoreError::ConfigError(_) => ErrorKind::Config,
            PodScoreError::MetricsError(_) => ErrorKind::Metrics,
            PodScoreError::IoError(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn domain(pod_name: &str, reason: impl Into<String>) -> Self {
        PodScoreError::DomainError {
            pod_name: pod_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(index: usize, reason: impl Into<String>) -> Self {
        PodScoreError::ValidationError {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PodScoreError>;
