use thiserror::Error;

/// Why a score hand-off was rejected
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SubmitError {
    #[error("nickname is empty")]
    EmptyNickname,
    #[error("nickname too long: {len} chars (max {max})")]
    NicknameTooLong { len: usize, max: usize },
    #[error("invalid score: {score}")]
    InvalidScore { score: f64 },
    #[error("ranking service unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Settings could not be read or failed validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("touch sensitivity must be positive and finite, got {value}")]
    InvalidSensitivity { value: f32 },
    #[error("nickname is empty")]
    EmptyNickname,
    #[error("nickname too long: {len} chars (max {max})")]
    NicknameTooLong { len: usize, max: usize },
}
