use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote backend is not configured")]
    NotConfigured,

    #[error("remote backend unreachable: {0}")]
    Unreachable(String),

    #[error("remote backend rejected credentials: {0}")]
    Unauthorized(String),

    #[error("remote backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response from remote backend: {0}")]
    Decode(String),

    #[error("invalid remote configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("local mirror I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("local mirror entry `{key}` is corrupt: {message}")]
    Corrupt { key: String, message: String },
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary service is not configured")]
    NotConfigured,

    #[error("summary request failed: {0}")]
    Request(String),

    #[error("summary service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}
