use thiserror::Error;

use crate::filters::Platform;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unknown category '{name}' for platform {platform}")]
    UnknownCategory { platform: Platform, name: String },
    #[error("{failed} of {total} contract cases failed")]
    CasesFailed { failed: usize, total: usize },
}

pub type ContractResult<T> = Result<T, ContractError>;
