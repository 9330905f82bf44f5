use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
