//! Error taxonomy shared by sources, stores and the poller

use thiserror::Error;

/// Failure talking to the external weather provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed provider payload: {0}")]
    Parse(String),

    #[error("Provider payload missing field: {0}")]
    MissingField(&'static str),

    #[error("Timed out after {0}s waiting for provider")]
    Timeout(u64),
}

/// Persistence failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
pub type StoreResult<T> = Result<T, StoreError>;
