use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Rate limited by upstream service")]
    RateLimited,

    #[error("Upstream API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Assistant run {status}")]
    RunTerminated { status: String },

    #[error("Assistant run timeout")]
    RunTimeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to render instructions: {0}")]
    Template(#[from] tera::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
