use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Authentication against {url} failed: {source}")]
    AuthenticationError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {url} failed: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Storage error: {0}")]
    StoreError(#[from] storage::StorageError),
}

impl ImporterError {
    pub fn fetch(url: impl Into<String>) -> impl FnOnce(reqwest::Error) -> Self {
        let url = url.into();
        move |source| Self::FetchError { url, source }
    }
}
