use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutocompleteError {
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),

    #[error("malformed match list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for AutocompleteError {
    fn from(error: ureq::Error) -> Self {
        Self::Http(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, AutocompleteError>;
