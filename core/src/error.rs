use thiserror::Error;

/// Message shown when a requested title has no match in the catalog.
pub const TITLE_NOT_FOUND_MESSAGE: &str =
    "Sorry, that movie is not in the dataset. Please check your spelling or try another title.";

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("title not found: {0:?}")]
    TitleNotFound(String),

    #[error("no title entered")]
    EmptyTitle,

    #[error("{feature} weight must be between {min} and {max}, got {value}")]
    InvalidWeight { feature: &'static str, value: i64, min: u8, max: u8 },

    #[error("record {title:?} has a malformed {field} field")]
    MalformedRecord { title: String, field: &'static str },

    #[error("no recommendations possible: {0}")]
    Vectorization(String),

    #[error("movie index {index} out of range for catalog of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("catalog record error in {path}: {reason}")]
    Record { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecommendError {
    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            RecommendError::TitleNotFound(_) => TITLE_NOT_FOUND_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type RecommendResult<T> = Result<T, RecommendError>;
