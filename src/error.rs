use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloranetError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// An action whose failure was already reported as feedback
    #[error("{0}")]
    ActionFailed(String),

    #[error("{resource} does not support {mutation}")]
    UnsupportedMutation {
        resource: &'static str,
        mutation: &'static str,
    },

    #[error("record '{0}' not found")]
    RecordNotFound(String),

    #[error("invalid record id '{0}'")]
    InvalidRecordId(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FloranetError {
    /// Message suitable for a feedback notification.
    ///
    /// API errors surface the backend's own text verbatim.
    pub fn feedback_message(&self) -> String {
        match self {
            FloranetError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error was raised before any network call was made
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FloranetError::Validation(_) | FloranetError::UnsupportedMutation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FloranetError>;
