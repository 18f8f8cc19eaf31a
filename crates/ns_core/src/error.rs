use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("News provider error ({code}): {message}")]
    Provider { code: String, message: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Malformed article: {0}")]
    MalformedArticle(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True when the failure came from talking to an upstream service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Provider { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message() {
        let err = Error::Provider {
            code: "apiKeyInvalid".to_string(),
            message: "Your API key is invalid".to_string(),
        };
        assert_eq!(err.to_string(), "News provider error (apiKeyInvalid): Your API key is invalid");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_model_errors_are_not_upstream() {
        assert!(!Error::ModelLoad("missing weights".to_string()).is_upstream());
        assert!(!Error::InvalidQuery("empty".to_string()).is_upstream());
    }
}
