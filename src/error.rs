use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ini::Error),

    #[error("GroupMe API error ({status}): {message}")]
    GroupMeApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Completion API error ({status}): {message}")]
    CompletionApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Completion response error: {0}")]
    CompletionResponse(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl BotError {
    /// Returns true for errors raised by a remote service rather than by local setup.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            BotError::GroupMeApi { .. }
                | BotError::CompletionApi { .. }
                | BotError::CompletionResponse(_)
                | BotError::Reqwest(_)
                | BotError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_not_remote() {
        assert!(!BotError::Config("missing token".to_string()).is_remote());
    }

    #[test]
    fn api_errors_are_remote() {
        let err = BotError::CompletionApi {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            message: "slow down".to_string(),
        };
        assert!(err.is_remote());
        assert_eq!(
            err.to_string(),
            "Completion API error (429 Too Many Requests): slow down"
        );
    }
}
