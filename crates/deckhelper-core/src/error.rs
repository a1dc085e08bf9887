use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckHelperError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A fuzzy card lookup matched nothing. The message is shown to the user as-is.
    #[error("{0}")]
    NotFound(String),

    #[error("{endpoint} request failed with status code {status}")]
    RequestFailed { endpoint: String, status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeckHelperError {
    pub fn card_not_found(name: &str) -> Self {
        Self::NotFound(format!("No card found for \"{}\".", name))
    }

    pub fn request_failed(endpoint: impl Into<String>, status: u16) -> Self {
        Self::RequestFailed {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Status code carried by a failed request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckHelperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_quotes_the_query() {
        let err = DeckHelperError::card_not_found("Sol Rnig");
        assert_eq!(err.to_string(), "No card found for \"Sol Rnig\".");
    }

    #[test]
    fn request_failed_carries_status() {
        let err = DeckHelperError::request_failed("Partner", 503);
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            err.to_string(),
            "Partner request failed with status code 503"
        );
    }
}
