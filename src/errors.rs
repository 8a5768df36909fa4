use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by a search submission
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchError {
    #[error("No search input provided")]
    MissingInput,

    #[error("Search service unreachable: {message}")]
    TransportUnreachable { message: String },

    #[error("Search request failed: {message}")]
    SearchFailed { message: String },
}

impl SearchError {
    /// Create a user-friendly error message for display in the frontend
    pub fn user_message(&self) -> String {
        match self {
            SearchError::MissingInput => {
                "Please provide an image URL or upload a file.".to_string()
            }
            SearchError::TransportUnreachable { .. } => {
                "Network Error: Could not connect to the search service. Is it running?"
                    .to_string()
            }
            SearchError::SearchFailed { .. } => "An error occurred during the search.".to_string(),
        }
    }
}

/// Classify reqwest failures: a request that never reached the service is a
/// connectivity problem, everything else is a generic search failure.
impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            SearchError::TransportUnreachable {
                message: error.to_string(),
            }
        } else {
            SearchError::SearchFailed {
                message: error.to_string(),
            }
        }
    }
}

/// Result type alias for search operations
pub type SearchOpResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_user_message() {
        let error = SearchError::MissingInput;
        assert_eq!(
            error.user_message(),
            "Please provide an image URL or upload a file."
        );
    }

    #[test]
    fn test_transport_unreachable_user_message_names_connectivity() {
        let error = SearchError::TransportUnreachable {
            message: "connection refused".to_string(),
        };
        let message = error.user_message();
        assert!(message.contains("Could not connect"));
        assert!(message.contains("Network Error"));
    }

    #[test]
    fn test_search_failed_user_message_is_generic() {
        let error = SearchError::SearchFailed {
            message: "HTTP 500 Internal Server Error".to_string(),
        };
        let message = error.user_message();
        assert_eq!(message, "An error occurred during the search.");
        // Internal detail stays out of the user-facing message
        assert!(!message.contains("500"));
    }

    #[test]
    fn test_display_includes_detail() {
        let error = SearchError::TransportUnreachable {
            message: "dns error".to_string(),
        };
        assert!(error.to_string().contains("unreachable"));
        assert!(error.to_string().contains("dns error"));

        let error = SearchError::SearchFailed {
            message: "HTTP 422".to_string(),
        };
        assert!(error.to_string().contains("HTTP 422"));
    }

    #[test]
    fn test_error_serialization_round_trip() {
        let errors = vec![
            SearchError::MissingInput,
            SearchError::TransportUnreachable {
                message: "connection refused".to_string(),
            },
            SearchError::SearchFailed {
                message: "HTTP 503".to_string(),
            },
        ];

        for error in errors {
            let serialized = serde_json::to_string(&error).unwrap();
            let deserialized: SearchError = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, error);
        }
    }
}
