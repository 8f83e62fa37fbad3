use thiserror::Error;

pub const EMPTY_QUERY_MESSAGE: &str = "empty query";
pub const NETWORK_ERROR_MESSAGE: &str = "network error: could not reach the weather service";
pub const LOCATION_NOT_FOUND_MESSAGE: &str = "could not find location";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "unexpected response from the weather service";

/// Everything that can go wrong between a submitted query and a rendered record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty query")]
    EmptyQuery,

    /// No response was received (connection refused, DNS failure, reset, ...).
    #[error("request to the weather provider failed")]
    Network(#[source] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("weather provider returned status {status}")]
    Provider { status: u16, message: Option<String> },

    /// A 2xx response whose body could not be parsed.
    #[error("failed to decode weather provider response")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// Text shown to the user in place of the weather details.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::EmptyQuery => EMPTY_QUERY_MESSAGE.to_string(),
            FetchError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            FetchError::Provider { message: Some(msg), .. } if !msg.trim().is_empty() => {
                msg.clone()
            }
            FetchError::Provider { .. } => LOCATION_NOT_FOUND_MESSAGE.to_string(),
            FetchError::Decode(_) => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_passed_through() {
        let err = FetchError::Provider {
            status: 400,
            message: Some("No matching location found.".into()),
        };
        assert_eq!(err.user_message(), "No matching location found.");
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn provider_without_message_falls_back() {
        let err = FetchError::Provider { status: 404, message: None };
        assert_eq!(err.user_message(), LOCATION_NOT_FOUND_MESSAGE);

        let blank = FetchError::Provider { status: 400, message: Some("  ".into()) };
        assert_eq!(blank.user_message(), LOCATION_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn decode_and_empty_messages() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(FetchError::Decode(json_err).user_message(), UNEXPECTED_RESPONSE_MESSAGE);
        assert_eq!(FetchError::EmptyQuery.user_message(), "empty query");
    }
}
