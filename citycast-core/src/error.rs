use thiserror::Error;

/// Failure of a single weather search.
///
/// Every variant is terminal for the search that produced it; nothing is
/// retried automatically.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Caller supplied an unusable argument, e.g. an empty city name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport-level failure (DNS, connection refused, timeout, broken body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The weather service answered with something other than `200 OK`.
    #[error("weather service responded with status {status_code}: {body}")]
    Remote { status_code: u16, body: String },

    /// The response body did not have the expected JSON shape.
    #[error("malformed weather response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// HTTP status of a remote failure, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Remote, network and parse failures all collapse into the same generic
    /// text; the full error is meant for the diagnostic log.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "City name cannot be empty.",
            Self::Network(_) | Self::Remote { .. } | Self::MalformedResponse(_) => {
                "Could not fetch weather data. Please check the city name or your network connection."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_exposes_status_code() {
        let err = WeatherError::Remote { status_code: 404, body: "city not found".into() };
        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn non_remote_errors_have_no_status_code() {
        assert_eq!(WeatherError::invalid_argument("empty").status_code(), None);
        assert_eq!(WeatherError::malformed("no main").status_code(), None);
    }

    #[test]
    fn remote_and_malformed_share_generic_user_message() {
        let remote = WeatherError::Remote { status_code: 500, body: String::new() };
        let malformed = WeatherError::malformed("missing wind");
        assert_eq!(remote.user_message(), malformed.user_message());
        assert!(!remote.user_message().contains("500"));
    }

    #[test]
    fn invalid_argument_has_its_own_user_message() {
        let err = WeatherError::invalid_argument("city is empty");
        assert_eq!(err.user_message(), "City name cannot be empty.");
    }
}
