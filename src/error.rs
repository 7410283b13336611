//! Error types for request validation, time resolution, dispatch, transport, and config.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

const MISSING_TIMESTAMP: &str = "You didn't provide a timestamp to convert. \
    Make sure it's in %Y-%m-%d %H:%M:%S format when retrying.";

/// Reasons an action request is refused before any work is attempted.
///
/// The display text is the exact message returned to the host in the failed action result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestRejection {
    /// The action arrived without a payload.
    #[error("You didn't specify anything.")]
    NothingSpecified,
    /// Payload is not a JSON object, or a field has the wrong type.
    #[error("Invalid action data.")]
    InvalidData,
    /// `timezone` is absent.
    #[error("You didn't provide a timezone.")]
    MissingTimezone,
    /// `timezone` is not in the supported set.
    #[error("You didn't provide a valid (or supported) timezone.")]
    UnsupportedTimezone,
    /// `format` is absent.
    #[error("You didn't provide a time format.")]
    MissingFormat,
    /// `timestamp` is absent.
    #[error("{}", MISSING_TIMESTAMP)]
    MissingTimestamp,
}

/// Coarse classification of resolver failures, driving the message sent back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input was well-formed JSON but not usable; the host gets a generic retry hint.
    InvalidInput,
    /// Anything else; the host gets the error description and the failure is logged.
    Unexpected,
}

/// Errors raised by the time resolvers.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Timezone name is not part of the timezone database.
    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),
    /// Timestamp literal does not match `%Y-%m-%d %H:%M:%S`.
    #[error("time data '{input}' does not match format '%Y-%m-%d %H:%M:%S': {reason}")]
    MalformedTimestamp {
        /// The literal as received.
        input: String,
        /// Why it was refused.
        reason: String,
    },
    /// Local time falls into a daylight-saving gap in the zone.
    #[error("'{input}' does not exist in {timezone} (skipped by a daylight saving transition)")]
    NonexistentLocalTime {
        /// The literal as received.
        input: String,
        /// Zone the literal was localized to.
        timezone: String,
    },
    /// Format string holds a specifier the formatter does not know.
    #[error("Invalid format string '{0}'")]
    UnsupportedFormat(String),
    /// Rendering failed after the format string was accepted.
    #[error("failed to render time with format '{0}'")]
    Render(String),
}

impl ResolveError {
    /// Which user-facing message family this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            ResolveError::UnknownTimezone(_)
            | ResolveError::MalformedTimestamp { .. }
            | ResolveError::NonexistentLocalTime { .. } => ErrorClass::InvalidInput,
            ResolveError::UnsupportedFormat(_) | ResolveError::Render(_) => ErrorClass::Unexpected,
        }
    }
}

/// Fatal errors raised while dispatching an action. Any of them ends the read loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Host invoked an action this client has no handler for.
    #[error("no handler registered for action `{0}`")]
    UnknownAction(String),
    /// Writer channel closed - the connection is gone.
    #[error("connection closed")]
    ConnectionClosed,
    /// An outbound message could not be encoded.
    #[error("failed to encode outbound message")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by the websocket client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open the websocket.
    #[error("failed to connect to {uri}")]
    Connect {
        /// Endpoint that was dialed.
        uri: String,
        /// Underlying websocket failure.
        #[source]
        source: tungstenite::Error,
    },
    /// The websocket failed while reading.
    #[error("websocket error")]
    WebSocket(#[from] tungstenite::Error),
    /// Action dispatch hit a fatal condition.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Configuration could not be turned into a usable [`crate::config::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field-level validation failed.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    /// The websocket URI does not use a websocket scheme.
    #[error("websocket URI `{0}` must start with ws:// or wss://")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_match_host_facing_text() {
        assert_eq!(
            RequestRejection::NothingSpecified.to_string(),
            "You didn't specify anything."
        );
        assert_eq!(
            RequestRejection::UnsupportedTimezone.to_string(),
            "You didn't provide a valid (or supported) timezone."
        );
        assert!(
            RequestRejection::MissingTimestamp
                .to_string()
                .contains("%Y-%m-%d %H:%M:%S")
        );
    }

    #[test]
    fn resolve_errors_are_classified() {
        assert_eq!(
            ResolveError::UnknownTimezone("Not/AZone".into()).class(),
            ErrorClass::InvalidInput
        );
        assert_eq!(
            ResolveError::NonexistentLocalTime {
                input: "2024-03-10 02:30:00".into(),
                timezone: "America/New_York".into(),
            }
            .class(),
            ErrorClass::InvalidInput
        );
        assert_eq!(
            ResolveError::UnsupportedFormat("%Q".into()).class(),
            ErrorClass::Unexpected
        );
    }

    #[test]
    fn encode_failures_are_fatal_dispatch_errors() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DispatchError::from(source);
        assert!(matches!(err, DispatchError::Encode(_)));
        assert_eq!(err.to_string(), "failed to encode outbound message");
    }
}
