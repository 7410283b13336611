//! Actions this client registers with the host, and their parameters.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
    dto::validation::{decode_payload, validate_timezone},
    error::{DispatchError, RequestRejection},
    state::timezones::TimezoneSet,
};

/// Every action the client can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Format the current time in a timezone.
    GetCurrentTime,
    /// Convert a local timestamp to Unix epoch seconds.
    GetUnixTimestamp,
}

impl ActionKind {
    /// All actions, in registration order.
    pub const ALL: [ActionKind; 2] = [ActionKind::GetCurrentTime, ActionKind::GetUnixTimestamp];

    /// Name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::GetCurrentTime => "get_current_time",
            ActionKind::GetUnixTimestamp => "get_unix_timestamp",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ActionKind::GetCurrentTime => "Get the current time in a timezone",
            ActionKind::GetUnixTimestamp => {
                "Get the Unix timestamp of a time. Requires the timestamp in '%Y-%m-%d %H:%M:%S' format."
            }
        }
    }

    /// The string parameter that accompanies `timezone`.
    fn second_field(self) -> &'static str {
        match self {
            ActionKind::GetCurrentTime => "format",
            ActionKind::GetUnixTimestamp => "timestamp",
        }
    }

    /// Build the registration entry, constraining `timezone` to `timezones`.
    pub fn definition(self, timezones: &TimezoneSet) -> ActionDefinition {
        let zones: Vec<&str> = timezones.names().collect();
        let second = self.second_field();

        let mut properties = Map::new();
        properties.insert(
            "timezone".into(),
            json!({ "type": "string", "enum": zones }),
        );
        properties.insert(second.into(), json!({ "type": "string" }));

        ActionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            schema: json!({
                "type": "object",
                "properties": properties,
                "required": ["timezone", second]
            }),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = DispatchError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DispatchError::UnknownAction(name.to_string()))
    }
}

/// Action as declared to the host at registration time.
#[derive(Debug, Clone, Serialize)]
pub struct ActionDefinition {
    /// Wire name of the action.
    pub name: String,
    /// Human-readable description shown to the host.
    pub description: String,
    /// JSON schema for the action's parameters.
    pub schema: Value,
}

/// Validated parameters of `get_current_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTimeParams {
    /// Supported IANA timezone name.
    pub timezone: String,
    /// strftime-style format string, unchecked until rendering.
    pub format: String,
}

#[derive(Debug, Deserialize)]
/// `get_current_time` payload as sent by the host.
struct RawCurrentTimeParams {
    timezone: Option<String>,
    format: Option<String>,
}

impl CurrentTimeParams {
    /// Validate a raw payload, reporting the first problem in host-facing order.
    pub fn parse(raw: &str, timezones: &TimezoneSet) -> Result<Self, RequestRejection> {
        let RawCurrentTimeParams { timezone, format } = decode_payload(raw)?;
        let timezone = validate_timezone(timezone, timezones)?;
        let format = format.ok_or(RequestRejection::MissingFormat)?;
        Ok(Self { timezone, format })
    }
}

/// Validated parameters of `get_unix_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnixTimestampParams {
    /// Supported IANA timezone name.
    pub timezone: String,
    /// Local wall-clock literal, checked by the resolver.
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
/// `get_unix_timestamp` payload as sent by the host.
struct RawUnixTimestampParams {
    timezone: Option<String>,
    timestamp: Option<String>,
}

impl UnixTimestampParams {
    /// Validate a raw payload, reporting the first problem in host-facing order.
    pub fn parse(raw: &str, timezones: &TimezoneSet) -> Result<Self, RequestRejection> {
        let RawUnixTimestampParams {
            timezone,
            timestamp,
        } = decode_payload(raw)?;
        let timezone = validate_timezone(timezone, timezones)?;
        let timestamp = timestamp.ok_or(RequestRejection::MissingTimestamp)?;
        Ok(Self {
            timezone,
            timestamp,
        })
    }
}
