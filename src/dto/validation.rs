//! Validation helpers for action payloads.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{error::RequestRejection, state::timezones::TimezoneSet};

/// Decode an action payload into its raw parameter struct.
///
/// The payload must be a JSON object; going through [`Map`] first keeps arrays from
/// filling a struct positionally. Any serde failure is invalid data.
pub fn decode_payload<T: DeserializeOwned>(raw: &str) -> Result<T, RequestRejection> {
    let object: Map<String, Value> =
        serde_json::from_str(raw).map_err(|_| RequestRejection::InvalidData)?;
    serde_json::from_value(Value::Object(object)).map_err(|_| RequestRejection::InvalidData)
}

/// Require a timezone field that names a supported zone.
pub fn validate_timezone(
    timezone: Option<String>,
    timezones: &TimezoneSet,
) -> Result<String, RequestRejection> {
    let timezone = timezone.ok_or(RequestRejection::MissingTimezone)?;
    if !timezones.contains(&timezone) {
        return Err(RequestRejection::UnsupportedTimezone);
    }
    Ok(timezone)
}
