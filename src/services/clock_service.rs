//! Handlers for the two clock actions.

use tracing::{info, warn};

use crate::{
    dto::actions::{CurrentTimeParams, UnixTimestampParams},
    error::{DispatchError, ErrorClass, RequestRejection, ResolveError},
    services::{
        outbound::NeuroSender,
        resolver::{get_formatted_time, get_unix_timestamp},
    },
    state::AppState,
};

/// Context sent when well-shaped input is still rejected by a resolver.
pub const RETRY_HINT: &str =
    "You somehow sent something incorrectly. Double-check your inputs and try again.";

/// Handle `get_current_time`: validate, acknowledge, then report the formatted time.
pub fn handle_get_current_time(
    state: &AppState,
    sender: &NeuroSender,
    id: &str,
    raw: &str,
) -> Result<(), DispatchError> {
    let params = match CurrentTimeParams::parse(raw, state.timezones()) {
        Ok(params) => params,
        Err(rejection) => return reject(sender, id, rejection),
    };

    // The result only vouches for the request shape, so it goes out before any work.
    sender.send_action_result(id, true, None)?;

    let context = match get_formatted_time(&params.timezone, &params.format) {
        Ok(formatted) => {
            info!(id, timezone = %params.timezone, "reporting current time");
            format!(
                "In the {} format, it is currently {formatted}.",
                params.timezone
            )
        }
        Err(err) => failure_context(
            id,
            err,
            "An error occurred while trying to check the time",
        ),
    };
    sender.send_context(context)
}

/// Handle `get_unix_timestamp`: validate, acknowledge, then report the epoch seconds.
pub fn handle_get_unix_timestamp(
    state: &AppState,
    sender: &NeuroSender,
    id: &str,
    raw: &str,
) -> Result<(), DispatchError> {
    let params = match UnixTimestampParams::parse(raw, state.timezones()) {
        Ok(params) => params,
        Err(rejection) => return reject(sender, id, rejection),
    };

    sender.send_action_result(id, true, None)?;

    let context = match get_unix_timestamp(&params.timestamp, &params.timezone) {
        Ok(epoch) => {
            info!(id, timezone = %params.timezone, epoch, "reporting unix timestamp");
            format!(
                "The Unix timestamp for {} in {} is {epoch}.",
                params.timestamp, params.timezone
            )
        }
        Err(err) => failure_context(
            id,
            err,
            "An error occurred while trying to convert to Unix",
        ),
    };
    sender.send_context(context)
}

/// Send a failed result carrying the rejection's host-facing message.
pub(crate) fn reject(
    sender: &NeuroSender,
    id: &str,
    rejection: RequestRejection,
) -> Result<(), DispatchError> {
    info!(id, reason = %rejection, "rejecting action");
    sender.send_action_result(id, false, Some(rejection.to_string()))
}

fn failure_context(id: &str, err: ResolveError, prefix: &str) -> String {
    match err.class() {
        ErrorClass::InvalidInput => {
            info!(id, error = %err, "resolver rejected input");
            RETRY_HINT.to_string()
        }
        ErrorClass::Unexpected => {
            warn!(id, error = %err, "resolver failed");
            format!("{prefix}\n{err}")
        }
    }
}
