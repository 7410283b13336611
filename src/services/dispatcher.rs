//! Action routing by name.

use tracing::{error, info};

use crate::{
    dto::{actions::ActionKind, neuro::ActionRequest},
    error::{DispatchError, RequestRejection},
    services::{
        clock_service::{handle_get_current_time, handle_get_unix_timestamp, reject},
        outbound::NeuroSender,
    },
    state::AppState,
};

/// Route one action invocation to its handler.
///
/// Actions without a payload are refused before the name is looked up. A name with no
/// handler is a registration bug and comes back as [`DispatchError::UnknownAction`].
pub fn handle_action(
    state: &AppState,
    sender: &NeuroSender,
    action: &ActionRequest,
) -> Result<(), DispatchError> {
    info!(id = %action.id, action = %action.name, "received action");

    let Some(raw) = action.data.as_deref() else {
        info!(id = %action.id, "action carried no data");
        return reject(sender, &action.id, RequestRejection::NothingSpecified);
    };

    let kind = action.name.parse::<ActionKind>().inspect_err(|err| {
        error!(id = %action.id, error = %err, "action has no local handler");
    })?;

    match kind {
        ActionKind::GetCurrentTime => handle_get_current_time(state, sender, &action.id, raw),
        ActionKind::GetUnixTimestamp => handle_get_unix_timestamp(state, sender, &action.id, raw),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;

    use super::*;
    use crate::{config::AppConfig, state::TimezoneSet};

    fn request(name: &str, data: Option<&str>) -> ActionRequest {
        ActionRequest {
            id: "req-1".into(),
            name: name.into(),
            data: data.map(str::to_string),
        }
    }

    #[test]
    fn missing_data_is_refused_without_context() {
        let state = AppState::new(AppConfig::default(), TimezoneSet::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = NeuroSender::new("Nuru Clock", true, tx);

        handle_action(&state, &sender, &request("get_current_time", None)).unwrap();

        let Ok(Message::Text(text)) = rx.try_recv() else {
            panic!("expected an action result");
        };
        let sent: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(sent["data"]["success"], false);
        assert_eq!(sent["data"]["message"], "You didn't specify anything.");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unknown_action_is_fatal_and_silent() {
        let state = AppState::new(AppConfig::default(), TimezoneSet::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = NeuroSender::new("Nuru Clock", true, tx);

        let err = handle_action(&state, &sender, &request("get_weather", Some("{}"))).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownAction(name) if name == "get_weather"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn known_action_reaches_handler() {
        let state = AppState::new(AppConfig::default(), TimezoneSet::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = NeuroSender::new("Nuru Clock", true, tx);

        handle_action(
            &state,
            &sender,
            &request(
                "get_unix_timestamp",
                Some(r#"{"timezone":"Asia/Tokyo","timestamp":"2024-01-01 09:00:00"}"#),
            ),
        )
        .unwrap();

        let mut texts = Vec::new();
        while let Ok(Message::Text(text)) = rx.try_recv() {
            texts.push(text);
        }
        assert_eq!(texts.len(), 2);
        assert!(texts[1].contains("1704067200"));
    }
}
