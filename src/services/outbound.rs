//! Outbound message queue towards the game host.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::{
    dto::{
        actions::ActionDefinition,
        neuro::{
            ActionResultData, ClientCommand, ClientMessage, ContextData, RegisterActionsData,
            UnregisterActionsData,
        },
    },
    error::DispatchError,
};

/// Cloneable handle that queues messages for the websocket writer task.
///
/// Messages leave in the order they were queued, so a result queued before a context
/// message always reaches the host first.
#[derive(Debug, Clone)]
pub struct NeuroSender {
    game: Arc<str>,
    silent_context: bool,
    tx: mpsc::UnboundedSender<Message>,
}

impl NeuroSender {
    /// Wrap the writer channel for the given game title.
    pub fn new(
        game: impl Into<Arc<str>>,
        silent_context: bool,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            game: game.into(),
            silent_context,
            tx,
        }
    }

    /// Announce the game to the host.
    pub fn send_startup(&self) -> Result<(), DispatchError> {
        self.send(ClientCommand::Startup)
    }

    /// Register action definitions.
    pub fn register_actions(&self, actions: Vec<ActionDefinition>) -> Result<(), DispatchError> {
        self.send(ClientCommand::RegisterActions(RegisterActionsData { actions }))
    }

    /// Remove actions by name.
    pub fn unregister_actions(&self, action_names: Vec<String>) -> Result<(), DispatchError> {
        self.send(ClientCommand::UnregisterActions(UnregisterActionsData {
            action_names,
        }))
    }

    /// Report whether the action with `id` was accepted.
    pub fn send_action_result(
        &self,
        id: &str,
        success: bool,
        message: Option<String>,
    ) -> Result<(), DispatchError> {
        self.send(ClientCommand::ActionResult(ActionResultData {
            id: id.to_string(),
            success,
            message,
        }))
    }

    /// Send free-text context to the host.
    pub fn send_context(&self, message: impl Into<String>) -> Result<(), DispatchError> {
        self.send(ClientCommand::Context(ContextData {
            message: message.into(),
            silent: self.silent_context,
        }))
    }

    /// Serialize a command and push it onto the writer channel.
    ///
    /// Both an encoding failure and a closed channel are reported to the caller, so a
    /// result is never dropped silently.
    fn send(&self, command: ClientCommand) -> Result<(), DispatchError> {
        let message = ClientMessage {
            command,
            game: &*self.game,
        };
        let payload = serde_json::to_string(&message).inspect_err(|err| {
            warn!(error = %err, "failed to serialize message `{message:?}`");
        })?;
        debug!(%payload, "queueing outbound message");

        self.tx
            .send(Message::Text(payload))
            .map_err(|_| DispatchError::ConnectionClosed)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn next_json(rx: &mut mpsc::UnboundedReceiver<Message>) -> Value {
        match rx.try_recv().unwrap() {
            Message::Text(text) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn messages_keep_queue_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = NeuroSender::new("Nuru Clock", true, tx);

        sender
            .send_action_result("id-1", false, Some("nope".into()))
            .unwrap();
        sender.send_context("after").unwrap();

        assert_eq!(
            next_json(&mut rx),
            json!({
                "command": "action/result",
                "game": "Nuru Clock",
                "data": { "id": "id-1", "success": false, "message": "nope" }
            })
        );
        assert_eq!(next_json(&mut rx)["data"]["message"], "after");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn context_uses_configured_silence() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        NeuroSender::new("Nuru Clock", false, tx)
            .send_context("loud")
            .unwrap();
        assert_eq!(next_json(&mut rx)["data"]["silent"], false);
    }

    #[test]
    fn closed_channel_reports_connection_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sender = NeuroSender::new("Nuru Clock", true, tx);
        assert!(matches!(
            sender.send_startup(),
            Err(DispatchError::ConnectionClosed)
        ));
    }
}
