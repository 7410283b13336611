//! Wire messages exchanged with the game API host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dto::actions::ActionDefinition;

/// Envelope for every message sent to the host.
#[derive(Debug, Serialize)]
pub struct ClientMessage<'a> {
    /// Command and its data, flattened into the envelope.
    #[serde(flatten)]
    pub command: ClientCommand,
    /// Game title announced at startup.
    pub game: &'a str,
}

/// Commands the client can send, tagged by their `command` string.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", content = "data")]
pub enum ClientCommand {
    /// Announce the game; clears any state the host kept from a previous session.
    #[serde(rename = "startup")]
    Startup,
    /// Free-text context for the host.
    #[serde(rename = "context")]
    Context(ContextData),
    /// Declare actions the host may invoke.
    #[serde(rename = "actions/register")]
    RegisterActions(RegisterActionsData),
    /// Withdraw actions by name.
    #[serde(rename = "actions/unregister")]
    UnregisterActions(UnregisterActionsData),
    /// Outcome of a single action invocation.
    #[serde(rename = "action/result")]
    ActionResult(ActionResultData),
}

/// Payload of [`ClientCommand::Context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextData {
    /// Text shown to the host.
    pub message: String,
    /// When set, the host takes the message in without reacting to it.
    pub silent: bool,
}

/// Payload of [`ClientCommand::RegisterActions`].
#[derive(Debug, Clone, Serialize)]
pub struct RegisterActionsData {
    /// Definitions in registration order.
    pub actions: Vec<ActionDefinition>,
}

/// Payload of [`ClientCommand::UnregisterActions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregisterActionsData {
    /// Names of the actions to withdraw.
    pub action_names: Vec<String>,
}

/// Payload of [`ClientCommand::ActionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResultData {
    /// Id of the action being answered.
    pub id: String,
    /// `false` asks the host to retry the action.
    pub success: bool,
    /// Optional text explaining the outcome.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

/// Raw frame received from the host before the command is interpreted.
#[derive(Debug, Deserialize)]
struct RawServerMessage {
    command: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Action invocation sent by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionRequest {
    /// Opaque id echoed back in the result.
    pub id: String,
    /// Registered action name.
    pub name: String,
    /// JSON-encoded parameters; absent when the host sent none.
    #[serde(default)]
    pub data: Option<String>,
}

/// Messages accepted from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Invoke one of the registered actions.
    Action(ActionRequest),
    /// Register every action again.
    ReregisterAll,
    /// Any command this client does not act on.
    Other(String),
}

impl ServerMessage {
    /// Parse a text frame into a typed message.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let RawServerMessage { command, data } = serde_json::from_str(raw)?;
        match command.as_str() {
            "action" => {
                let request = serde_json::from_value(data.unwrap_or(Value::Null))?;
                Ok(Self::Action(request))
            }
            "actions/reregister_all" => Ok(Self::ReregisterAll),
            _ => Ok(Self::Other(command)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn to_value(command: ClientCommand) -> Value {
        serde_json::to_value(ClientMessage {
            command,
            game: "Nuru Clock",
        })
        .unwrap()
    }

    #[test]
    fn startup_has_no_data() {
        assert_eq!(
            to_value(ClientCommand::Startup),
            json!({ "command": "startup", "game": "Nuru Clock" })
        );
    }

    #[test]
    fn action_result_omits_empty_message() {
        let value = to_value(ClientCommand::ActionResult(ActionResultData {
            id: "abc".into(),
            success: true,
            message: None,
        }));
        assert_eq!(
            value,
            json!({
                "command": "action/result",
                "game": "Nuru Clock",
                "data": { "id": "abc", "success": true }
            })
        );
    }

    #[test]
    fn context_and_unregister_shapes() {
        assert_eq!(
            to_value(ClientCommand::Context(ContextData {
                message: "hello".into(),
                silent: true,
            })),
            json!({
                "command": "context",
                "game": "Nuru Clock",
                "data": { "message": "hello", "silent": true }
            })
        );
        assert_eq!(
            to_value(ClientCommand::UnregisterActions(UnregisterActionsData {
                action_names: vec!["get_current_time".into()],
            })),
            json!({
                "command": "actions/unregister",
                "game": "Nuru Clock",
                "data": { "action_names": ["get_current_time"] }
            })
        );
    }

    #[test]
    fn parses_action_with_and_without_data() {
        let with = ServerMessage::from_json_str(
            r#"{"command":"action","data":{"id":"1","name":"get_current_time","data":"{}"}}"#,
        )
        .unwrap();
        assert_eq!(
            with,
            ServerMessage::Action(ActionRequest {
                id: "1".into(),
                name: "get_current_time".into(),
                data: Some("{}".into()),
            })
        );

        let without = ServerMessage::from_json_str(
            r#"{"command":"action","data":{"id":"2","name":"get_unix_timestamp"}}"#,
        )
        .unwrap();
        assert!(matches!(
            without,
            ServerMessage::Action(ActionRequest { data: None, .. })
        ));
    }

    #[test]
    fn parses_other_commands() {
        assert_eq!(
            ServerMessage::from_json_str(r#"{"command":"actions/reregister_all"}"#).unwrap(),
            ServerMessage::ReregisterAll
        );
        assert_eq!(
            ServerMessage::from_json_str(
                r#"{"command":"shutdown/graceful","data":{"wants_shutdown":true}}"#
            )
            .unwrap(),
            ServerMessage::Other("shutdown/graceful".into())
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(ServerMessage::from_json_str("not json").is_err());
        assert!(ServerMessage::from_json_str(r#"{"command":"action"}"#).is_err());
    }
}
