//! WebSocket connection to the game host and the sequential read loop.

use futures::{SinkExt, Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message},
};
use tracing::{debug, info, warn};

use crate::{
    dto::{actions::ActionKind, neuro::ServerMessage},
    error::{ClientError, DispatchError},
    services::{dispatcher::handle_action, outbound::NeuroSender},
    state::{AppState, SharedState},
};

/// Connect to the game host and serve actions until the connection ends.
///
/// Returns `Ok(())` when the host closes the socket, and an error on transport failure or
/// when an action cannot be dispatched at all.
pub async fn run(state: SharedState) -> Result<(), ClientError> {
    let uri = state.config().websocket_uri.clone();
    let (socket, _response) = connect_async(uri.as_str())
        .await
        .map_err(|source| ClientError::Connect {
            uri: uri.clone(),
            source,
        })?;
    info!(%uri, "connected to game host");

    let (mut sink, stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing in queue order.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if let Err(err) = sink.send(message).await {
                warn!(error = %err, "websocket send failed");
                break;
            }
        }
        let _ = sink.close().await;
    });

    let config = state.config();
    let sender = NeuroSender::new(
        config.game_title.as_str(),
        config.context_silent,
        outbound_tx,
    );

    let outcome = serve(&state, &sender, stream).await;
    finalize(writer_task, sender).await;
    outcome
}

/// Announce the game and its actions, then handle inbound frames one at a time.
///
/// Each action is dispatched to completion before the next frame is read.
pub async fn serve<S>(
    state: &AppState,
    sender: &NeuroSender,
    mut inbound: S,
) -> Result<(), ClientError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    sender.send_startup()?;
    sender.unregister_actions(
        ActionKind::ALL
            .iter()
            .map(|kind| kind.name().to_string())
            .collect(),
    )?;
    register_actions(state, sender)?;

    while let Some(frame) = inbound.next().await {
        match frame? {
            Message::Text(text) => match ServerMessage::from_json_str(&text) {
                Ok(ServerMessage::Action(action)) => handle_action(state, sender, &action)?,
                Ok(ServerMessage::ReregisterAll) => {
                    info!("host asked to re-register actions");
                    register_actions(state, sender)?;
                }
                Ok(ServerMessage::Other(command)) => {
                    debug!(%command, "ignoring unsupported command");
                }
                Err(err) => {
                    warn!(error = %err, payload = %text, "failed to parse host message");
                }
            },
            Message::Close(frame) => {
                info!(?frame, "host closed the connection");
                return Ok(());
            }
            // tungstenite answers pings on its own.
            Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_) => {}
        }
    }

    info!("inbound stream ended");
    Ok(())
}

fn register_actions(state: &AppState, sender: &NeuroSender) -> Result<(), DispatchError> {
    let definitions = ActionKind::ALL
        .iter()
        .map(|kind| kind.definition(state.timezones()))
        .collect();
    sender.register_actions(definitions)
}

/// Ensure the writer task winds down before returning.
async fn finalize(writer_task: JoinHandle<()>, sender: NeuroSender) {
    drop(sender);
    let _ = writer_task.await;
}
