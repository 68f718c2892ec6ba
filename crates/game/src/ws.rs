//! Online mode: a websocket link to the game server driving the client between frames.

use std::time::Duration;

use anyhow::{Context, Result};
use engine_core::Time;
use futures_util::{SinkExt, StreamExt};
use net::{Applied, PlayPhase, Transport, TransportError};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::client::GameClient;
use crate::config::GameConfig;

/// Hands outbound frames to the socket writer.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl Transport for ChannelTransport {
    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.tx.send(text).map_err(|_| TransportError::Closed)
    }
}

pub async fn run(config: &GameConfig) -> Result<()> {
    let (socket, _) = connect_async(config.server_url.as_str())
        .await
        .with_context(|| format!("connecting to {}", config.server_url))?;
    log::info!("Connected to {}", config.server_url);

    let (mut write, mut read) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut client = GameClient::new(config.tuning, config.rng_seed);
    client.connect(ChannelTransport { tx }, config.ping_interval_secs);

    let mut frames = tokio::time::interval(Duration::from_secs_f32(config.frame_delta()));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut time = Time::new();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if client.handle_message(&text) == Applied::GameOver {
                        if let PlayPhase::GameOver { winner, restart_at } = client.phase() {
                            log::info!(
                                "Round over (winner {:?}, restart at {:?}); {} events in history",
                                winner.as_ref().map(|w| w.id()),
                                restart_at,
                                client.actions().len()
                            );
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    log::info!("Server closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("Websocket error: {}", e);
                    break;
                }
            },
            Some(text) = rx.recv() => {
                if let Err(e) = write.send(Message::Text(text)).await {
                    log::warn!("Websocket write failed: {}", e);
                    break;
                }
            }
            _ = frames.tick() => {
                time.update();
                client.tick(time.delta_seconds());
                if !client.is_connected() {
                    log::warn!("Connection dropped");
                    break;
                }
            }
            _ = &mut shutdown => {
                log::info!("Shutting down");
                break;
            }
        }
    }

    client.disconnect();
    write.close().await.ok();
    log::info!(
        "Session ended after {} frames with {} colonies",
        time.frame_count(),
        client.colonies().len()
    );
    Ok(())
}
