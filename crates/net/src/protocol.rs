//! JSON messages exchanged with the game server.
//!
//! | direction | `type`         | payload                                   |
//! |-----------|----------------|-------------------------------------------|
//! | in        | `snapshot`     | `colonies`, optional `actionEvents`       |
//! | in        | `update`       | `changes` (partial colonies); alias `delta` |
//! | in        | `action`       | `event`                                   |
//! | in        | `game_over`    | `winner`, `actionHistory`, `restartAt`    |
//! | out       | (none)         | `{"initialConnection":true}` on open      |
//! | out       | `ping`         | keepalive                                 |
//! | out       | `fleet_report` | predicted fleet pose                      |

use colony::{ActionEvent, Colony, ColonyPatch};
use fleet::FleetReport;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

const KNOWN_TYPES: &[&str] = &["snapshot", "update", "delta", "action", "game_over"];

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("message has no `type` field")]
    MissingType,
    #[error("unknown message type `{0}`")]
    UnknownType(String),
}

/// Who won. Servers send either a bare colony id or a small object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GameWinner {
    Id(String),
    Colony {
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl GameWinner {
    pub fn id(&self) -> &str {
        match self {
            GameWinner::Id(id) => id,
            GameWinner::Colony { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Snapshot {
        colonies: Vec<Colony>,
        #[serde(default)]
        action_events: Option<Vec<ActionEvent>>,
    },
    #[serde(alias = "delta")]
    Update {
        #[serde(default)]
        changes: Vec<ColonyPatch>,
    },
    Action {
        event: ActionEvent,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        #[serde(default)]
        winner: Option<GameWinner>,
        #[serde(default)]
        action_history: Vec<ActionEvent>,
        #[serde(default)]
        restart_at: Option<i64>,
    },
}

/// Classify and decode one inbound text frame.
pub fn parse_server_message(text: &str) -> Result<ServerMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    if !KNOWN_TYPES.contains(&kind) {
        return Err(ProtocolError::UnknownType(kind.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Hello,
    Ping,
    FleetReport(FleetReport),
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        let value = match self {
            ClientMessage::Hello => json!({ "initialConnection": true }),
            ClientMessage::Ping => json!({ "type": "ping" }),
            ClientMessage::FleetReport(report) => {
                let mut value = serde_json::to_value(report)?;
                if let Some(fields) = value.as_object_mut() {
                    fields.insert("type".to_string(), json!("fleet_report"));
                }
                value
            }
        };
        Ok(value.to_string())
    }
}
