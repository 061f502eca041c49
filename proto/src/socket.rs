//! Per-match socket stub messages
//!
//! Inbound traffic is acknowledged only; it never drives the simulation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProtoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketInbound {
    Join { alias: String },
    Move,
    Matchmaking,
    Unknown(String),
}

impl SocketInbound {
    /// Parse one text frame. Anything that is not an object with a string `type`
    /// is a format error; unrecognised types parse as `Unknown`.
    pub fn parse(text: &str) -> Result<Self, ProtoError> {
        let value: Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("type"))?;
        Ok(match kind {
            "join" => {
                let alias = value
                    .get("alias")
                    .and_then(Value::as_str)
                    .ok_or_else(|| missing("alias"))?;
                SocketInbound::Join {
                    alias: alias.to_string(),
                }
            }
            "move" => SocketInbound::Move,
            "matchmaking" => SocketInbound::Matchmaking,
            other => SocketInbound::Unknown(other.to_string()),
        })
    }
}

fn missing(field: &'static str) -> ProtoError {
    ProtoError::Json(serde::de::Error::missing_field(field))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocketReply {
    JoinAck { message: String },
    Error { message: String },
}

impl SocketReply {
    pub fn welcome(alias: &str) -> Self {
        SocketReply::JoinAck {
            message: format!("Welcome {alias}"),
        }
    }

    pub fn unknown_type() -> Self {
        SocketReply::Error {
            message: "Unknown message type".to_string(),
        }
    }

    pub fn invalid_format() -> Self {
        SocketReply::Error {
            message: "Invalid message format".to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }
}
