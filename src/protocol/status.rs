//! # Status
//!
//! The structured status record shown in a client's server browser:
//! description, player count, and reported version. Serialized to JSON
//! and embedded as a length-prefixed string in the status reply frame.

use serde::{Deserialize, Serialize};

use crate::protocol::chat::Chat;

/// The status document template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default = "default_description")]
    pub description: Chat,
    #[serde(default)]
    pub players: PlayerCount,
    #[serde(default)]
    pub version: ServerVersion,
}

/// Player counts reported to the browser. Nothing is ever online here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCount {
    pub online: i32,
    pub max: i32,
}

/// Version name and protocol number reported to the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub name: String,
    pub protocol: i32,
}

fn default_description() -> Chat {
    Chat::from("A Minecraft Server")
}

impl Default for StatusResponse {
    fn default() -> Self {
        Self {
            description: default_description(),
            players: PlayerCount::default(),
            version: ServerVersion::default(),
        }
    }
}

impl Default for PlayerCount {
    fn default() -> Self {
        Self { online: 0, max: 20 }
    }
}

impl Default for ServerVersion {
    fn default() -> Self {
        Self {
            name: String::from("Signpost 1.20.4"),
            protocol: 765,
        }
    }
}
