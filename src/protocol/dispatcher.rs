//! # Dispatcher
//!
//! Per-frame classification and response construction. One verdict per
//! accepted frame; the only session state is "connection open".
//!
//! | Packet ID | Precondition | Reply | Connection |
//! |-----------|--------------|-------|------------|
//! | `0x00` | empty payload | none (legacy ping) | stays open |
//! | `0x00` | handshake, next-state 1 | status JSON, ID `0x00` | stays open |
//! | `0x00` | handshake, other next-state | kick JSON, ID `0x00` | closed |
//! | `0x01` | any payload | identical packet echoed back | stays open |
//! | other | any | kick JSON, ID `0x0A` | closed |
//!
//! Unknown IDs are assumed to come from a client already past handshake,
//! so the kick is framed as an in-game disconnect rather than the
//! pre-login one. Status and kick payloads arrive pre-serialized from the
//! settings snapshot; this layer only frames their bytes.

use tracing::debug;

use crate::config::Snapshot;
use crate::core::packet::Packet;
use crate::error::Result;
use crate::protocol::handshake::Handshake;

/// Wire packet IDs this server speaks.
pub mod ids {
    /// First packet of any exchange; also the status reply ID.
    pub const HANDSHAKE: u32 = 0x00;
    /// Status reply, pre-login kick: same ID family as the handshake.
    pub const STATUS_RESPONSE: u32 = 0x00;
    /// Latency probe, echoed byte-for-byte.
    pub const LATENCY: u32 = 0x01;
    /// Pre-login disconnect.
    pub const LOGIN_KICK: u32 = 0x00;
    /// In-game disconnect, used for unrecognized packets.
    pub const PLAY_KICK: u32 = 0x0A;
}

/// Why a connection is being closed after a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client asked to log in; this server only turns players away.
    LoginAttempt,
    /// An unrecognized packet ID, answered with the in-game kick.
    UnknownPacket(u32),
}

/// What the dispatcher decided for one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No reply; the connection stays open.
    Silent,
    /// Send the reply and keep reading.
    Reply(Packet),
    /// Send the reply, then close the connection.
    ReplyAndClose(Packet, DisconnectReason),
}

impl Verdict {
    /// Whether the connection should be closed after any reply is sent.
    pub fn closes(&self) -> bool {
        matches!(self, Verdict::ReplyAndClose(..))
    }

    /// The reply frame, if any.
    pub fn reply(&self) -> Option<&Packet> {
        match self {
            Verdict::Silent => None,
            Verdict::Reply(packet) | Verdict::ReplyAndClose(packet, _) => Some(packet),
        }
    }
}

/// Classifies one inbound frame and builds the response bytes.
///
/// # Errors
/// Propagates wire errors from handshake parsing (truncated or residual
/// fields); the caller treats them as grounds to drop the connection.
pub fn dispatch(packet: &Packet, settings: &Snapshot) -> Result<Verdict> {
    match packet.id {
        // A declared length of 1 leaves no payload: a legacy ping probe.
        // Recognized before any field parsing; politely ignored.
        ids::HANDSHAKE if packet.payload.is_empty() => {
            debug!("legacy ping probe, no response");
            Ok(Verdict::Silent)
        }
        ids::HANDSHAKE => {
            let handshake = Handshake::parse(&packet.payload)?;
            debug!(
                protocol = handshake.protocol_version,
                next_state = handshake.next_state,
                "handshake"
            );
            if handshake.requests_status() {
                Ok(Verdict::Reply(Packet::with_string(
                    ids::STATUS_RESPONSE,
                    settings.status_payload(),
                )))
            } else {
                Ok(Verdict::ReplyAndClose(
                    Packet::with_string(ids::LOGIN_KICK, settings.kick_payload()),
                    DisconnectReason::LoginAttempt,
                ))
            }
        }
        ids::LATENCY => {
            debug!(len = packet.payload.len(), "latency probe echoed");
            Ok(Verdict::Reply(packet.clone()))
        }
        id => Ok(Verdict::ReplyAndClose(
            Packet::with_string(ids::PLAY_KICK, settings.kick_payload()),
            DisconnectReason::UnknownPacket(id),
        )),
    }
}
