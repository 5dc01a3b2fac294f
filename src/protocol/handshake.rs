//! # Handshake
//!
//! The first packet on a new connection: protocol version, the address
//! and port the client dialed, and an intent flag distinguishing a status
//! probe from a login attempt.
//!
//! Every field other than the intent is read solely to advance the cursor
//! correctly; values are never validated or inspected. Any protocol
//! version is accepted, since this responder does not gate on client
//! version.

use bytes::Buf;

use crate::core::wire;
use crate::error::{ProtocolError, Result};

/// Intent value meaning "show me the server list entry".
pub const STATUS_INTENT: u32 = 0x01;

/// Decoded handshake fields, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: u32,
    pub server_address: String,
    /// Fixed big-endian u16 on the wire, not a VarInt.
    pub server_port: u16,
    pub next_state: u32,
}

impl Handshake {
    /// Parses a handshake frame body.
    ///
    /// Field order: protocol-version VarInt, server-address String,
    /// server-port u16, next-state VarInt. Residual bytes after the last
    /// field are a malformed-frame condition.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut buf = payload;
        let protocol_version = wire::read_var_int(&mut buf)?;
        let server_address = wire::read_string(&mut buf)?;
        let server_port = wire::read_u16(&mut buf)?;
        let next_state = wire::read_var_int(&mut buf)?;
        if buf.has_remaining() {
            return Err(ProtocolError::MalformedPacket(format!(
                "{} residual bytes after handshake fields",
                buf.remaining()
            )));
        }
        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }

    /// Whether this handshake asks for the server list entry rather than
    /// a login.
    pub fn requests_status(&self) -> bool {
        self.next_state == STATUS_INTENT
    }

    /// Serializes the fields back into a frame body.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_var_int(&mut buf, self.protocol_version);
        wire::write_string(&mut buf, &self.server_address);
        wire::write_u16(&mut buf, self.server_port);
        wire::write_var_int(&mut buf, self.next_state);
        buf
    }
}
