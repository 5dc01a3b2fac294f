//! # Packet
//!
//! One discrete protocol message: a VarInt length prefix covering a VarInt
//! packet ID plus an opaque payload.
//!
//! ## Wire Format
//! ```text
//! [body length: VarInt] [packet ID: VarInt] [payload: body length - len(ID) bytes]
//! ```
//! The declared length counts the ID and payload bytes, not itself.

use bytes::{Buf, BufMut, BytesMut};

use crate::core::wire;
use crate::error::{ProtocolError, Result};

/// A decoded frame: packet ID plus raw payload bytes.
///
/// The payload is opaque at this layer; the dispatcher consumes it field
/// by field in the order each packet type declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: u32,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn new(id: u32, payload: Vec<u8>) -> Self {
        Self { id, payload }
    }

    /// Builds a packet whose payload is a single length-prefixed string.
    ///
    /// This is the shape of every reply this server sends except the
    /// latency echo.
    pub fn with_string(id: u32, text: &str) -> Self {
        let mut payload = BytesMut::with_capacity(wire::var_int_len(text.len() as u32) + text.len());
        wire::write_string(&mut payload, text);
        Self {
            id,
            payload: payload.to_vec(),
        }
    }

    /// Declared frame length: the VarInt-encoded ID plus the payload.
    pub fn body_len(&self) -> usize {
        wire::var_int_len(self.id) + self.payload.len()
    }

    /// Serializes the full frame, length prefix included.
    ///
    /// Two passes: the length prefix is itself variable-width, so the body
    /// length must be computed before any byte is emitted. Building the
    /// same packet twice yields byte-identical output.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body_len = self.body_len();
        let mut out = BytesMut::with_capacity(wire::var_int_len(body_len as u32) + body_len);
        wire::write_var_int(&mut out, body_len as u32);
        wire::write_var_int(&mut out, self.id);
        out.put_slice(&self.payload);
        out.to_vec()
    }

    /// Parses exactly one frame from `raw`.
    ///
    /// # Errors
    /// `TruncatedRead` when the declared length exceeds the bytes present,
    /// `MalformedPacket` when bytes remain after the declared length.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let mut buf = raw;
        let body_len = wire::read_var_int(&mut buf)? as usize;
        if buf.remaining() < body_len {
            return Err(ProtocolError::TruncatedRead {
                expected: body_len,
                available: buf.remaining(),
            });
        }
        if buf.remaining() > body_len {
            return Err(ProtocolError::MalformedPacket(format!(
                "{} trailing bytes after frame",
                buf.remaining() - body_len
            )));
        }
        let mut body = &buf[..body_len];
        let id = wire::read_var_int(&mut body)?;
        Ok(Self {
            id,
            payload: body.to_vec(),
        })
    }

    /// Decodes the payload as a single length-prefixed string.
    ///
    /// # Errors
    /// `MalformedPacket` when payload bytes remain after the string.
    pub fn string_payload(&self) -> Result<String> {
        let mut buf = &self.payload[..];
        let text = wire::read_string(&mut buf)?;
        if buf.has_remaining() {
            return Err(ProtocolError::MalformedPacket(format!(
                "{} trailing bytes after string payload",
                buf.remaining()
            )));
        }
        Ok(text)
    }
}
