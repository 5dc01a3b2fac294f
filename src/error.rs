//! # Error Types
//!
//! Error handling for the wire protocol and server.
//!
//! This module defines all error variants that can occur while framing,
//! parsing, and answering packets, from low-level I/O errors to protocol
//! violations.
//!
//! ## Error Categories
//! - **I/O Errors**: socket failures, peer resets
//! - **Wire Errors**: malformed VarInts, truncated reads, bad UTF-8
//! - **Framing Errors**: oversized or structurally invalid frames
//! - **Config Errors**: settings that fail to load or validate
//!
//! Per-connection failures are caught at the connection-handler boundary
//! and converted to "close this connection" plus a log entry; only the
//! accept loop treats an error as fatal to the whole server.

use std::io;
use thiserror::Error;

/// Maximum number of bytes a VarInt may occupy on the wire.
///
/// Valid values fit in 32 bits, which encode to at most five 7-bit groups.
pub const MAX_VAR_INT_BYTES: usize = 5;

/// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("VarInt longer than {MAX_VAR_INT_BYTES} bytes")]
    MalformedVarInt,

    #[error("stream ended after {available} of {expected} bytes")]
    TruncatedRead { expected: usize, available: usize },

    #[error("string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("payload serialization error: {0}")]
    PayloadError(#[from] serde_json::Error),

    #[error("operation timed out")]
    Timeout,

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

impl ProtocolError {
    /// Whether this error is ordinary connection churn (peer vanished or
    /// sent a short frame) rather than a protocol violation worth a
    /// warning.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::TruncatedRead { .. } => true,
            ProtocolError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
