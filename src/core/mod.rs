//! # Core Protocol Components
//!
//! Low-level packet handling, framing, and wire primitives.
//!
//! This module provides the foundation for the protocol: VarInt and
//! big-endian encoding, packet framing, and the stream codec.
//!
//! ## Components
//! - **Wire**: VarInts, fixed-width integers, length-prefixed strings
//! - **Packet**: one frame (declared length, packet ID, payload)
//! - **Codec**: Tokio codec for framing over byte streams
//!
//! ## Wire Format
//! ```text
//! [body length: VarInt] [packet ID: VarInt] [payload: N bytes]
//! ```
//!
//! ## Security
//! - Maximum frame size: 64 KiB (length validated before allocation)
//! - VarInts capped at 5 bytes; longer prefixes abort the connection

pub mod codec;
pub mod packet;
pub mod wire;
