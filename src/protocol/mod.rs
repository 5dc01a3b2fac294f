//! # Protocol Layer
//!
//! Packet classification and the payload documents it serves.
//!
//! ## Components
//! - **Handshake**: first-packet parsing and intent classification
//! - **Dispatcher**: the per-frame dispatch table and reply builder
//! - **Chat**: recursive rich-text nodes with omit-when-absent encoding
//! - **Status**: the server-browser status document

pub mod chat;
pub mod dispatcher;
pub mod handshake;
pub mod status;


pub use chat::{Chat, ClickEvent, HoverEvent};
pub use dispatcher::{dispatch, DisconnectReason, Verdict};
pub use handshake::Handshake;
pub use status::{PlayerCount, ServerVersion, StatusResponse};
