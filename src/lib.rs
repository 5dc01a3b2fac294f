//! # Signpost
//!
//! A stand-in game server that answers server-list pings and politely
//! turns players away.
//!
//! Signpost binds one TCP port, speaks just enough of the protocol to
//! appear in a client's server browser (description, player count,
//! version), and replies to every login attempt with a configurable
//! disconnect message. It runs no game and keeps no state.
//!
//! ## Layers
//! - [`core`]: VarInt wire primitives, packet framing, the stream codec
//! - [`protocol`]: handshake parsing, the dispatch table, chat/status documents
//! - [`transport`]: TCP listener, accept loop, per-connection handlers
//! - [`config`]: TOML settings and the read-only snapshot the core consumes
//! - [`error`]: the [`ProtocolError`] taxonomy
//!
//! ## Example
//! ```rust,no_run
//! use signpost::config::Settings;
//! use signpost::transport::Server;
//!
//! # async fn run() -> signpost::Result<()> {
//! let settings = Settings::default();
//! let server = Server::bind(settings.snapshot()?).await?;
//! server.run().await
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use error::{ProtocolError, Result};
