//! # Transport Layer
//!
//! The TCP listener, accept loop, and per-connection handlers.

pub mod tcp;

pub use tcp::Server;
