//! # TCP Server
//!
//! Listener bind, accept loop, and the per-connection frame loop.
//!
//! Each accepted connection moves into its own task that owns the socket
//! exclusively; handlers share nothing but the read-only settings
//! snapshot. The accept loop runs until a shutdown signal arrives, then
//! drains in-flight connections (bounded by the configured timeout)
//! before reporting the server stopped.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, trace, warn};

use crate::config::Snapshot;
use crate::core::codec::PacketCodec;
use crate::core::packet::Packet;
use crate::error::Result;
use crate::protocol::dispatcher::{dispatch, DisconnectReason, Verdict};
use crate::utils::timeout::{with_timeout_error, DEFAULT_TIMEOUT};

/// A bound, not-yet-running server.
pub struct Server {
    listener: TcpListener,
    state: Arc<Snapshot>,
}

impl Server {
    /// Binds the listening socket on the snapshot's configured port.
    pub async fn bind(snapshot: Snapshot) -> Result<Server> {
        let addr = SocketAddr::from(([0, 0, 0, 0], snapshot.port()));
        let listener = TcpListener::bind(addr).await?;
        info!(port = snapshot.port(), "server listening");
        Ok(Self {
            listener,
            state: Arc::new(snapshot),
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs until CTRL+C, then shuts down gracefully.
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("received CTRL+C signal, shutting down");
                let _ = shutdown_tx.send(()).await;
            }
        });

        self.run_with_shutdown(shutdown_rx).await
    }

    /// Runs the accept loop until a message arrives on `shutdown_rx`.
    ///
    /// New connections stop being admitted the moment the signal is
    /// observed; handlers already running get to finish their current
    /// exchange. Returns only after the drain completes, so a return
    /// means the server has actually stopped.
    ///
    /// # Errors
    /// An accept failure means the listening socket itself has gone bad
    /// and is fatal to the whole server; per-connection failures never
    /// reach this loop.
    pub async fn run_with_shutdown(self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        let active_connections = Arc::new(Mutex::new(0u32));

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("shutting down server, waiting for connections to close");
                    drain_connections(&active_connections, self.state.shutdown_timeout()).await;
                    info!("server stopped");
                    return Ok(());
                }

                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            debug!(%peer, "connection accepted");
                            let state = Arc::clone(&self.state);
                            let active_connections = Arc::clone(&active_connections);

                            {
                                let mut count = active_connections.lock().await;
                                *count += 1;
                            }

                            tokio::spawn(async move {
                                handle_connection(stream, peer, state).await;
                                let mut count = active_connections.lock().await;
                                *count -= 1;
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "accept failed, stopping server");
                            return Err(e.into());
                        }
                    }
                }
            }
        }
    }
}

/// Waits for active connections to finish, bounded by `limit`.
async fn drain_connections(active_connections: &Arc<Mutex<u32>>, limit: Duration) {
    let timeout = tokio::time::sleep(limit);
    tokio::pin!(timeout);

    loop {
        tokio::select! {
            _ = &mut timeout => {
                warn!("shutdown timeout reached, forcing exit");
                return;
            }
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                let connections = *active_connections.lock().await;
                if connections == 0 {
                    info!("all connections closed");
                    return;
                }
                debug!(connections, "waiting for connections to close");
            }
        }
    }
}

/// Per-connection loop: read one frame, dispatch, reply, maybe close.
///
/// Every failure here ends only this connection; nothing propagates to
/// the accept loop or to other handlers.
pub(crate) async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<Snapshot>) {
    let mut framed = Framed::new(stream, PacketCodec);

    loop {
        let packet = match framed.next().await {
            None => {
                debug!(%peer, "connection closed by peer");
                return;
            }
            Some(Err(e)) if e.is_disconnect() => {
                info!(%peer, "client forcefully disconnected (or lost connection)");
                return;
            }
            Some(Err(e)) => {
                warn!(%peer, error = %e, "dropping connection after framing error");
                return;
            }
            Some(Ok(packet)) => packet,
        };
        debug!(%peer, id = packet.id, len = packet.body_len(), "frame received");

        let verdict = match dispatch(&packet, &state) {
            Ok(verdict) => verdict,
            Err(e) if e.is_disconnect() => {
                info!(%peer, "client forcefully disconnected (or lost connection)");
                return;
            }
            Err(e) => {
                warn!(%peer, error = %e, "malformed frame, dropping connection");
                return;
            }
        };

        match verdict {
            Verdict::Silent => {}
            Verdict::Reply(reply) => {
                if let Err(e) = send_reply(&mut framed, reply).await {
                    debug!(%peer, error = %e, "failed to write reply");
                    return;
                }
            }
            Verdict::ReplyAndClose(reply, reason) => {
                match reason {
                    DisconnectReason::LoginAttempt => {
                        info!(%peer, "a user tried to login to the server");
                    }
                    DisconnectReason::UnknownPacket(id) => {
                        warn!(%peer, id, "unknown packet, sending in-game kick");
                    }
                }
                if let Err(e) = send_reply(&mut framed, reply).await {
                    debug!(%peer, error = %e, "failed to write kick");
                }
                debug!(%peer, "disconnecting client");
                return;
            }
        }
    }
}

/// Writes one reply frame, bounded by the send timeout.
async fn send_reply(framed: &mut Framed<TcpStream, PacketCodec>, reply: Packet) -> Result<()> {
    trace_reply(&reply);
    with_timeout_error(framed.send(reply), DEFAULT_TIMEOUT).await
}

/// Hex-dumps an outbound frame at trace level.
fn trace_reply(reply: &Packet) {
    if tracing::enabled!(tracing::Level::TRACE) {
        let hex = reply
            .to_bytes()
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(", ");
        trace!(len = reply.body_len(), id = reply.id, bytes = %hex, "reply frame");
    }
}
