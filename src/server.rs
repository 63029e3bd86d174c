//! TCP accept loop, per-connection handling and graceful shutdown.
//!
//! Each accepted connection gets its own task and goes through
//! `Accepted → Reading → Dispatching → Writing → Closed` exactly once: one
//! read, one request, one response, then the socket is shut down. A failure
//! at any step closes that connection only.
//!
//! # Admission control
//!
//! Concurrent connections are capped by a semaphore. The accept loop takes a
//! permit *before* calling `accept`, so once the cap is reached it stops
//! pulling connections off the listener and pending clients wait in the
//! kernel backlog. The permit moves into the connection task and is released
//! when that task ends, however it ends.
//!
//! # Graceful shutdown
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Stops calling `accept`. No new connections are taken.
//! 2. Closes every connection still waiting for its request bytes. Without
//!    this, one silent client would keep [`Server::serve`] from returning, and
//!    with tokio owning the signal handlers only SIGKILL could stop the
//!    process.
//! 3. Lets connections that already have a request finish dispatching and
//!    writing their response.
//! 4. Returns from [`Server::serve`].

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Lookup, Router};
use crate::status::Status;

/// Default cap on concurrently served connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;

enum Listen {
    Addr(SocketAddr),
    Listener(TcpListener),
}

/// The HTTP server.
pub struct Server {
    listen: Listen,
    max_connections: usize,
}

impl Server {
    /// Configures the server to bind to `addr` when it starts serving.
    ///
    /// ```rust,no_run
    /// use shoal::Server;
    /// let server = Server::bind(([0, 0, 0, 0], 4221).into());
    /// ```
    pub fn bind(addr: SocketAddr) -> Self {
        Self { listen: Listen::Addr(addr), max_connections: DEFAULT_MAX_CONNECTIONS }
    }

    /// Serves on an already bound listener.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listen: Listen::Listener(listener), max_connections: DEFAULT_MAX_CONNECTIONS }
    }

    /// Caps the number of connections handled at once. Values below 1 are
    /// raised to 1.
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Accepts connections until SIGTERM or Ctrl-C, then drains in-flight
    /// connections and returns.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops when `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, router: Router, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let listener = match self.listen {
            Listen::Addr(addr) => TcpListener::bind(addr).await?,
            Listen::Listener(listener) => listener,
        };
        let router = Arc::new(router);
        let limit = Arc::new(Semaphore::new(self.max_connections));

        info!(
            addr = %listener.local_addr()?,
            max_connections = self.max_connections,
            "shoal listening"
        );

        // Tracks every connection task so shutdown can wait for them.
        let mut tasks = JoinSet::new();
        // Flipped to `true` once the shutdown future resolves; connection
        // tasks still in `Reading` watch it.
        let (closing_tx, closing_rx) = watch::channel(false);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Poll top to bottom so a pending shutdown wins over a
                // connection that is ready to be accepted.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = accept(&listener, &limit) => {
                    let (stream, peer, permit) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };
                    let router = Arc::clone(&router);
                    let closing = closing_rx.clone();
                    tasks.spawn(async move {
                        handle_connection(stream, peer, &router, closing).await;
                        drop(permit);
                    });
                }

                // Reap finished tasks so the set does not grow for the life of
                // the server.
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("connection task failed: {e}");
                    }
                }
            }
        }

        closing_tx.send_replace(true);
        while tasks.join_next().await.is_some() {}

        info!("shoal stopped");
        Ok(())
    }
}

/// Waits for a free connection slot, then for a connection.
///
/// The caller drops this future whenever another `select!` arm wins. That is
/// safe at either await: a permit acquired but not yet paired with a socket is
/// returned to the semaphore on drop, and `TcpListener::accept` is
/// cancel-safe, so no connection is lost.
async fn accept(
    listener: &TcpListener,
    limit: &Arc<Semaphore>,
) -> io::Result<(TcpStream, SocketAddr, OwnedSemaphorePermit)> {
    let permit = Arc::clone(limit).acquire_owned().await.map_err(io::Error::other)?;
    let (stream, peer) = listener.accept().await?;
    Ok((stream, peer, permit))
}

// ── Connection ────────────────────────────────────────────────────────────────

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    router: &Router,
    mut closing: watch::Receiver<bool>,
) {
    let read = tokio::select! {
        read = Request::read_from(&mut stream) => read,
        // The flag only ever goes from `false` to `true`, so any change (or
        // the sender going away with the server) means shutdown.
        _ = closing.changed() => {
            debug!(peer = %peer, "closing idle connection for shutdown");
            return;
        }
    };

    let response = match read {
        Ok(req) => {
            let (method, path) = (req.method().to_owned(), req.path().to_owned());
            let response = dispatch(router, req).await;
            info!(peer = %peer, %method, %path, status = response.code(), "request");
            response
        }
        Err(Error::MalformedRequestLine(line)) => {
            warn!(peer = %peer, ?line, "malformed request line");
            Response::status(Status::BadRequest)
        }
        Err(e) => {
            debug!(peer = %peer, "connection aborted: {e}");
            return;
        }
    };

    if let Err(e) = response.write_to(&mut stream).await {
        debug!(peer = %peer, "write error: {e}");
        return;
    }
    if let Err(e) = stream.shutdown().await {
        debug!(peer = %peer, "shutdown error: {e}");
    }
}

/// Routes one request and produces one response.
pub(crate) async fn dispatch(router: &Router, req: Request) -> Response {
    match router.lookup(req.method(), req.path()) {
        Lookup::Found(handler, params) => handler.call(req.with_params(params)).await,
        Lookup::MethodNotAllowed => Response::status(Status::MethodNotAllowed),
        Lookup::NotFound => Response::status(Status::NotFound),
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM or Ctrl-C. A signal that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
