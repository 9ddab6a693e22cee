//! netui screen server.
//!
//! Serves interactive text screens to any number of clients over raw TCP.
//! Clients need nothing but a terminal and a plain socket (`nc`, `telnet` in
//! raw mode): the server sends ANSI escape sequences out and reads raw key
//! bytes in.
//!
//! # Architecture
//!
//! This crate is the I/O glue around [`netui_core`]. Rendering, widgets and
//! focus are pure data there; here every accepted connection gets a Tokio
//! task running a [`Connection`], and a shared [`Registry`] maps each
//! [`ClientId`] to the screen that client currently sees. An
//! [`Application`] decides what goes on those screens.
//!
//! # Components
//!
//! - [`Server`]: binds the listener and spawns one task per connection
//! - [`Connection`]: per-client render/read loop
//! - [`Registry`]: client → screen mapping, safe to use from any task
//! - [`Application`]: connect, disconnect and widget event hooks
//! - [`ScreenUpdate`]: typed cross-client screen edits returned by hooks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod config;
mod connection;
mod error;
mod registry;

use std::{future::Future, net::SocketAddr, sync::Arc};

pub use app::{Application, ScreenUpdate};
pub use config::{ConnectionConfig, ServerConfig};
pub use connection::{Connection, ConnectionState};
pub use error::ServerError;
pub use registry::{ClientId, Registry};
use tokio::net::TcpListener;

/// Production netui server.
///
/// Owns the listener, the registry and the application. Construction
/// validates the configuration and binds; [`Server::run`] accepts forever.
pub struct Server<A> {
    /// Bound TCP listener
    listener: TcpListener,
    /// Client → screen mapping shared with every connection
    registry: Arc<Registry>,
    /// Application hooks
    app: Arc<A>,
    /// Settings handed to each connection
    config: ConnectionConfig,
}

impl<A: Application> Server<A> {
    /// Validate `config` and bind the listener.
    pub async fn bind(config: ServerConfig, app: Arc<A>) -> Result<Self, ServerError> {
        config.validate()?;
        let ServerConfig { bind_address, connection } = config;

        let listener = match TcpListener::bind(&bind_address).await {
            Ok(listener) => listener,
            Err(source) => return Err(ServerError::Bind { addr: bind_address, source }),
        };

        Ok(Self { listener, registry: Arc::new(Registry::new()), app, config: connection })
    }

    /// Registry shared by every connection of this server.
    ///
    /// Background tasks use it to push screen changes to clients.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server, accepting connections until the process ends.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server until `shutdown` completes.
    ///
    /// Stops accepting when `shutdown` resolves. Connections already running
    /// keep their tasks and end on their own.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), ServerError> {
        tracing::info!("Server listening on {}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Server shutting down");
                    return Ok(());
                },
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        if let Err(e) = stream.set_nodelay(true) {
                            tracing::debug!(%peer, "Failed to set TCP_NODELAY: {}", e);
                        }

                        let client = self.registry.connect();
                        tracing::info!(%client, %peer, "client connected");

                        let connection = Connection::new(
                            client,
                            stream,
                            Arc::clone(&self.registry),
                            Arc::clone(&self.app),
                            self.config,
                        );
                        tokio::spawn(connection.run());
                    },
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                    },
                },
            }
        }
    }
}
