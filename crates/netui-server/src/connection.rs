//! Per-client connection handler.
//!
//! One [`Connection`] runs on its own task for every accepted client. It owns
//! the byte stream and the last frame sent, and nothing else: the screen it
//! shows is looked up in the [`Registry`] on every iteration, so a screen
//! replaced from anywhere is picked up on the next render.
//!
//! # Lifecycle
//!
//! ```text
//! Connecting ──run()──► Active ──EOF / I/O error──► Closed
//! ```
//!
//! While active the handler alternates between a bounded one-byte read and a
//! diff render. A read that times out is not an error, it just triggers a
//! render; this is how changes pushed by other clients or background tasks
//! reach an idle client within one poll interval.

use std::{io, sync::Arc};

use bytes::BytesMut;
use netui_core::{FrameBuffer, escape};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time,
};

use crate::{Application, ClientId, ConnectionConfig, Registry};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Accepted, connect hook not yet run
    Connecting,
    /// Rendering and reading input
    Active,
    /// Stream ended, registry slot removed, disconnect hook run
    Closed,
}

/// Handler for one client's byte stream.
///
/// Generic over the stream so it can be driven by a `TcpStream` in
/// production and an in-memory duplex pipe in tests.
pub struct Connection<S, A> {
    client: ClientId,
    stream: S,
    registry: Arc<Registry>,
    app: Arc<A>,
    config: ConnectionConfig,
    state: ConnectionState,
    /// What the client's terminal currently shows
    previous: FrameBuffer,
    /// Bytes waiting to be flushed
    out: BytesMut,
    /// Set once the missing-screen warning has been logged
    warned_missing: bool,
}

impl<S, A> Connection<S, A>
where
    S: AsyncRead + AsyncWrite + Unpin,
    A: Application,
{
    /// Create a handler for an accepted client.
    ///
    /// `client` must already have a live slot in `registry`.
    pub fn new(
        client: ClientId,
        stream: S,
        registry: Arc<Registry>,
        app: Arc<A>,
        config: ConnectionConfig,
    ) -> Self {
        Self {
            client,
            stream,
            registry,
            app,
            config,
            state: ConnectionState::Connecting,
            previous: FrameBuffer::blank(config.width, config.height, netui_core::Color::Default),
            out: BytesMut::with_capacity(4096),
            warned_missing: false,
        }
    }

    /// Client this connection serves.
    pub fn client(&self) -> ClientId {
        self.client
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Serve the client until its stream ends.
    ///
    /// Runs the connect hook, then the render/read loop. However the loop
    /// ends, the registry slot is removed and then the disconnect hook runs,
    /// exactly once.
    pub async fn run(mut self) {
        self.state = ConnectionState::Active;
        self.app.connected(self.client, &self.registry);

        if let Err(e) = self.serve().await {
            tracing::debug!(client = %self.client, "Connection error: {}", e);
        }

        self.close();
    }

    async fn serve(&mut self) -> io::Result<()> {
        escape::reset(&mut self.out);
        self.render().await?;

        let mut byte = [0u8; 1];
        loop {
            match time::timeout(self.config.poll_interval, self.stream.read(&mut byte)).await {
                // Idle: fall through and pick up external changes.
                Err(_elapsed) => {},
                Ok(Ok(0)) => return Ok(()),
                Ok(Ok(_)) => {
                    if !self.dispatch(byte[0]) {
                        continue;
                    }
                },
                Ok(Err(e)) => return Err(e),
            }
            self.render().await?;
        }
    }

    /// Route one input byte to the current screen and the application.
    ///
    /// Returns `false` if the client has no screen registered.
    fn dispatch(&mut self, key: u8) -> bool {
        let Some(screen) = self.registry.get_screen(self.client) else {
            return false;
        };

        let updates = {
            let mut guard = screen.write();
            match guard.dispatch_key(key) {
                Some(event) => self.app.event(self.client, &mut guard, event),
                None => Vec::new(),
            }
        };

        self.registry.apply(updates);
        true
    }

    /// Diff the currently registered screen against the last frame sent and
    /// flush the result together with any pending bytes.
    async fn render(&mut self) -> io::Result<()> {
        match self.registry.get_screen(self.client) {
            Some(screen) => {
                self.warned_missing = false;
                let frame = screen.read().render(&self.previous, self.config.background);
                tracing::trace!(
                    client = %self.client,
                    written = frame.stats.cells_written,
                    skipped = frame.stats.cells_skipped,
                    bytes = frame.stats.bytes,
                    "frame"
                );
                self.out.extend_from_slice(&frame.bytes);
                self.previous = frame.buffer;
            },
            None if !self.warned_missing => {
                tracing::warn!(client = %self.client, "no screen registered for live client");
                self.warned_missing = true;
            },
            None => {},
        }

        if self.out.is_empty() {
            return Ok(());
        }
        self.stream.write_all_buf(&mut self.out).await?;
        self.stream.flush().await
    }

    fn close(&mut self) {
        self.state = ConnectionState::Closed;
        self.registry.remove(self.client);
        tracing::info!(client = %self.client, "client disconnected");
        self.app.disconnected(self.client, &self.registry);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use netui_core::{Attribute, Color, Entry, Screen};

    use super::*;

    #[derive(Default)]
    struct Hooks {
        calls: Mutex<Vec<&'static str>>,
    }

    impl Application for Hooks {
        fn connected(&self, client: ClientId, registry: &Registry) {
            self.calls.lock().unwrap().push("connected");
            let mut screen = Screen::new();
            let attr = Attribute::new(Color::White, Color::Black);
            let entry = screen.push(Entry::new(0, 0, attr, 4));
            screen.set_focus(Some(entry));
            registry.set_screen(client, screen);
        }

        fn disconnected(&self, client: ClientId, registry: &Registry) {
            assert!(registry.get_screen(client).is_none());
            self.calls.lock().unwrap().push("disconnected");
        }
    }

    #[tokio::test]
    async fn hooks_run_once_around_the_session() {
        let registry = Arc::new(Registry::new());
        let app = Arc::new(Hooks::default());
        let (server, client) = tokio::io::duplex(1 << 16);

        let id = registry.connect();
        let config = ConnectionConfig { width: 8, height: 2, ..ConnectionConfig::default() };
        let connection =
            Connection::new(id, server, Arc::clone(&registry), Arc::clone(&app), config);
        assert_eq!(connection.state(), ConnectionState::Connecting);
        assert_eq!(connection.client(), id);

        drop(client);
        connection.run().await;

        assert_eq!(*app.calls.lock().unwrap(), vec!["connected", "disconnected"]);
        assert!(!registry.is_live(id));
    }
}
