//! The application contract: what the server calls, and what it may return.
//!
//! An [`Application`] owns everything the server does not: which screen a new
//! client sees, what widget events mean, and how one client's actions show
//! up on other clients' displays.
//!
//! Event handling runs while the originating client's screen is write-locked,
//! and the handler gets that screen directly as `&mut Screen`. Changes to any
//! other screen go out as [`ScreenUpdate`] values; the connection applies
//! them after the originating lock is released. A handler therefore never
//! holds two screen locks, and two clients handling events at the same time
//! cannot deadlock on each other.

use netui_core::{Screen, ScreenEvent, SharedScreen};

use crate::{ClientId, Registry};

/// A typed command that mutates some client's registered screen.
#[derive(Debug)]
pub enum ScreenUpdate {
    /// Set the text of a label or entry.
    SetText {
        /// Client whose screen is edited
        client: ClientId,
        /// Widget index in that screen
        widget: usize,
        /// New text
        text: String,
    },
    /// Set the text of a widget on one particular screen.
    ///
    /// Applied only while `screen` is still the screen registered for
    /// `client`. Use it when the widget index was chosen against a layout
    /// that may be replaced before the update is applied.
    SetTextOn {
        /// Client whose screen is edited
        client: ClientId,
        /// Screen the widget index refers to
        screen: SharedScreen,
        /// Widget index in that screen
        widget: usize,
        /// New text
        text: String,
    },
    /// Move or clear focus.
    SetFocus {
        /// Client whose screen is edited
        client: ClientId,
        /// New focus, `None` to clear it
        widget: Option<usize>,
    },
    /// Register a whole new screen.
    Replace {
        /// Client whose screen is replaced
        client: ClientId,
        /// The new screen
        screen: Screen,
    },
}

impl ScreenUpdate {
    /// Client the update targets.
    pub fn client(&self) -> ClientId {
        match self {
            Self::SetText { client, .. }
            | Self::SetTextOn { client, .. }
            | Self::SetFocus { client, .. }
            | Self::Replace { client, .. } => *client,
        }
    }
}

/// Hooks the server calls over a client's lifetime.
///
/// All hooks run synchronously on the connection's task and must not block
/// on I/O.
pub trait Application: Send + Sync + 'static {
    /// A client was accepted and has a live registry slot.
    ///
    /// Runs before anything is rendered to the client. Register its initial
    /// screen here with [`Registry::set_screen`]; until then the client sees
    /// a blank terminal and its input is skipped.
    fn connected(&self, client: ClientId, registry: &Registry);

    /// A client's connection ended.
    ///
    /// Called exactly once per client, after its registry slot was removed.
    fn disconnected(&self, client: ClientId, registry: &Registry);

    /// A widget on `client`'s screen emitted an event.
    ///
    /// `screen` is the client's own screen, already write-locked. Returned
    /// updates are applied after that lock is released.
    fn event(
        &self,
        client: ClientId,
        screen: &mut Screen,
        event: ScreenEvent,
    ) -> Vec<ScreenUpdate> {
        let _ = (client, screen, event);
        Vec::new()
    }
}
