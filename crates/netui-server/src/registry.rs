//! Client registry: which screen each connected client is looking at.
//!
//! The registry is the only path from application code to a client's display.
//! Every accepted connection gets a live slot keyed by its [`ClientId`]; the
//! slot holds the client's current [`SharedScreen`] once the application has
//! registered one. Removing the slot is what "disconnected" means to the rest
//! of the system: from that moment [`Registry::get_screen`] returns `None`
//! and [`Registry::set_screen`] is ignored, so a late update can never
//! resurrect a departed client.
//!
//! # Locking
//!
//! The slot map sits behind one `RwLock`, held only long enough to clone an
//! `Arc` out or swap one in. It is never held while a screen lock is taken.
//! Screens themselves are locked in increasing [`ClientId`] order whenever
//! more than one is involved; [`Registry::apply`],
//! [`Registry::for_each_screen`] and [`Registry::with_screens_locked`] all
//! follow that order.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use netui_core::{Screen, ScreenLock, SharedScreen};

use crate::ScreenUpdate;

/// Identifier assigned to a connection when it is accepted.
///
/// Identifiers increase monotonically and are never reused within one
/// registry, so their order doubles as the global screen lock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Concurrent mapping from live clients to their current screen.
#[derive(Debug, Default)]
pub struct Registry {
    /// Live slots. `None` until the application registers a screen.
    slots: RwLock<HashMap<ClientId, Option<SharedScreen>>>,
    /// Next identifier handed out by [`Registry::connect`]
    next_id: AtomicU64,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next client identifier and open a live slot for it.
    pub fn connect(&self) -> ClientId {
        let client = ClientId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.slots_mut().insert(client, None);
        client
    }

    /// Close a client's slot, returning the screen it had registered.
    ///
    /// After this returns, [`get_screen`](Self::get_screen) yields `None` and
    /// [`set_screen`](Self::set_screen) is ignored for `client`.
    pub fn remove(&self, client: ClientId) -> Option<SharedScreen> {
        self.slots_mut().remove(&client).flatten()
    }

    /// Replace the screen shown to `client`.
    ///
    /// Callable from any context, including another client's event handling.
    /// Returns `false` (and does nothing) if `client` is not live.
    pub fn set_screen(&self, client: ClientId, screen: Screen) -> bool {
        self.set_shared(client, ScreenLock::shared(screen))
    }

    /// Like [`set_screen`](Self::set_screen) with an already shared screen.
    ///
    /// Several clients may be pointed at the same `SharedScreen`; edits made
    /// through one are then visible to all of them.
    pub fn set_shared(&self, client: ClientId, screen: SharedScreen) -> bool {
        if let Some(slot) = self.slots_mut().get_mut(&client) {
            *slot = Some(screen);
            return true;
        }
        tracing::debug!(%client, "ignoring screen for client that is not connected");
        false
    }

    /// Current screen of `client`.
    ///
    /// `None` for unknown or disconnected clients, and for live clients that
    /// have no screen yet. Callers skip, never error.
    pub fn get_screen(&self, client: ClientId) -> Option<SharedScreen> {
        self.slots().get(&client).cloned().flatten()
    }

    /// Whether `client` has a live slot.
    pub fn is_live(&self, client: ClientId) -> bool {
        self.slots().contains_key(&client)
    }

    /// Live clients in ascending identifier order.
    pub fn clients(&self) -> Vec<ClientId> {
        let mut clients: Vec<ClientId> = self.slots().keys().copied().collect();
        clients.sort_unstable();
        clients
    }

    /// Number of live clients.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// Whether no client is live.
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Visit the screens of `clients`, locking one at a time in increasing
    /// identifier order.
    ///
    /// Clients without a screen are skipped. Must not be called while holding
    /// a screen lock.
    pub fn for_each_screen<I, F>(&self, clients: I, mut f: F)
    where
        I: IntoIterator<Item = ClientId>,
        F: FnMut(ClientId, &mut Screen),
    {
        for (client, screen) in self.screens_of(clients) {
            f(client, &mut *screen.write());
        }
    }

    /// Hold the write locks of every screen in `clients` at once.
    ///
    /// Locks are acquired in increasing identifier order and released after
    /// `f` returns. `f` sees the locked screens in that same order; clients
    /// without a screen are left out, and a screen shared by several clients
    /// is locked once, under the lowest of their identifiers. Must not be
    /// called while holding a screen lock.
    pub fn with_screens_locked<I, F, R>(&self, clients: I, f: F) -> R
    where
        I: IntoIterator<Item = ClientId>,
        F: FnOnce(&mut [(ClientId, &mut Screen)]) -> R,
    {
        let mut screens: Vec<(ClientId, SharedScreen)> = Vec::new();
        for (client, screen) in self.screens_of(clients) {
            if !screens.iter().any(|(_, seen)| Arc::ptr_eq(seen, &screen)) {
                screens.push((client, screen));
            }
        }
        let mut guards: Vec<(ClientId, RwLockWriteGuard<'_, Screen>)> =
            screens.iter().map(|(client, screen)| (*client, screen.write())).collect();
        let mut locked: Vec<(ClientId, &mut Screen)> =
            guards.iter_mut().map(|(client, guard)| (*client, &mut **guard)).collect();
        f(&mut locked)
    }

    /// Apply screen updates, one screen lock at a time in increasing client
    /// order. Updates for the same client keep their relative order.
    ///
    /// Updates for clients that are gone, and targeted updates whose screen
    /// has since been replaced, are dropped; updates naming a widget the
    /// screen does not have are logged and skipped.
    pub fn apply(&self, mut updates: Vec<ScreenUpdate>) {
        updates.sort_by_key(ScreenUpdate::client);

        for update in updates {
            match update {
                ScreenUpdate::Replace { client, screen } => {
                    self.set_screen(client, screen);
                },
                ScreenUpdate::SetText { client, widget, text } => {
                    let Some(screen) = self.get_screen(client) else { continue };
                    set_text(client, &screen, widget, &text);
                },
                ScreenUpdate::SetTextOn { client, screen, widget, text } => {
                    let current = self.get_screen(client);
                    if !current.is_some_and(|current| Arc::ptr_eq(&current, &screen)) {
                        tracing::debug!(%client, widget, "dropping update for replaced screen");
                        continue;
                    }
                    set_text(client, &screen, widget, &text);
                },
                ScreenUpdate::SetFocus { client, widget } => {
                    let Some(screen) = self.get_screen(client) else { continue };
                    if !screen.write().set_focus(widget) {
                        tracing::warn!(%client, ?widget, "focus update for unknown widget");
                    }
                },
            }
        }
    }

    /// Screens of the given clients, deduplicated and sorted by identifier.
    fn screens_of(
        &self,
        clients: impl IntoIterator<Item = ClientId>,
    ) -> Vec<(ClientId, SharedScreen)> {
        let mut clients: Vec<ClientId> = clients.into_iter().collect();
        clients.sort_unstable();
        clients.dedup();

        let slots = self.slots();
        clients
            .into_iter()
            .filter_map(|client| slots.get(&client).cloned().flatten().map(|s| (client, s)))
            .collect()
    }

    fn slots(&self) -> RwLockReadGuard<'_, HashMap<ClientId, Option<SharedScreen>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn slots_mut(&self) -> RwLockWriteGuard<'_, HashMap<ClientId, Option<SharedScreen>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn set_text(client: ClientId, screen: &ScreenLock, widget: usize, text: &str) {
    let applied = screen.write().widget_mut(widget).is_some_and(|w| w.set_text(text));
    if !applied {
        tracing::warn!(%client, widget, "text update for unknown widget");
    }
}

#[cfg(test)]
mod tests {
    use netui_core::{Attribute, Color, Entry, Label};

    use super::*;

    fn labelled(text: &str) -> Screen {
        let mut screen = Screen::new();
        screen.push(Label::new(0, 0, Attribute::new(Color::White, Color::Black), text));
        screen
    }

    fn first_text(registry: &Registry, client: ClientId) -> Option<String> {
        let screen = registry.get_screen(client)?;
        let guard = screen.read();
        guard.widget(0).and_then(|w| w.text()).map(str::to_owned)
    }

    #[test]
    fn connect_assigns_increasing_ids() {
        let registry = Registry::new();
        let a = registry.connect();
        let b = registry.connect();
        assert!(a < b);
        assert_eq!(registry.clients(), vec![a, b]);
        assert!(registry.get_screen(a).is_none());
        assert!(registry.is_live(a));
    }

    #[test]
    fn set_then_get_screen() {
        let registry = Registry::new();
        let client = registry.connect();
        assert!(registry.set_screen(client, labelled("hello")));
        assert_eq!(first_text(&registry, client).as_deref(), Some("hello"));

        assert!(registry.set_screen(client, labelled("again")));
        assert_eq!(first_text(&registry, client).as_deref(), Some("again"));
    }

    #[test]
    fn removed_client_is_not_resurrected() {
        let registry = Registry::new();
        let client = registry.connect();
        registry.set_screen(client, labelled("x"));

        assert!(registry.remove(client).is_some());
        assert!(registry.get_screen(client).is_none());
        assert!(!registry.set_screen(client, labelled("late")));
        assert!(registry.get_screen(client).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_client_is_ignored() {
        let registry = Registry::new();
        assert!(!registry.set_screen(ClientId(42), labelled("nobody")));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn shared_screen_is_seen_by_both_clients() {
        let registry = Registry::new();
        let a = registry.connect();
        let b = registry.connect();
        let shared = ScreenLock::shared(labelled("same"));
        registry.set_shared(a, shared.clone());
        registry.set_shared(b, shared);

        registry.apply(vec![ScreenUpdate::SetText { client: a, widget: 0, text: "edited".into() }]);
        assert_eq!(first_text(&registry, b).as_deref(), Some("edited"));
    }

    #[test]
    fn apply_skips_departed_clients_and_unknown_widgets() {
        let registry = Registry::new();
        let a = registry.connect();
        let b = registry.connect();
        registry.set_screen(a, labelled("a"));
        registry.set_screen(b, labelled("b"));
        registry.remove(a);

        registry.apply(vec![
            ScreenUpdate::SetText { client: b, widget: 9, text: "nope".into() },
            ScreenUpdate::SetText { client: a, widget: 0, text: "gone".into() },
            ScreenUpdate::SetText { client: b, widget: 0, text: "B".into() },
        ]);

        assert_eq!(first_text(&registry, b).as_deref(), Some("B"));
        assert!(registry.get_screen(a).is_none());
    }

    #[test]
    fn targeted_update_skips_replaced_screen() {
        let registry = Registry::new();
        let client = registry.connect();
        let original = ScreenLock::shared(labelled("before"));
        registry.set_shared(client, Arc::clone(&original));

        let current = ScreenUpdate::SetTextOn {
            client,
            screen: Arc::clone(&original),
            widget: 0,
            text: "applied".into(),
        };
        registry.apply(vec![current]);
        assert_eq!(first_text(&registry, client).as_deref(), Some("applied"));

        registry.set_screen(client, labelled("rebuilt"));
        let stale =
            ScreenUpdate::SetTextOn { client, screen: original, widget: 0, text: "stale".into() };
        registry.apply(vec![stale]);
        assert_eq!(first_text(&registry, client).as_deref(), Some("rebuilt"));
    }

    #[test]
    fn apply_focus_and_replace() {
        let registry = Registry::new();
        let client = registry.connect();
        let mut screen = labelled("title");
        let entry = screen.push(Entry::new(0, 1, Attribute::default(), 8));
        registry.set_screen(client, screen);

        registry.apply(vec![ScreenUpdate::SetFocus { client, widget: Some(entry) }]);
        assert_eq!(registry.get_screen(client).map(|s| s.read().focus()), Some(Some(entry)));

        registry.apply(vec![ScreenUpdate::Replace { client, screen: labelled("new") }]);
        assert_eq!(first_text(&registry, client).as_deref(), Some("new"));
    }

    #[test]
    fn with_screens_locked_orders_by_id() {
        let registry = Registry::new();
        let ids: Vec<ClientId> = (0..4).map(|_| registry.connect()).collect();
        for (i, id) in ids.iter().enumerate() {
            registry.set_screen(*id, labelled(&i.to_string()));
        }

        let seen = registry.with_screens_locked([ids[3], ids[1], ids[3], ids[0]], |screens| {
            for (_, screen) in screens.iter_mut() {
                screen.push(Label::new(0, 1, Attribute::default(), "locked"));
            }
            screens.iter().map(|(id, _)| *id).collect::<Vec<_>>()
        });

        assert_eq!(seen, vec![ids[0], ids[1], ids[3]]);
        assert_eq!(registry.get_screen(ids[2]).map(|s| s.read().len()), Some(1));
        assert_eq!(registry.get_screen(ids[3]).map(|s| s.read().len()), Some(2));
    }

    #[test]
    fn shared_screen_is_locked_once() {
        let registry = Registry::new();
        let a = registry.connect();
        let b = registry.connect();
        let shared = ScreenLock::shared(labelled("same"));
        registry.set_shared(a, Arc::clone(&shared));
        registry.set_shared(b, shared);

        let seen = registry.with_screens_locked([b, a], |screens| {
            screens.iter().map(|(id, _)| *id).collect::<Vec<_>>()
        });
        assert_eq!(seen, vec![a]);
    }

    #[test]
    fn for_each_screen_skips_clients_without_screen() {
        let registry = Registry::new();
        let a = registry.connect();
        let b = registry.connect();
        registry.set_screen(b, labelled("b"));

        let mut visited = Vec::new();
        registry.for_each_screen([b, a], |client, _| visited.push(client));
        assert_eq!(visited, vec![b]);
    }
}
