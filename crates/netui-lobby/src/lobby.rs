//! The lobby application: a shared player list every client can edit.
//!
//! Every client sees the same list. Their own row is an entry they can type
//! into; everyone else's row is a label that follows what that player types.
//! A "Ready" button toggles a per-player flag, and a ticker refreshes the
//! uptime line on every screen once a second.
//!
//! # Locking
//!
//! Event handling runs with the originating screen locked and then takes the
//! lobby state (screen → state). Connect and disconnect take the state and
//! then only the registry's slot map. The ticker never touches the state.
//! No path takes a screen lock while holding the state.
//!
//! Updates for other players are applied after the state is released, so a
//! join or leave can rebuild every screen in between. Each update therefore
//! names the screen it was computed against; the registry drops it once that
//! screen has been replaced, and the rebuilt screen already shows the change.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use netui_core::{
    Attribute, Button, Color, Entry, Label, Screen, ScreenEvent, ScreenLock, SharedScreen,
    WidgetEvent,
};
use netui_server::{Application, ClientId, Registry, ScreenUpdate};
use tokio::time::{self, MissedTickBehavior};

use crate::state::LobbyState;

/// Widget index of the "Players: N" title
pub const TITLE: usize = 0;
/// Widget index of the ready count
pub const STATUS: usize = 1;
/// Widget index of the uptime line
pub const UPTIME: usize = 2;
/// Widget index of the ready button
pub const READY: usize = 3;
/// Widget index of the first player row; seat `i` is at `FIRST_ROW + i`
pub const FIRST_ROW: usize = 4;

/// Column all lobby widgets start at
const LEFT: u16 = 8;
/// Row of the title; player rows follow directly below
const TOP: u16 = 4;
/// Width of a player row, and the longest name accepted
const NAME_WIDTH: u16 = 16;
/// Width reserved for status lines
const LINE_WIDTH: u16 = 24;

/// Lobby application state shared by all connections.
#[derive(Debug)]
pub struct Lobby {
    inner: Mutex<Inner>,
    started: Instant,
}

/// Seats plus the screens built from them. Both change together under one
/// lock, so a screen in `screens` always matches the current seat layout.
#[derive(Debug, Default)]
struct Inner {
    state: LobbyState,
    screens: HashMap<ClientId, SharedScreen>,
}

impl Inner {
    /// Screens of every seated client other than `client`, in client order.
    fn others(&self, client: ClientId) -> Vec<(ClientId, SharedScreen)> {
        let mut others: Vec<_> = self
            .screens
            .iter()
            .filter(|(other, _)| **other != client)
            .map(|(other, screen)| (*other, Arc::clone(screen)))
            .collect();
        others.sort_unstable_by_key(|(other, _)| *other);
        others
    }

    /// Give every seated client a fresh screen built from the state.
    fn rebuild(&mut self, registry: &Registry, uptime: &str) {
        self.screens.clear();
        for client in self.state.clients() {
            let screen = ScreenLock::shared(lobby_screen(&self.state, client, uptime));
            if registry.set_shared(client, Arc::clone(&screen)) {
                self.screens.insert(client, screen);
            }
        }
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new()
    }
}

impl Lobby {
    /// Empty lobby; uptime counts from now.
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()), started: Instant::now() }
    }

    /// Time since the lobby was created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Run `f` with the lobby state locked.
    pub fn with_state<R>(&self, f: impl FnOnce(&LobbyState) -> R) -> R {
        f(&self.inner().state)
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Application for Lobby {
    fn connected(&self, client: ClientId, registry: &Registry) {
        let mut inner = self.inner();
        let seat = inner.state.join(client);
        tracing::info!(%client, seat, players = inner.state.players().len(), "player joined");
        inner.rebuild(registry, &uptime_text(self.uptime()));
    }

    fn disconnected(&self, client: ClientId, registry: &Registry) {
        let mut inner = self.inner();
        if inner.state.leave(client).is_none() {
            tracing::warn!(%client, "unknown player left");
            return;
        }
        tracing::info!(%client, players = inner.state.players().len(), "player left");
        inner.rebuild(registry, &uptime_text(self.uptime()));
    }

    fn event(
        &self,
        client: ClientId,
        screen: &mut Screen,
        event: ScreenEvent,
    ) -> Vec<ScreenUpdate> {
        match event.event {
            WidgetEvent::TextChanged(name) if event.widget >= FIRST_ROW => {
                let mut inner = self.inner();
                let Some(seat) = inner.state.rename(client, &name) else {
                    return Vec::new();
                };
                tracing::debug!(%client, seat, name = %name, "name changed");
                inner
                    .others(client)
                    .into_iter()
                    .map(|(other, screen)| ScreenUpdate::SetTextOn {
                        client: other,
                        screen,
                        widget: FIRST_ROW + seat,
                        text: name.clone(),
                    })
                    .collect()
            },
            WidgetEvent::Submitted(_) => {
                screen.set_focus(Some(READY));
                Vec::new()
            },
            WidgetEvent::Clicked if event.widget == READY => {
                let mut inner = self.inner();
                let Some(ready) = inner.state.toggle_ready(client) else {
                    return Vec::new();
                };
                let status = status_text(&inner.state);
                tracing::debug!(%client, ready, "ready toggled");

                if let Some(button) = screen.widget_mut(READY) {
                    button.set_text(ready_label(ready));
                }
                if let Some(line) = screen.widget_mut(STATUS) {
                    line.set_text(&status);
                }
                inner
                    .others(client)
                    .into_iter()
                    .map(|(other, screen)| ScreenUpdate::SetTextOn {
                        client: other,
                        screen,
                        widget: STATUS,
                        text: status.clone(),
                    })
                    .collect()
            },
            _ => Vec::new(),
        }
    }
}

/// Build the lobby screen `client` sees.
///
/// Widget indices are fixed by [`TITLE`], [`STATUS`], [`UPTIME`], [`READY`]
/// and [`FIRST_ROW`]. The client's own row is a focused entry; clients
/// without a seat get the read-only list.
pub fn lobby_screen(state: &LobbyState, client: ClientId, uptime: &str) -> Screen {
    let players = state.players();
    let own = state.seat(client);
    let below = TOP.saturating_add(u16::try_from(players.len()).unwrap_or(u16::MAX));
    let plain = Attribute::new(Color::LightWhite, Color::Black);

    let ready = own.is_some_and(|seat| players[seat].ready);

    let mut screen = Screen::new();
    let title = format!("Players: {}", players.len());
    screen.push(Label::new(LEFT, TOP, plain.underline(), title));
    let status = status_text(state);
    screen.push(Label::new(LEFT, below.saturating_add(5), plain, status).with_max(LINE_WIDTH));
    screen.push(Label::new(LEFT, below.saturating_add(6), plain, uptime).with_max(LINE_WIDTH));
    screen.push(Button::new(LEFT, below.saturating_add(2), plain, ready_label(ready)));

    for (seat, player) in players.iter().enumerate() {
        let attr = Attribute::new(row_color(seat), Color::Black);
        let y = (TOP + 1).saturating_add(u16::try_from(seat).unwrap_or(u16::MAX));
        if Some(seat) == own {
            let entry = Entry::new(LEFT, y, attr.bold(), NAME_WIDTH);
            screen.push(entry.with_text(player.name.clone()));
        } else {
            screen.push(Label::new(LEFT, y, attr, player.name.clone()).with_max(NAME_WIDTH));
        }
    }

    if let Some(seat) = own {
        screen.set_focus(Some(FIRST_ROW + seat));
    }
    screen
}

/// Row color of `seat`: the light colors from red on, wrapping before black.
fn row_color(seat: usize) -> Color {
    Color::cycle(9 + seat % 7)
}

fn status_text(state: &LobbyState) -> String {
    format!("Ready: {}/{}", state.ready_count(), state.players().len())
}

fn ready_label(ready: bool) -> &'static str {
    if ready { "[x] Ready" } else { "[ ] Ready" }
}

/// Uptime line, e.g. `Uptime: 01:02:03`.
pub fn uptime_text(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("Uptime: {:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// Refresh the uptime line on every connected screen each `period`.
///
/// Locks one screen at a time through the registry and never touches the
/// lobby state.
pub async fn tick(lobby: &Lobby, registry: &Registry, period: Duration) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let text = uptime_text(lobby.uptime());
        registry.for_each_screen(registry.clients(), |_, screen| {
            if let Some(line) = screen.widget_mut(UPTIME) {
                line.set_text(&text);
            }
        });
    }
}
