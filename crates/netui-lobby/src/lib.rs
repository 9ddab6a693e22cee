//! Multi-player lobby served over raw TCP.
//!
//! A small [`Application`](netui_server::Application) built on the netui
//! server: every client gets a player seat, edits its own name in place and
//! sees everyone else's names change as they type. It exercises the parts of
//! the server that single-client screens never reach: screens rebuilt for
//! every client on connect and disconnect, updates pushed to clients that are
//! not typing, and a background task editing all screens on a timer.
//!
//! # Components
//!
//! - [`LobbyState`]: seats and players, plain data
//! - [`Lobby`]: the application hooks, screen layout and uptime ticker

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod lobby;
pub mod state;

pub use lobby::{FIRST_ROW, Lobby, READY, STATUS, TITLE, UPTIME, lobby_screen, tick, uptime_text};
pub use state::{LobbyState, Player};
