//! Lobby state: who is seated where, and what they have entered.
//!
//! Plain data, no locking and no screens. Each connected client owns one
//! seat; seats are dense (`0..players().len()`) so a seat number doubles as
//! the player's row on every lobby screen.

use std::collections::HashMap;

use netui_server::ClientId;

/// One seated player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    /// Name as typed so far
    pub name: String,
    /// Whether the player pressed "Ready"
    pub ready: bool,
}

/// Seats and players of the lobby.
///
/// # Invariants
///
/// - `seats` maps every joined client to a distinct index in
///   `0..players.len()`, and every index is taken by exactly one client.
#[derive(Debug, Default)]
pub struct LobbyState {
    /// Client → seat index
    seats: HashMap<ClientId, usize>,
    /// Players by seat
    players: Vec<Player>,
}

impl LobbyState {
    /// Empty lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat `client` at the end of the list. Joining twice keeps the first
    /// seat.
    pub fn join(&mut self, client: ClientId) -> usize {
        if let Some(&seat) = self.seats.get(&client) {
            return seat;
        }
        let seat = self.players.len();
        self.players.push(Player::default());
        self.seats.insert(client, seat);
        seat
    }

    /// Remove `client`. The last seated player moves into the freed seat.
    pub fn leave(&mut self, client: ClientId) -> Option<Player> {
        let seat = self.seats.remove(&client)?;
        let last = self.players.len() - 1;
        let player = self.players.swap_remove(seat);

        if seat != last
            && let Some(moved) = self.seats.values_mut().find(|s| **s == last)
        {
            *moved = seat;
        }
        Some(player)
    }

    /// Seat of `client`.
    pub fn seat(&self, client: ClientId) -> Option<usize> {
        self.seats.get(&client).copied()
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Seated clients in ascending identifier order.
    pub fn clients(&self) -> Vec<ClientId> {
        let mut clients: Vec<ClientId> = self.seats.keys().copied().collect();
        clients.sort_unstable();
        clients
    }

    /// Store a new name for `client`, returning its seat.
    pub fn rename(&mut self, client: ClientId, name: &str) -> Option<usize> {
        let seat = self.seat(client)?;
        name.clone_into(&mut self.players[seat].name);
        Some(seat)
    }

    /// Flip `client`'s ready flag, returning the new value.
    pub fn toggle_ready(&mut self, client: ClientId) -> Option<bool> {
        let seat = self.seat(client)?;
        let player = &mut self.players[seat];
        player.ready = !player.ready;
        Some(player.ready)
    }

    /// Number of players that pressed "Ready".
    pub fn ready_count(&self) -> usize {
        self.players.iter().filter(|p| p.ready).count()
    }
}
