//! Player identification and per-player data storage.
//!
//! ## Player
//!
//! The game is strictly two-sided: `Light` and `Dark`.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `Player`, used for hands, rivers,
//! pass counters and every other per-side value in the state.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One side of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Light,
    Dark,
}

impl Player {
    /// Both players, Light first.
    pub const BOTH: [Player; 2] = [Player::Light, Player::Dark];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::Light => Player::Dark,
            Player::Dark => Player::Light,
        }
    }

    /// Slot index (Light = 0, Dark = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::Light => 0,
            Player::Dark => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Light => write!(f, "Light"),
            Player::Dark => write!(f, "Dark"),
        }
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use riverstone::core::{Player, PlayerMap};
///
/// let mut hand: PlayerMap<u8> = PlayerMap::with_value(12);
/// hand[Player::Dark] -= 1;
///
/// assert_eq!(hand[Player::Light], 12);
/// assert_eq!(hand[Player::Dark], 11);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(Player) -> T) -> Self {
        Self {
            data: [factory(Player::Light), factory(Player::Dark)],
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (Player, &T) pairs, Light first.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::BOTH.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}
