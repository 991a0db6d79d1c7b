//! Identifier types for the simulation.
//!
//! Orders carry a monotonically increasing integer id allocated from a
//! single sequence, so two customers arriving in the same hour can never
//! collide. Game sessions carry a UUID v7 so snapshots from different
//! runs are distinguishable on disk.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single game session.
///
/// Generated once at new-game time and carried through every snapshot of
/// that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    /// Create a new session identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for GameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a customer order.
///
/// Allocated from a strictly increasing counter owned by the order board;
/// never reused within a session. The counter value is part of the
/// snapshot so a restored game continues the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    /// Return the inner sequence number.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_ids_are_unique() {
        let a = GameId::new();
        let b = GameId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn order_id_displays_with_hash() {
        assert_eq!(OrderId(7).to_string(), "#7");
    }

    #[test]
    fn order_ids_order_by_sequence() {
        assert!(OrderId(1) < OrderId(2));
    }
}
