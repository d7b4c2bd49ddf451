//! Common vocabulary for the darksector server and client: sector and map
//! primitives, the movement-legality engine, the action command model and
//! the wire protocol. Both binaries depend on this crate so that the rules
//! the server enforces and the messages the client builds can never drift
//! apart.

pub mod action;
pub mod map;
pub mod protocol;
pub mod sector;

use serde::{Deserialize, Serialize};

/// Sectors a human crosses in one move. The legality engine never reads
/// this for humans; it is the documented base speed.
pub const HUMAN_SPEED: u32 = 1;
/// Alien movement speed before feeding.
pub const ALIEN_BASE_SPEED: u32 = 2;
/// Alien movement speed after feeding on a human; enables three-hop reach.
pub const ALIEN_FED_SPEED: u32 = 3;
/// Players needed before a game may start.
pub const MIN_PLAYERS: usize = 2;
/// Players a single game accepts at most.
pub const MAX_PLAYERS: usize = 8;

/// Which side a player is on. Decides movement rules and what the player
/// is allowed to see.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerRole {
    Human,
    Alien,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [PlayerRole::Human, PlayerRole::Alien] {
            let bytes = bincode::serialize(&role).unwrap();
            let back: PlayerRole = bincode::deserialize(&bytes).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_speed_constants() {
        assert!(ALIEN_BASE_SPEED > HUMAN_SPEED);
        assert!(ALIEN_FED_SPEED > ALIEN_BASE_SPEED);
        // The three-hop branch opens strictly above speed 2.
        assert!(ALIEN_FED_SPEED > 2);
        assert!(MIN_PLAYERS >= 2);
        assert!(MAX_PLAYERS >= MIN_PLAYERS);
    }
}
