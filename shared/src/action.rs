//! Player-intent commands carried over the wire.

use crate::sector::Coordinate;
use serde::{Deserialize, Serialize};

/// One player intent. Carries no game logic; the server alone validates
/// and applies it against the authoritative state, so a client can build
/// any action it likes without gaining anything by it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move the acting player to the given sector.
    Move { to: Coordinate },
    /// Alien only: strike every other player on the alien's sector.
    Attack,
    /// Human only: extend this turn's move to two hops.
    UseAdrenaline,
    /// Finish the current turn.
    EndTurn,
}

impl Action {
    /// Stable identifier for logging and dispatch tables.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::Attack => "attack",
            Action::UseAdrenaline => "use-adrenaline",
            Action::EndTurn => "end-turn",
        }
    }
}
