//! Translation of presentation events into wire actions.

use shared::action::Action;
use shared::sector::Coordinate;

/// Opaque user-intent events produced by the presentation layer. This is
/// the whole vocabulary a UI needs to speak to drive a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    /// The player clicked a sector on the map surface.
    SectorClicked(Coordinate),
    /// The player ordered a strike on their current sector.
    AttackHere,
    /// The player played their adrenaline item.
    UseAdrenaline,
    /// The player passed the turn.
    EndTurn,
}

impl UserIntent {
    /// Builds the command this intent stands for. Pure construction: all
    /// validation happens on the server.
    pub fn into_action(self) -> Action {
        match self {
            UserIntent::SectorClicked(to) => Action::Move { to },
            UserIntent::AttackHere => Action::Attack,
            UserIntent::UseAdrenaline => Action::UseAdrenaline,
            UserIntent::EndTurn => Action::EndTurn,
        }
    }
}
