//! Row store behind the lobby display.

use crate::sync::LobbyUpdate;
use shared::protocol::GamePublicData;

/// The rows a lobby table currently shows. The sync agent's timer path
/// replaces the whole set; one-shot refreshes append after the existing
/// rows, so repeated manual refreshes accumulate duplicates.
#[derive(Debug, Default)]
pub struct LobbyTable {
    rows: Vec<GamePublicData>,
}

impl LobbyTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn apply(&mut self, update: LobbyUpdate) {
        match update {
            LobbyUpdate::Replace(rows) => {
                self.rows.clear();
                self.rows.extend(rows);
            }
            LobbyUpdate::Append(rows) => self.rows.extend(rows),
        }
    }

    pub fn rows(&self) -> &[GamePublicData] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
