//! Wire protocol between clients and the authoritative server. Every
//! message is a single bincode-encoded [`Packet`] per datagram; requests
//! and responses share one enum so both sides speak from the same table.

use crate::action::Action;
use crate::sector::Coordinate;
use crate::PlayerRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a server-side game instance.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Waiting,
    InProgress,
    Ended,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Waiting => write!(f, "waiting"),
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Ended => write!(f, "ended"),
        }
    }
}

/// One row of the public game list. Produced fresh by the server on every
/// poll; clients read it and throw it away, they never mutate it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GamePublicData {
    pub id: u32,
    pub name: String,
    pub status: GameStatus,
    pub players_count: u32,
}

/// What one player may see of a running game: their own state plus public
/// facts. Other players' positions stay hidden; that is the game.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub player_id: u32,
    pub role: PlayerRole,
    pub position: Coordinate,
    pub alive: bool,
    pub escaped: bool,
    pub status: GameStatus,
    pub turn_number: u32,
    pub current_player: Option<u32>,
}

/// Requests clients send and responses the server returns.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    // Client -> server
    ListGames,
    CreateGame {
        map: String,
    },
    JoinGame {
        game_id: u32,
    },
    StartGame {
        game_id: u32,
    },
    SubmitAction {
        game_id: u32,
        player_id: u32,
        action: Action,
    },
    GetState {
        game_id: u32,
        player_id: u32,
    },

    // Server -> client
    Games {
        rows: Vec<GamePublicData>,
    },
    GameCreated {
        row: GamePublicData,
    },
    Joined {
        game_id: u32,
        player_id: u32,
    },
    Started,
    ActionResult {
        accepted: bool,
        reason: Option<String>,
    },
    State {
        view: PlayerView,
    },
    Error {
        reason: String,
    },
}
