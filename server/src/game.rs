//! Authoritative per-game rules: joining, role assignment, turn rotation
//! and action application. Every legality decision happens here against
//! the server's own state; nothing a client claims is trusted.

use log::info;
use rand::Rng;
use shared::action::Action;
use shared::map::{GameMap, MapError};
use shared::protocol::{GamePublicData, GameStatus, PlayerView};
use shared::sector::{Coordinate, SectorType};
use shared::{PlayerRole, ALIEN_BASE_SPEED, ALIEN_FED_SPEED, HUMAN_SPEED, MAX_PLAYERS, MIN_PLAYERS};
use std::sync::Arc;
use thiserror::Error;

/// Why the server refused a request. The rendered message travels back to
/// clients as the rejection reason.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no game with id {0}")]
    UnknownGame(u32),
    #[error("no map named {0:?}")]
    UnknownMap(String),
    #[error("map is not playable: {0}")]
    InvalidMap(#[from] MapError),
    #[error("game is full")]
    GameFull,
    #[error("game has already started")]
    AlreadyStarted,
    #[error("game is not running")]
    NotRunning,
    #[error("need at least {min} players to start", min = MIN_PLAYERS)]
    NotEnoughPlayers,
    #[error("no player with id {0} in this game")]
    UnknownPlayer(u32),
    #[error("player {0} is out of the game")]
    OutOfPlay(u32),
    #[error("it is not player {0}'s turn")]
    NotYourTurn(u32),
    #[error("move is not legal")]
    IllegalMove,
    #[error("already moved this turn")]
    AlreadyMoved,
    #[error("must move first")]
    MustMoveFirst,
    #[error("action not available to this role")]
    WrongRole,
    #[error("adrenaline must be used before moving")]
    AdrenalineAfterMove,
    #[error("game is no longer reachable")]
    Closed,
}

/// Server-side record of one player in a game.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: u32,
    pub role: PlayerRole,
    pub position: Coordinate,
    pub alive: bool,
    pub escaped: bool,
    pub adrenaline: bool,
    pub speed: u32,
}

impl PlayerState {
    fn new(id: u32, role: PlayerRole, position: Coordinate) -> Self {
        let speed = match role {
            PlayerRole::Human => HUMAN_SPEED,
            PlayerRole::Alien => ALIEN_BASE_SPEED,
        };
        Self {
            id,
            role,
            position,
            alive: true,
            escaped: false,
            adrenaline: false,
            speed,
        }
    }

    /// Still takes turns: alive and not escaped.
    pub fn in_play(&self) -> bool {
        self.alive && !self.escaped
    }
}

/// One authoritative game. Owned by a single task; see the registry.
pub struct Game {
    id: u32,
    map: Arc<GameMap>,
    status: GameStatus,
    // Join order doubles as turn order once the game starts.
    players: Vec<PlayerState>,
    next_player_id: u32,
    turn_index: usize,
    turn_number: u32,
    moved_this_turn: bool,
}

impl Game {
    pub fn new(id: u32, map: Arc<GameMap>) -> Self {
        Self {
            id,
            map,
            status: GameStatus::Waiting,
            players: Vec::new(),
            next_player_id: 1,
            turn_index: 0,
            turn_number: 0,
            moved_this_turn: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whose turn it is, while the game runs.
    pub fn current_player(&self) -> Option<u32> {
        if self.status != GameStatus::InProgress {
            return None;
        }
        self.players.get(self.turn_index).map(|p| p.id)
    }

    /// Admits a new player while the game is waiting. Roles and positions
    /// stay provisional until start deals them.
    pub fn join(&mut self) -> Result<u32, GameError> {
        if self.status != GameStatus::Waiting {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.push(PlayerState::new(
            id,
            PlayerRole::Human,
            self.map.human_start().coordinate,
        ));
        info!(
            "game {}: player {} joined ({} total)",
            self.id,
            id,
            self.players.len()
        );
        Ok(id)
    }

    /// Deals roles and opens play. Exactly one player becomes the alien,
    /// chosen uniformly at random; everyone spawns on their start sector.
    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.status != GameStatus::Waiting {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        let alien_index = rng.gen_range(0..self.players.len());
        let human_start = self.map.human_start().coordinate;
        let alien_start = self.map.alien_start().coordinate;
        for (index, player) in self.players.iter_mut().enumerate() {
            let role = if index == alien_index {
                PlayerRole::Alien
            } else {
                PlayerRole::Human
            };
            *player = PlayerState::new(
                player.id,
                role,
                if role == PlayerRole::Alien {
                    alien_start
                } else {
                    human_start
                },
            );
        }

        self.status = GameStatus::InProgress;
        self.turn_index = 0;
        self.turn_number = 1;
        self.moved_this_turn = false;
        info!(
            "game {}: started with {} players on {:?}",
            self.id,
            self.players.len(),
            self.map.name()
        );
        Ok(())
    }

    /// Validates and applies one action for one player.
    pub fn apply_action(&mut self, player_id: u32, action: &Action) -> Result<(), GameError> {
        if self.status != GameStatus::InProgress {
            return Err(GameError::NotRunning);
        }
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(GameError::UnknownPlayer(player_id))?;
        if !self.players[index].in_play() {
            return Err(GameError::OutOfPlay(player_id));
        }
        if index != self.turn_index {
            return Err(GameError::NotYourTurn(player_id));
        }

        match action {
            Action::Move { to } => self.apply_move(index, *to),
            Action::Attack => self.apply_attack(index),
            Action::UseAdrenaline => self.apply_adrenaline(index),
            Action::EndTurn => self.apply_end_turn(),
        }
    }

    fn apply_move(&mut self, index: usize, to: Coordinate) -> Result<(), GameError> {
        if self.moved_this_turn {
            return Err(GameError::AlreadyMoved);
        }
        let player = &self.players[index];
        if !self
            .map
            .is_move_legal(player.position, to, player.speed, player.role, player.adrenaline)
        {
            return Err(GameError::IllegalMove);
        }

        self.players[index].position = to;
        self.moved_this_turn = true;
        info!(
            "game {}: player {} moved to {}",
            self.id, self.players[index].id, to
        );

        let escapes = self.players[index].role == PlayerRole::Human
            && self
                .map
                .sector_at(to)
                .map_or(false, |s| s.sector_type == SectorType::OpenRescue);
        if escapes {
            self.players[index].escaped = true;
            info!(
                "game {}: player {} escaped through {}",
                self.id, self.players[index].id, to
            );
            self.check_end();
            if self.status == GameStatus::InProgress {
                self.advance_turn();
            }
        }
        Ok(())
    }

    fn apply_attack(&mut self, index: usize) -> Result<(), GameError> {
        if self.players[index].role != PlayerRole::Alien {
            return Err(GameError::WrongRole);
        }
        if !self.moved_this_turn {
            return Err(GameError::MustMoveFirst);
        }

        let attacker_id = self.players[index].id;
        let here = self.players[index].position;
        let mut kills = 0;
        for player in self.players.iter_mut() {
            if player.id != attacker_id && player.in_play() && player.position == here {
                player.alive = false;
                kills += 1;
                info!("game {}: player {} was killed in {}", self.id, player.id, here);
            }
        }
        if kills > 0 {
            // Feeding accelerates the alien into the three-hop range.
            self.players[index].speed = ALIEN_FED_SPEED;
        }
        info!(
            "game {}: player {} attacked {} ({} kill(s))",
            self.id, attacker_id, here, kills
        );
        self.check_end();
        Ok(())
    }

    fn apply_adrenaline(&mut self, index: usize) -> Result<(), GameError> {
        if self.players[index].role != PlayerRole::Human {
            return Err(GameError::WrongRole);
        }
        if self.moved_this_turn {
            return Err(GameError::AdrenalineAfterMove);
        }
        self.players[index].adrenaline = true;
        info!(
            "game {}: player {} used adrenaline",
            self.id, self.players[index].id
        );
        Ok(())
    }

    fn apply_end_turn(&mut self) -> Result<(), GameError> {
        if !self.moved_this_turn {
            return Err(GameError::MustMoveFirst);
        }
        self.advance_turn();
        Ok(())
    }

    /// Hands the turn to the next player still in play. Move-scoped
    /// modifiers of the leaving player expire here.
    fn advance_turn(&mut self) {
        if let Some(current) = self.players.get_mut(self.turn_index) {
            current.adrenaline = false;
        }
        self.moved_this_turn = false;
        self.turn_number += 1;
        let count = self.players.len();
        for step in 1..=count {
            let candidate = (self.turn_index + step) % count;
            if self.players[candidate].in_play() {
                self.turn_index = candidate;
                return;
            }
        }
        self.status = GameStatus::Ended;
    }

    fn check_end(&mut self) {
        let humans_left = self
            .players
            .iter()
            .any(|p| p.role == PlayerRole::Human && p.in_play());
        if !humans_left {
            self.status = GameStatus::Ended;
            info!("game {}: over after turn {}", self.id, self.turn_number);
        }
    }

    /// Fresh public snapshot row for the game list.
    pub fn public_data(&self) -> GamePublicData {
        GamePublicData {
            id: self.id,
            name: self.map.name().to_string(),
            status: self.status,
            players_count: self.players.len() as u32,
        }
    }

    /// The slice of state `player_id` is allowed to see: their own record
    /// plus public facts. Other players stay hidden.
    pub fn view(&self, player_id: u32) -> Result<PlayerView, GameError> {
        let player = self
            .players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or(GameError::UnknownPlayer(player_id))?;
        Ok(PlayerView {
            player_id: player.id,
            role: player.role,
            position: player.position,
            alive: player.alive,
            escaped: player.escaped,
            status: self.status,
            turn_number: self.turn_number,
            current_player: self.current_player(),
        })
    }
}
