//! Multi-game registry. Every game runs on its own task and applies the
//! commands it receives strictly in arrival order, so legality checks for
//! one game always observe a consistent state while unrelated games
//! proceed in parallel.

use crate::game::{Game, GameError};
use crate::maps;
use log::info;
use shared::action::Action;
use shared::protocol::{GamePublicData, PlayerView};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Commands routed to a game's task.
pub enum GameCommand {
    Join {
        reply: oneshot::Sender<Result<u32, GameError>>,
    },
    Start {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Submit {
        player_id: u32,
        action: Action,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    View {
        player_id: u32,
        reply: oneshot::Sender<Result<PlayerView, GameError>>,
    },
}

struct GameHandle {
    commands: mpsc::UnboundedSender<GameCommand>,
    // Kept current by the game task after every command, so listing
    // games never waits on game logic.
    public: Arc<RwLock<GamePublicData>>,
}

/// All games this server knows about.
pub struct GameRegistry {
    games: RwLock<HashMap<u32, GameHandle>>,
    next_game_id: AtomicU32,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            next_game_id: AtomicU32::new(1),
        }
    }

    /// Creates a game on the named map and spawns its task.
    pub async fn create_game(&self, map_name: &str) -> Result<GamePublicData, GameError> {
        let map = Arc::new(maps::build(map_name)?);
        let id = self.next_game_id.fetch_add(1, Ordering::Relaxed);
        let game = Game::new(id, map);
        let row = game.public_data();

        let public = Arc::new(RwLock::new(row.clone()));
        let (commands, inbox) = mpsc::unbounded_channel();
        tokio::spawn(run_game(game, inbox, Arc::clone(&public)));

        self.games
            .write()
            .await
            .insert(id, GameHandle { commands, public });
        info!("created game {} on map {:?}", id, map_name);
        Ok(row)
    }

    /// Snapshot of every known game, ordered by id.
    pub async fn list_games(&self) -> Vec<GamePublicData> {
        let games = self.games.read().await;
        let mut rows = Vec::with_capacity(games.len());
        for handle in games.values() {
            rows.push(handle.public.read().await.clone());
        }
        rows.sort_by_key(|row| row.id);
        rows
    }

    pub async fn join_game(&self, game_id: u32) -> Result<u32, GameError> {
        self.send(game_id, |reply| GameCommand::Join { reply }).await
    }

    pub async fn start_game(&self, game_id: u32) -> Result<(), GameError> {
        self.send(game_id, |reply| GameCommand::Start { reply }).await
    }

    pub async fn submit_action(
        &self,
        game_id: u32,
        player_id: u32,
        action: Action,
    ) -> Result<(), GameError> {
        self.send(game_id, move |reply| GameCommand::Submit {
            player_id,
            action,
            reply,
        })
        .await
    }

    pub async fn view(&self, game_id: u32, player_id: u32) -> Result<PlayerView, GameError> {
        self.send(game_id, move |reply| GameCommand::View { player_id, reply })
            .await
    }

    async fn send<T>(
        &self,
        game_id: u32,
        command: impl FnOnce(oneshot::Sender<Result<T, GameError>>) -> GameCommand,
    ) -> Result<T, GameError> {
        let sender = {
            let games = self.games.read().await;
            games
                .get(&game_id)
                .ok_or(GameError::UnknownGame(game_id))?
                .commands
                .clone()
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        sender
            .send(command(reply_tx))
            .map_err(|_| GameError::Closed)?;
        reply_rx.await.map_err(|_| GameError::Closed)?
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns one game for its whole life. Commands apply one at a time; the
/// public row is refreshed after each.
async fn run_game(
    mut game: Game,
    mut inbox: mpsc::UnboundedReceiver<GameCommand>,
    public: Arc<RwLock<GamePublicData>>,
) {
    while let Some(command) = inbox.recv().await {
        match command {
            GameCommand::Join { reply } => {
                let _ = reply.send(game.join());
            }
            GameCommand::Start { reply } => {
                let mut rng = rand::thread_rng();
                let _ = reply.send(game.start(&mut rng));
            }
            GameCommand::Submit {
                player_id,
                action,
                reply,
            } => {
                let _ = reply.send(game.apply_action(player_id, &action));
            }
            GameCommand::View { player_id, reply } => {
                let _ = reply.send(game.view(player_id));
            }
        }
        *public.write().await = game.public_data();
    }
}
