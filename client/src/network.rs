//! Request/response client for the remote game service.
//!
//! Each call sends one bincode-encoded [`Packet`] and waits for the
//! matching response, with a bounded timeout so a hung server cannot
//! starve the caller's schedule. Rejections travel back as typed errors
//! carrying the server's reason.

use bincode::{deserialize, serialize};
use shared::action::Action;
use shared::protocol::{GamePublicData, Packet, PlayerView};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// How long to wait for a response before giving the request up.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Large enough for a full game-list response.
const RECV_BUFFER: usize = 8192;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server address: {0}")]
    BadAddress(#[from] std::net::AddrParseError),
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("server did not answer in time")]
    Timeout,
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("unexpected response from server")]
    UnexpectedResponse,
}

/// Handle on one remote server. Cheap to share behind an [`std::sync::Arc`].
pub struct RemoteGameClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
}

impl RemoteGameClient {
    pub async fn connect(server_addr: &str) -> Result<Self, ClientError> {
        let server_addr = server_addr.parse()?;
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        Ok(Self {
            socket,
            server_addr,
        })
    }

    async fn request(&self, request: &Packet) -> Result<Packet, ClientError> {
        let data = serialize(request)?;
        self.socket.send_to(&data, self.server_addr).await?;

        let mut buffer = [0u8; RECV_BUFFER];
        let (len, _) = timeout(REQUEST_TIMEOUT, self.socket.recv_from(&mut buffer))
            .await
            .map_err(|_| ClientError::Timeout)??;
        Ok(deserialize(&buffer[..len])?)
    }

    /// Snapshot of every game the server knows about.
    pub async fn list_games(&self) -> Result<Vec<GamePublicData>, ClientError> {
        match self.request(&Packet::ListGames).await? {
            Packet::Games { rows } => Ok(rows),
            Packet::Error { reason } => Err(ClientError::Rejected(reason)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn create_game(&self, map: &str) -> Result<GamePublicData, ClientError> {
        let request = Packet::CreateGame {
            map: map.to_string(),
        };
        match self.request(&request).await? {
            Packet::GameCreated { row } => Ok(row),
            Packet::Error { reason } => Err(ClientError::Rejected(reason)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Joins a waiting game; the returned id names this player from then on.
    pub async fn join_game(&self, game_id: u32) -> Result<u32, ClientError> {
        match self.request(&Packet::JoinGame { game_id }).await? {
            Packet::Joined { player_id, .. } => Ok(player_id),
            Packet::Error { reason } => Err(ClientError::Rejected(reason)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn start_game(&self, game_id: u32) -> Result<(), ClientError> {
        match self.request(&Packet::StartGame { game_id }).await? {
            Packet::Started => Ok(()),
            Packet::Error { reason } => Err(ClientError::Rejected(reason)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Submits one action. `Ok` means the server accepted and applied it;
    /// a rejection carries the server's reason.
    pub async fn submit_action(
        &self,
        game_id: u32,
        player_id: u32,
        action: Action,
    ) -> Result<(), ClientError> {
        let request = Packet::SubmitAction {
            game_id,
            player_id,
            action,
        };
        match self.request(&request).await? {
            Packet::ActionResult { accepted: true, .. } => Ok(()),
            Packet::ActionResult {
                accepted: false,
                reason,
            } => Err(ClientError::Rejected(
                reason.unwrap_or_else(|| "unspecified".to_string()),
            )),
            Packet::Error { reason } => Err(ClientError::Rejected(reason)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// This player's visible slice of the game.
    pub async fn get_state(&self, game_id: u32, player_id: u32) -> Result<PlayerView, ClientError> {
        match self.request(&Packet::GetState { game_id, player_id }).await? {
            Packet::State { view } => Ok(view),
            Packet::Error { reason } => Err(ClientError::Rejected(reason)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}
