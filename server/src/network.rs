//! UDP request/response front end for the game registry.
//!
//! Every datagram carries one bincode-encoded [`Packet`] request and is
//! answered with one [`Packet`] response to the sender's address. Requests
//! are served on their own tasks, so a slow game never stalls the socket
//! loop or games that have nothing to do with it.

use crate::registry::GameRegistry;
use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::protocol::Packet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Large enough for any single request datagram.
const RECV_BUFFER: usize = 2048;

/// The darksector server: one socket, one registry.
pub struct Server {
    socket: Arc<UdpSocket>,
    registry: Arc<GameRegistry>,
}

impl Server {
    pub async fn new(addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("server listening on {}", socket.local_addr()?);
        Ok(Server {
            socket,
            registry: Arc::new(GameRegistry::new()),
        })
    }

    /// Actual bound address; useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn registry(&self) -> Arc<GameRegistry> {
        Arc::clone(&self.registry)
    }

    /// Receives requests until the task is dropped.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut buffer = [0u8; RECV_BUFFER];
        loop {
            match self.socket.recv_from(&mut buffer).await {
                Ok((len, addr)) => match deserialize::<Packet>(&buffer[..len]) {
                    Ok(request) => {
                        let socket = Arc::clone(&self.socket);
                        let registry = Arc::clone(&self.registry);
                        tokio::spawn(async move {
                            let response = handle_request(&registry, request).await;
                            send_response(&socket, &response, addr).await;
                        });
                    }
                    Err(e) => {
                        // A malformed submit must surface as a rejection,
                        // not vanish.
                        warn!("undecodable datagram from {}: {}", addr, e);
                        let response = Packet::Error {
                            reason: "malformed request".to_string(),
                        };
                        send_response(&self.socket, &response, addr).await;
                    }
                },
                Err(e) => {
                    error!("error receiving datagram: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

/// Maps one request onto the registry and wraps the outcome.
async fn handle_request(registry: &GameRegistry, request: Packet) -> Packet {
    match request {
        Packet::ListGames => Packet::Games {
            rows: registry.list_games().await,
        },
        Packet::CreateGame { map } => match registry.create_game(&map).await {
            Ok(row) => Packet::GameCreated { row },
            Err(e) => Packet::Error {
                reason: e.to_string(),
            },
        },
        Packet::JoinGame { game_id } => match registry.join_game(game_id).await {
            Ok(player_id) => Packet::Joined { game_id, player_id },
            Err(e) => Packet::Error {
                reason: e.to_string(),
            },
        },
        Packet::StartGame { game_id } => match registry.start_game(game_id).await {
            Ok(()) => Packet::Started,
            Err(e) => Packet::Error {
                reason: e.to_string(),
            },
        },
        Packet::SubmitAction {
            game_id,
            player_id,
            action,
        } => match registry.submit_action(game_id, player_id, action).await {
            Ok(()) => Packet::ActionResult {
                accepted: true,
                reason: None,
            },
            Err(e) => Packet::ActionResult {
                accepted: false,
                reason: Some(e.to_string()),
            },
        },
        Packet::GetState { game_id, player_id } => {
            match registry.view(game_id, player_id).await {
                Ok(view) => Packet::State { view },
                Err(e) => Packet::Error {
                    reason: e.to_string(),
                },
            }
        }
        other => {
            warn!("response packet sent as request: {}", packet_name(&other));
            Packet::Error {
                reason: "unexpected request".to_string(),
            }
        }
    }
}

fn packet_name(packet: &Packet) -> &'static str {
    match packet {
        Packet::ListGames => "ListGames",
        Packet::CreateGame { .. } => "CreateGame",
        Packet::JoinGame { .. } => "JoinGame",
        Packet::StartGame { .. } => "StartGame",
        Packet::SubmitAction { .. } => "SubmitAction",
        Packet::GetState { .. } => "GetState",
        Packet::Games { .. } => "Games",
        Packet::GameCreated { .. } => "GameCreated",
        Packet::Joined { .. } => "Joined",
        Packet::Started => "Started",
        Packet::ActionResult { .. } => "ActionResult",
        Packet::State { .. } => "State",
        Packet::Error { .. } => "Error",
    }
}

async fn send_response(socket: &UdpSocket, packet: &Packet, addr: SocketAddr) {
    match serialize(packet) {
        Ok(data) => {
            if let Err(e) = socket.send_to(&data, addr).await {
                error!("failed to send response to {}: {}", addr, e);
            }
        }
        Err(e) => error!("failed to encode response: {}", e),
    }
}
