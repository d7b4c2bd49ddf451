use clap::Parser;
use client::network::RemoteGameClient;
use client::sync::ClientSyncAgent;
use client::table::LobbyTable;
use log::info;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Lobby poll interval in milliseconds
    #[arg(short = 'p', long, default_value = "2000")]
    poll_ms: u64,

    /// Create a game on this map before polling
    #[arg(long)]
    create: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    info!("Connecting to {}", args.server);
    let client = Arc::new(RemoteGameClient::connect(&args.server).await?);

    if let Some(map) = &args.create {
        let row = client.create_game(map).await?;
        info!("Created game {} on map {:?}", row.id, row.name);
    }

    let (agent, mut updates, shutdown) = ClientSyncAgent::new(
        Arc::clone(&client),
        Duration::from_millis(args.poll_ms),
    );
    let agent_task = tokio::spawn(agent.run());

    let mut table = LobbyTable::new();
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else {
                    break;
                };
                table.apply(update);
                info!("lobby: {} game(s)", table.len());
                for row in table.rows() {
                    info!(
                        "  #{} {} [{}] {} player(s)",
                        row.id, row.name, row.status, row.players_count
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping lobby polling");
                let _ = shutdown.send(true);
                break;
            }
        }
    }

    let _ = agent_task.await;
    Ok(())
}
