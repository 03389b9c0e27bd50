//! CodeSync terminal participant.
//!
//! Joins a room, keeps a local copy of the shared document and publishes every
//! line typed at the prompt. Automatically reconnects on disconnection (max 5
//! attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin codesync-client -- --username alice
//! cargo run --bin codesync-client -- -n bob --room 3f0c... --file main.py
//! ```

use std::path::PathBuf;

use clap::Parser;
use codesync_client::{ClientOptions, run_client};
use codesync_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "codesync-client")]
#[command(about = "Terminal participant for CodeSync collaborative editing rooms", long_about = None)]
struct Args {
    /// Display name shown to the other participants
    #[arg(short = 'n', long)]
    username: String,

    /// Room to join (a new room id is generated when omitted)
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "CODESYNC_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// File published as the document when joining an empty room
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let room_id = match args.room {
        Some(room_id) => room_id,
        None => {
            let room_id = uuid::Uuid::new_v4().to_string();
            println!("Created room {room_id}. Others can join with: --room {room_id}");
            room_id
        }
    };

    let initial_document = match args.file {
        Some(path) => match tokio::fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::error!("Failed to read {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let options = ClientOptions {
        url: args.url,
        room_id,
        username: args.username,
        initial_document,
    };

    // Run the client
    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Giving up: {}", e);
        std::process::exit(1);
    }
}
