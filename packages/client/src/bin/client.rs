//! Terminal chat client for a single CipherTalk room.
//!
//! Connects to the room's WebSocket endpoint, shows messages, presence and
//! typing indicators, and sends whatever is typed at the prompt.
//! Reconnects automatically with a fixed interval, without limit.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ciphertalk-client -- --room general --user-id 1 --username alice
//! cargo run --bin ciphertalk-client -- --room alice-bob --room-type private \
//!     --user-id 2 --username bob --participant 1=alice
//! ```

use std::time::Duration;

use clap::{Parser, ValueEnum};

use ciphertalk_client::{
    ClientConfig, ClientError, domain::RoomKind, domain::UserIdentity,
    infrastructure::transport::split_origin, run_client,
};
use ciphertalk_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "ciphertalk-client")]
#[command(about = "Real-time chat client with presence, typing indicators and read receipts", long_about = None)]
struct Args {
    /// Chat server origin, e.g. `127.0.0.1:8000` or `https://chat.example.com`
    #[arg(long, default_value = "127.0.0.1:8000")]
    host: String,

    /// Use `wss` even if the origin has no `https://` scheme
    #[arg(long)]
    secure: bool,

    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    #[arg(long, value_enum, default_value_t = RoomType::Group)]
    room_type: RoomType,

    /// Server-assigned id of the local user
    #[arg(short = 'i', long)]
    user_id: String,

    /// Display name of the local user
    #[arg(short = 'u', long)]
    username: String,

    /// Known room member as `ID=NAME` (repeatable)
    #[arg(short = 'p', long = "participant")]
    participants: Vec<String>,

    #[arg(long, default_value_t = 3)]
    reconnect_delay_secs: u64,

    /// Seconds without a keystroke before typing stops
    #[arg(long, default_value_t = 3)]
    typing_idle_secs: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoomType {
    Private,
    Group,
}

impl Args {
    fn into_config(self) -> Result<ClientConfig, ClientError> {
        let (host, secure_origin) = split_origin(&self.host);
        let room_kind = match self.room_type {
            RoomType::Private => RoomKind::Private,
            RoomType::Group => RoomKind::Group,
        };
        let participants = self
            .participants
            .iter()
            .map(|raw| UserIdentity::parse_participant(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let config = ClientConfig::new(host, &self.room, room_kind, &self.user_id, &self.username)?
            .with_secure(self.secure || secure_origin)
            .with_participants(participants)
            .with_reconnect_delay(Duration::from_secs(self.reconnect_delay_secs))
            .with_typing_idle(Duration::from_secs(self.typing_idle_secs));
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME")], "info");

    let args = Args::parse();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
