pub mod bot;
pub mod completion;
pub mod config;
pub mod error;
pub mod groupme;
pub mod types;

use log::{debug, info};

use bot::{Bot, run_poll_loop};
use config::{CONFIG_FILE, Config};
use error::Result;

/// Run the bot until a fatal error or Ctrl-C.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_file(CONFIG_FILE)?;

    debug!("Initializing GroupMe and completion clients");
    let bot = Bot::new(config);

    tokio::select! {
        result = run_poll_loop(&bot) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}
