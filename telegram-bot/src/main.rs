//! Binary: reads `.env` from the working directory, validates it, and runs the bot until SIGINT/SIGTERM.

use anyhow::Result;
use telegram_bot::{run_bot, EnvConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EnvConfig::load(".env")?.validate_with_defaults()?;
    run_bot(config).await
}
