//! Colonies client: fleet prediction, combat and state reconciliation against the game server.

mod client;
mod config;
mod demo;
mod ws;

use anyhow::Result;

use config::GameConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    log::info!(
        "Starting colonies client ({} mode, {} fps)",
        if config.offline { "offline" } else { "online" },
        config.frame_rate
    );

    if config.offline {
        demo::run(&config).await
    } else {
        ws::run(&config).await
    }
}
