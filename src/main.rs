//! Event Pulse Server - Binary Entry Point

use event_pulse::config::ServerConfig;
use event_pulse::logging::init_logging;
use event_pulse::server;
use event_pulse::types::ServerResult;

#[tokio::main]
async fn main() -> ServerResult<()> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log)?;

    server::run(config).await
}
