//! MCP server binary entry point for the collection store.

use band_keeper::mcp::config::Config;
use band_keeper::mcp::server::BandKeeperServer;

use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env().map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;
    config.init_logging();

    start(config).await
}

/// Start the MCP server with stdio transport.
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server = BandKeeperServer::new(config);

    let service = server.serve(stdio()).await.inspect_err(|e| {
        eprintln!("Error starting server: {}", e);
    })?;
    service.waiting().await?;

    Ok(())
}
