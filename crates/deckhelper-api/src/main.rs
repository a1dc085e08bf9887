use anyhow::Context;
use deckhelper_api::Server;
use deckhelper_core::ConfigManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigManager::new().context("loading configuration")?;
    let settings = config.into_settings();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=debug", settings.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = Server::from_settings(settings).context("building server")?;
    server.run().await?;
    Ok(())
}
