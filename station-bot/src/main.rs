use station_bot::bot::{Handlers, reconcile, run_polling};
use station_bot::config::{Config, StorageConfig};
use station_bot::directory::{WikiClient, WikiClientConfig, imported_stations};
use station_bot::storage::{AnyStorage, FileStorage, MemoryStorage, RedisStorage};
use station_bot::telegram::{TelegramClient, TelegramConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,station_bot=debug")),
        )
        .init();

    let config = Config::from_env()?;
    info!(version = %config.app_version, "starting station bot");

    let storage = match &config.storage {
        StorageConfig::Memory => AnyStorage::Memory(MemoryStorage::default()),
        StorageConfig::File(path) => AnyStorage::File(FileStorage::new(path)),
        StorageConfig::Redis(redis) => AnyStorage::Redis(RedisStorage::connect(redis).await?),
    };

    let directory = WikiClient::new(WikiClientConfig::new(&config.wiki_url))?;
    let state = reconcile(&storage, &directory, &imported_stations()?).await?;
    info!(
        stations = state.stations().len(),
        visited = state.done_dates().len(),
        "loaded progress"
    );

    let telegram = TelegramClient::new(
        TelegramConfig::new(&config.telegram_token).with_poll_timeout(config.poll_timeout_secs),
    )?;
    run_polling(&telegram, &Handlers::new(storage)).await?;

    info!("stopped");
    Ok(())
}
