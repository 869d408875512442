use anyhow::anyhow;
use feedline::shared::{logging, metrics, AppConfig};
use feedline::SERVICE_NAME;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(|err| anyhow!("invalid configuration: {err}"))?;

    logging::init(SERVICE_NAME);
    metrics::init(SERVICE_NAME);
    tracing::info!(
        addr = %config.server.addr,
        trending_enabled = config.trending.enabled,
        "starting feedline"
    );

    feedline::run(config).await
}
