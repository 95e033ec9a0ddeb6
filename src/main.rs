use std::{env, path::PathBuf, process, sync::Arc};

use anyhow::{Context as _, Result};
use ranobes_meta::Ranobes;
use tracing::{error, info, warn};

use ranobes_provider::{
    config::Config,
    logging::init_logging,
    web::{AppState, start_webserver},
};

#[tokio::main]
async fn main() {
    if let Err(err) = app_main().await {
        error!("AppError: {err:?}");
        eprintln!("{:?}", err);
        process::exit(1);
    }
}

async fn app_main() -> Result<()> {
    init_logging()?;

    let config_file = env::var("RANOBES_CONFIG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| "config.toml".into());
    let config = Config::load(&config_file)
        .with_context(|| format!("load config from {}", config_file.display()))?;
    info!("config: {config:?}");
    if let Err(err) = config.credentials() {
        warn!("{err}, searches will be rejected until they are set");
    }

    let ranobes = Ranobes::new(&config.base_url, config.request_timeout())
        .context("create ranobes provider")?
        .with_policy(config.failure_policy);
    info!(base_url = %ranobes.base_url(), policy = ?config.failure_policy, "ranobes provider ready");

    start_webserver(AppState {
        config: Arc::new(config),
        provider: Arc::new(ranobes),
    })
    .await
}
