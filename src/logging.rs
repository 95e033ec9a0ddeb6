use std::{env, io, path::PathBuf};

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt::time::LocalTime, layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

const DEFAULT_DIRECTIVES: &str = "ranobes_provider=debug,ranobes_meta=debug";

/// Log to stderr, and to a daily rotated file in `RANOBES_LOG_DIR` when set.
/// `RANOBES_LOG` overrides the filter for both.
pub fn init_logging() -> Result<()> {
    let log_dir = env::var("RANOBES_LOG_DIR")
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stderr);

    let file_layer = log_dir
        .as_ref()
        .map(|log_dir| {
            Result::<_, anyhow::Error>::Ok(
                tracing_subscriber::fmt::layer().pretty().with_writer(
                    RollingFileAppender::builder()
                        .rotation(Rotation::DAILY)
                        .filename_prefix("ranobes")
                        .filename_suffix("log")
                        .build(log_dir)?,
                ),
            )
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(
            stderr_layer
                .with_timer(LocalTime::rfc_3339())
                .with_filter(env_filter()),
        )
        .with(file_layer.map(|file_layer| {
            file_layer
                .with_timer(LocalTime::rfc_3339())
                .with_ansi(false)
                .with_filter(env_filter())
        }))
        .try_init()?;
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_env_var("RANOBES_LOG")
        .try_from_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
