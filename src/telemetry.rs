//! Console logging setup

use anyhow::Result;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

/// Install a stderr fmt subscriber; `RUST_LOG` takes precedence over `level`
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
