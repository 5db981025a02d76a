//! Preview command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use yamlview::{PreviewConfig, run_preview};

pub struct PreviewArgs {
    pub input: PathBuf,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_scroll_sync: bool,
    pub config: Option<PathBuf>,
}

/// CLI flags override values from the config file.
fn resolve_config(args: &PreviewArgs) -> Result<PreviewConfig> {
    let mut config = PreviewConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config")?;
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.no_scroll_sync {
        config.scroll_sync = false;
    }
    Ok(config)
}

pub fn execute(args: PreviewArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(run_preview(&args.input, config))
        .with_context(|| format!("Preview of {:?} failed", args.input))?;

    Ok(())
}
