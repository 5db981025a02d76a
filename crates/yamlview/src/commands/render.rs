//! Render command implementation

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};
use yamlview::{PreviewConfig, RenderOutcome, render_file};

pub struct RenderArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub no_scroll_sync: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let mut config = PreviewConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config")?;
    if args.no_scroll_sync {
        config.scroll_sync = false;
    }

    let (page, outcome) = render_file(&args.input, &config)
        .with_context(|| format!("Failed to render {:?}", args.input))?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
            }
            fs::write(path, &page.html)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!(output = %path.display(), "Wrote preview page");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(page.html.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }

    // The error page was still written; the exit status reports the failure.
    if let RenderOutcome::ParseFailed(message) = outcome {
        error!(input = %args.input.display(), "{}", message);
        std::process::exit(1);
    }

    Ok(())
}
