use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use design_tokens_build::{run, BuildConfig};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "design-tokens")]
#[command(version, about = "Compile design tokens into per-namespace CSS and TypeScript files")]
struct Cli {
    /// Build configuration (defaults to ./design-tokens.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Main token document
    #[arg(long, value_name = "FILE")]
    source: Option<PathBuf>,

    /// Text token document merged into every namespace
    #[arg(long, value_name = "FILE")]
    text_source: Option<PathBuf>,

    /// Directory receiving one sub-directory per namespace
    #[arg(long, value_name = "DIR")]
    target_dir: Option<PathBuf>,

    /// Root font size in px, one rem
    #[arg(long)]
    base_font_size: Option<f64>,

    /// Screen width in px spanned by 750rpx
    #[arg(long)]
    base_screen_width: Option<f64>,
}
impl Cli {
    fn config(self) -> anyhow::Result<BuildConfig> {
        let mut config = BuildConfig::load_or_default(self.config.as_deref())
            .context("loading build configuration")?;
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(text_source) = self.text_source {
            config.text_source = text_source;
        }
        if let Some(target_dir) = self.target_dir {
            config.target_dir = target_dir;
        }
        if let Some(size) = self.base_font_size {
            config.units.base_font_size = size;
        }
        if let Some(width) = self.base_screen_width {
            config.units.base_screen_width = width;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Cli::parse().config() {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let report = run(&config).await;
    if report.is_success() {
        info!(namespaces = report.built.len(), "build finished");
        ExitCode::SUCCESS
    } else {
        error!(
            failed = report.failures.len(),
            built = report.built.len(),
            "build failed"
        );
        ExitCode::FAILURE
    }
}
