use anyhow::Result;
use auto_translation::catalog::ReconcilePolicy;
use auto_translation::config::Config;
use auto_translation::sync::{run_sync, SyncOptions, SyncReport};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Keep only keys still used in the scanned sources
    ReplaceUnused,
    /// Keep existing keys and add new ones
    Additive,
}

impl From<Mode> for ReconcilePolicy {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ReplaceUnused => ReconcilePolicy::ReplaceUnused,
            Mode::Additive => ReconcilePolicy::Additive,
        }
    }
}

/// Scan views for translatable strings, write the source locale JSON file and
/// translate missing keys into every target locale.
#[derive(Debug, Parser)]
#[command(name = "auto-translation", version, about)]
struct Cli {
    /// Directory to scan instead of the configured ones (repeatable)
    #[arg(long = "path", value_name = "DIR")]
    paths: Vec<PathBuf>,

    /// File extension to scan, e.g. .blade.php (repeatable or comma-separated)
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    extensions: Vec<String>,

    /// How extracted keys are merged into the source locale file
    #[arg(long, value_enum, default_value_t = Mode::ReplaceUnused)]
    mode: Mode,

    /// Shorthand for --mode additive
    #[arg(long, conflicts_with = "mode")]
    add: bool,

    /// Target locale instead of the configured ones (repeatable or comma-separated)
    #[arg(long = "locale", value_name = "CODE", value_delimiter = ',')]
    locales: Vec<String>,

    /// Re-translate every key even when the target file already has it
    #[arg(long)]
    force: bool,
}

impl Cli {
    fn into_options(self) -> SyncOptions {
        let policy = if self.add {
            ReconcilePolicy::Additive
        } else {
            self.mode.into()
        };

        SyncOptions {
            scan_paths: (!self.paths.is_empty()).then_some(self.paths),
            extensions: (!self.extensions.is_empty()).then_some(self.extensions),
            policy,
            target_locales: (!self.locales.is_empty()).then_some(self.locales),
            force: self.force,
        }
    }
}

fn log_summary(report: &SyncReport) {
    info!(
        "{}: {} keys in {}",
        report.source_locale,
        report.source_keys,
        report.source_path.display()
    );

    for locale in &report.locales {
        info!(
            "{}: {} keys, {} missing, {} translated{}",
            locale.locale,
            locale.total_keys,
            locale.missing,
            locale.translated,
            if locale.written { "" } else { " (not written)" }
        );
    }

    if report.metrics.api_calls > 0 {
        info!(
            "DeepL: {} calls, {} failed ({:.0}% success)",
            report.metrics.api_calls, report.metrics.api_failures, report.metrics.api_success_rate
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auto_translation=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let report = run_sync(&config, &cli.into_options()).await?;
    log_summary(&report);

    Ok(())
}
