mod app;
mod cli;
mod headless;

use std::path::Path;

use tracing_subscriber::EnvFilter;
use weave_common::{ConfigError, Result, WeaveError};
use weave_config::schema::WeaveConfig;
use weave_core::{Webview, WebviewConfig};

fn load_settings(path: Option<&Path>) -> std::result::Result<WeaveConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = weave_config::load_from_path(path)?;
            weave_config::validation::validate(&config)?;
            Ok(config)
        }
        None => weave_config::load_config(),
    }
}

fn run(args: &cli::Args, settings: &WeaveConfig) -> Result<()> {
    let mut config = WebviewConfig::from_settings(settings);
    if let Some(title) = &args.title {
        config = config.with_title(title);
    }
    let content = app::Content::from_args(args, settings.navigation.start_url.as_deref())?;

    if args.headless {
        let (mut webview, page) = Webview::headless(config)?;
        app::install(&mut webview)?;
        app::log_events(&mut webview);
        content.load(&mut webview)?;

        let driver = headless::spawn(page, webview.handle());
        webview.show()?;
        let report = driver
            .join()
            .map_err(|_| WeaveError::InvalidState("headless driver panicked".into()))?;
        for line in report {
            println!("{line}");
        }
        return Ok(());
    }

    let mut webview = Webview::new(config)?;
    app::install(&mut webview)?;
    app::log_events(&mut webview);
    content.load(&mut webview)?;

    tracing::info!("Entering event loop");
    webview.show()
}

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Config is read before logging so its level applies; failures are
    // reported once the subscriber is up.
    let loaded = load_settings(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level)
        .unwrap_or_default();

    // Initialize logging
    let directive = args
        .log_level
        .as_deref()
        .map(|level| format!("weave={level}"))
        .unwrap_or_else(|| level.directive());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive)),
        )
        .init();

    tracing::info!("weave v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let settings = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        WeaveConfig::default()
    });
    tracing::debug!(
        schema = weave_config::CONFIG_SCHEMA_VERSION,
        "Effective config: {}",
        weave_config::config_to_json(&settings)
    );

    if args.print_config {
        println!("{}", weave_config::config_to_json(&settings));
        return;
    }

    if let Err(e) = run(&args, &settings) {
        tracing::error!("weave failed: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}
