mod cli;
mod driver;
mod run;

use std::process::ExitCode;
use std::thread;

use tracing_subscriber::EnvFilter;
use webgui_common::QuitFlag;
use webgui_config::WebGuiConfig;

use crate::run::RunSettings;

/// Raise `quit` on Ctrl+C. The handler runs on its own single-threaded
/// runtime so the GUI and control threads stay free of async.
fn install_ctrl_c(quit: QuitFlag) {
    let spawned = thread::Builder::new()
        .name("webgui-signal".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!("Ctrl+C handler unavailable: {e}");
                    return;
                }
            };
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("interrupt received, shutting down");
                        quit.request();
                    }
                    Err(e) => tracing::warn!("failed to listen for Ctrl+C: {e}"),
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!("failed to spawn signal thread: {e}");
    }
}

fn load_config(args: &cli::Args) -> (WebGuiConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => webgui_config::toml_loader::load_from_path(path),
        None => webgui_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (WebGuiConfig::default(), Some(e.to_string())),
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config picks the default log level, so it loads before the subscriber.
    let (mut config, config_error) = load_config(&args);

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("webgui={}", config.logging.level.as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "webgui=info".parse().expect("static directive")),
            ),
        )
        .init();

    tracing::info!("webgui v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    if let Some(delivery) = args.delivery {
        config.bridge.delivery = delivery.into();
    }

    let settings = RunSettings {
        content: args
            .content
            .clone()
            .unwrap_or_else(|| config.content.index.clone().into()),
        config,
        headless: args.headless,
        max_messages: args.max_messages,
    };
    tracing::info!(
        content = %settings.content.display(),
        delivery = ?settings.config.bridge.delivery,
        headless = settings.headless,
        "configuration resolved"
    );

    let quit = QuitFlag::new();
    install_ctrl_c(quit.clone());

    match run::run(&settings, &quit) {
        Ok(summary) => {
            tracing::info!(selected = ?summary.selected, "shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
