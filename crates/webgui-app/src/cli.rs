use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use webgui_config::DeliveryMode;

/// webgui: drive an HTML chart page from a native host.
#[derive(Parser, Debug)]
#[command(name = "webgui", version, about)]
pub struct Args {
    /// HTML page to load (defaults to the configured content index).
    pub content: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// How page events reach the host.
    #[arg(long, value_enum)]
    pub delivery: Option<DeliveryArg>,

    /// Run without a window, against a recording view.
    #[arg(long)]
    pub headless: bool,

    /// Exit after handling this many page events.
    #[arg(long)]
    pub max_messages: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeliveryArg {
    Polling,
    Listener,
}

impl From<DeliveryArg> for DeliveryMode {
    fn from(arg: DeliveryArg) -> Self {
        match arg {
            DeliveryArg::Polling => DeliveryMode::Polling,
            DeliveryArg::Listener => DeliveryMode::Listener,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
