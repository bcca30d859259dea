//! Command-line interface definitions for `termpilot`.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::providers::ProviderKind;

/// Interactive terminal copilot: run commands, ask questions, explain errors
#[derive(Parser, Debug)]
#[command(
    name = "termpilot",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TERMPILOT_GIT_SHA"), ")"),
    about,
    long_about = None
)]
#[command(
    after_help = "INSIDE THE SESSION:\n    ls -la                      run a shell command\n    ? what does chmod 755 do    ask the AI\n    ai explain the last error   ask the AI\n    why did that fail?          questions ending in '?' go to the AI\n    exit                        leave"
)]
pub struct Cli {
    /// AI provider to use
    #[arg(long, short = 'p', value_enum, value_name = "PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Model identifier (defaults to the provider's default model)
    #[arg(long, short = 'm', value_name = "MODEL")]
    pub model: Option<String>,

    /// Explain detected errors without asking first
    #[arg(long)]
    pub auto: bool,

    /// Show debug logs (classification, requests, matched error patterns)
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Path to config file (default: ~/.config/termpilot/config.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output default configuration to stdout
    #[arg(long)]
    pub print_config: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}
