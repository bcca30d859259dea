use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use tracing::debug;

use termpilot::config::{self, Config};
use termpilot::{
    logging, ChatProvider, Classifier, Cli, CommandLexicon, Session, ShellExecutor,
    TerminalConsole,
};

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "termpilot", &mut io::stdout());
}

/// Load the config file, then layer environment and CLI overrides on top.
fn resolve_config(cli: &Cli) -> Config {
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} {:#}\n{} {}",
                "Warning:".yellow().bold(),
                e,
                "Tip:".blue().bold(),
                "using default settings; run `termpilot --print-config` for a template".dimmed()
            );
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Some(kind) = cli.provider {
        config.provider.kind = kind;
    }
    if let Some(ref model) = cli.model {
        config.provider.model = Some(model.clone());
    }
    if cli.auto {
        config.session.auto_explain = true;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    if cli.print_config {
        config::print_default_config();
        return Ok(());
    }

    let config = resolve_config(&cli);
    debug!(
        provider = %config.provider.kind,
        model = config.provider.model(),
        buffer_lines = config.session.buffer_lines,
        context_lines = config.session.context_lines,
        auto_explain = config.session.auto_explain,
        "resolved configuration"
    );

    // Ctrl+C reaches the foreground child command; the session itself ignores it.
    ctrlc::set_handler(|| {}).context("Failed to install Ctrl+C handler")?;

    let provider =
        ChatProvider::from_env(&config.provider).context("Failed to create HTTP client")?;
    let classifier = Classifier::new(CommandLexicon::with_extra(
        &config.classifier.extra_commands,
    ));

    let mut session = Session::new(
        classifier,
        ShellExecutor::default(),
        provider,
        TerminalConsole::stdio(),
        &config.session,
    );
    session.run().await;

    Ok(())
}
