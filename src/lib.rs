//! termpilot - interactive terminal copilot
//!
//! This library provides the core of the `termpilot` CLI: classifying
//! input as shell command or question, buffering recent command output,
//! spotting error output, and asking a hosted model for explanations.

pub mod buffer;
pub mod classify;
pub mod cli;
pub mod config;
pub mod detect;
pub mod exec;
pub mod logging;
pub mod output;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use buffer::OutputBuffer;
pub use classify::{Classifier, CommandLexicon, Verdict};
pub use cli::Cli;
pub use config::Config;
pub use detect::ErrorDetector;
pub use exec::{CommandOutput, Executor, ShellExecutor};
pub use output::{Console, TerminalConsole};
pub use providers::{ChatProvider, Explainer, Explanation, ProviderError, ProviderKind};
pub use session::{Flow, Session};
