//! Interactive session loop.
//!
//! Each line is classified and either run through the shell or sent to the
//! explainer together with recent output. After a command whose output
//! looks like an error, the user is offered an explanation. Collaborator
//! failures are rendered and the loop carries on; only `exit`, `quit` or
//! end of input stop it.

use tracing::debug;

use crate::buffer::OutputBuffer;
use crate::classify::{question_payload, Classifier, Verdict};
use crate::config::SessionConfig;
use crate::detect::ErrorDetector;
use crate::exec::Executor;
use crate::output::{format_response, Console};
use crate::providers::Explainer;

/// Prompt sent when the user asks for an explanation of failed output.
pub const EXPLAIN_ERROR_PROMPT: &str = "Explain and suggest a fix for this error:";

const EXPLAIN_QUESTION: &str = "Error detected. Explain this error?";

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// True for the exit tokens `exit` and `quit`, ignoring case and padding.
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

/// One interactive session. Owns the rolling output buffer.
pub struct Session<E, X, C> {
    classifier: Classifier,
    detector: ErrorDetector,
    buffer: OutputBuffer,
    executor: E,
    explainer: X,
    console: C,
    context_lines: usize,
    auto_explain: bool,
}

impl<E, X, C> Session<E, X, C>
where
    E: Executor,
    X: Explainer,
    C: Console,
{
    pub fn new(
        classifier: Classifier,
        executor: E,
        explainer: X,
        console: C,
        config: &SessionConfig,
    ) -> Self {
        Self {
            classifier,
            detector: ErrorDetector::default(),
            buffer: OutputBuffer::with_capacity(config.buffer_lines),
            executor,
            explainer,
            console,
            context_lines: config.context_lines,
            auto_explain: config.auto_explain,
        }
    }

    pub fn with_detector(mut self, detector: ErrorDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn buffer(&self) -> &OutputBuffer {
        &self.buffer
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn explainer(&self) -> &X {
        &self.explainer
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Show the banner, then handle lines until exit or end of input.
    pub async fn run(&mut self) {
        self.console.banner();
        if !self.explainer.is_available() {
            let message = format!(
                "Set your {} environment variable to enable AI features.",
                self.explainer.api_key_env_var()
            );
            self.console.warn(&message);
        }

        while let Some(line) = self.console.read_line() {
            if self.handle_line(&line).await == Flow::Exit {
                break;
            }
        }
        debug!("session ended");
    }

    /// Process a single line of input.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if is_exit_command(line) {
            return Flow::Exit;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Flow::Continue;
        }

        let verdict = self.classifier.classify(line);
        debug!(%verdict, input = trimmed, "classified input");

        match verdict {
            Verdict::Question => {
                let question = question_payload(line).to_string();
                self.ask(&question).await;
            }
            Verdict::Command => self.execute(trimmed).await,
        }
        Flow::Continue
    }

    async fn execute(&mut self, command: &str) {
        let result = self.executor.run(command).await;
        debug!(exit_code = result.exit_code, "command finished");

        // Spawn failures are shown but never become context.
        if result.started {
            self.buffer.append(&result.output);
        }
        self.console.show_command_output(&result);

        let Some(pattern) = self.detector.first_match(&result.output) else {
            return;
        };
        debug!(pattern, "error pattern matched in command output");

        if self.auto_explain || self.console.confirm(EXPLAIN_QUESTION, true) {
            self.ask(EXPLAIN_ERROR_PROMPT).await;
        }
    }

    async fn ask(&mut self, prompt: &str) {
        let context = self.buffer.recent(self.context_lines);
        match self.explainer.explain(prompt, &context).await {
            Ok(explanation) => {
                debug!(model = %explanation.model, "explanation received");
                self.console
                    .show_answer(&format_response(&explanation.raw_response));
            }
            Err(e) => {
                debug!(provider = self.explainer.name(), error = %e, "explanation request failed");
                self.console.show_failure(&e);
            }
        }
    }
}
