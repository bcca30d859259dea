//! Response post-processing and terminal presentation.

use colored::Colorize;
use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::LazyLock;

use crate::exec::CommandOutput;
use crate::providers::ProviderError;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());
static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[a-zA-Z]*\n?").unwrap());

/// Line starts that mark a line as code when rendering answers.
const CODE_LINE_PREFIXES: &[&str] = &[
    "pip ", "python ", "import ", "print(", "conda ", "# ", "def ", "class ", "for ", "if ",
    "while ",
];

/// Remove `<think>...</think>` reasoning blocks, including the tags.
pub fn strip_think_sections(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}

/// Drop markdown code fences and indent lines that look like code.
pub fn markdown_to_chat(text: &str) -> String {
    let text = FENCE_OPEN.replace_all(text, "");
    let text = text.replace("```", "");

    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if CODE_LINE_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
                format!("    {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Full post-processing applied to every model response.
pub fn format_response(raw: &str) -> String {
    markdown_to_chat(&strip_think_sections(raw))
}

/// Interpret common exit codes
pub fn interpret_exit_code(code: i32) -> &'static str {
    match code {
        0 => "success",
        1 => "general error",
        2 => "misuse of shell command",
        126 => "permission problem or command not executable",
        127 => "command not found",
        130 => "terminated by Ctrl+C (SIGINT)",
        137 => "killed (SIGKILL)",
        139 => "segmentation fault (SIGSEGV)",
        143 => "terminated (SIGTERM)",
        _ if code > 128 && code < 256 => "terminated by signal",
        _ => "unknown",
    }
}

pub fn format_error(message: &str, tip: Option<&str>) -> String {
    let mut output = format!("{} {}", "Error:".red().bold(), message);
    if let Some(tip) = tip {
        output.push('\n');
        output.push_str(&format!("{} {}", "Tip:".blue().bold(), tip));
    }
    output
}

/// Presentation sink used by the session loop.
pub trait Console {
    /// Startup banner
    fn banner(&mut self);

    fn warn(&mut self, message: &str);

    /// Read one line of input; `None` at end of input.
    fn read_line(&mut self) -> Option<String>;

    fn show_command_output(&mut self, result: &CommandOutput);

    /// Show a post-processed model answer
    fn show_answer(&mut self, answer: &str);

    fn show_failure(&mut self, error: &ProviderError);

    /// Ask a yes/no question. Empty input or end of input picks `default`.
    fn confirm(&mut self, question: &str, default: bool) -> bool;
}

/// Colored console over any line reader and writer.
pub struct TerminalConsole<R, W> {
    input: R,
    out: W,
    width: usize,
}

impl TerminalConsole<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Console bound to the process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(
            std::io::stdin().lock(),
            std::io::stdout(),
            textwrap::termwidth().min(100),
        )
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, out: W, width: usize) -> Self {
        Self {
            input,
            out,
            width: width.max(20),
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn prompt(&mut self, text: &str) -> Option<String> {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn banner(&mut self) {
        let _ = writeln!(self.out, "{}", "Terminal AI Copilot".cyan().bold());
        let _ = writeln!(self.out, "  Type a shell command or ask a question.");
        let _ = writeln!(
            self.out,
            "  Prefix with {} or {} to ask the AI. Type {} to quit.",
            "?".green(),
            "ai".green(),
            "exit".green()
        );
        let _ = writeln!(self.out);
    }

    fn warn(&mut self, message: &str) {
        let _ = writeln!(self.out, "{} {}", "⚠".yellow(), message.yellow());
    }

    fn read_line(&mut self) -> Option<String> {
        let prompt = format!("{} ", "$".green().bold());
        self.prompt(&prompt)
    }

    fn show_command_output(&mut self, result: &CommandOutput) {
        let title = format!(
            "Command Output (exit code {}, {})",
            result.exit_code,
            interpret_exit_code(result.exit_code)
        );
        let marker = if result.success() {
            "▸".cyan()
        } else {
            "▸".red()
        };
        let _ = writeln!(self.out, "{} {}", marker, title.bold());
        for line in result.output.lines() {
            let _ = writeln!(self.out, "  {line}");
        }
        let _ = writeln!(self.out);
    }

    fn show_answer(&mut self, answer: &str) {
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{} {}", "●".magenta(), "AI:".cyan().bold());
        let _ = writeln!(self.out);
        let width = self.width.saturating_sub(2);
        for line in answer.lines() {
            for wrapped in textwrap::wrap(line, width) {
                let _ = writeln!(self.out, "  {wrapped}");
            }
        }
        let _ = writeln!(self.out);
    }

    fn show_failure(&mut self, error: &ProviderError) {
        let tip = match error {
            ProviderError::MissingApiKey { env_var, .. } => {
                Some(format!("export {env_var}=<your key> and try again"))
            }
            ProviderError::RateLimited { .. } => Some("wait a moment and ask again".to_string()),
            ProviderError::NetworkError(_) => {
                Some("check your network connection or provider base_url".to_string())
            }
            ProviderError::ApiError { .. } | ProviderError::InvalidResponse { .. } => None,
        };
        let _ = writeln!(
            self.out,
            "{}",
            format_error(&error.to_string(), tip.as_deref())
        );
        let _ = writeln!(self.out);
    }

    fn confirm(&mut self, question: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let prompt = format!("{} {} {} ", "❗".red(), question.red(), hint.dimmed());
        match self.prompt(&prompt) {
            Some(answer) => {
                let answer = answer.trim().to_lowercase();
                if answer.is_empty() {
                    default
                } else {
                    answer.starts_with('y')
                }
            }
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn console(input: &str) -> TerminalConsole<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), 80)
    }

    fn written(console: TerminalConsole<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_writer()).unwrap()
    }

    #[test]
    fn test_strip_think_sections() {
        let raw = "<think>\nThe user wants...\n</think>\n\nRun `ls -a`.";
        assert_eq!(strip_think_sections(raw), "Run `ls -a`.");
    }

    #[test]
    fn test_strip_multiple_think_sections_non_greedy() {
        let raw = "<think>a</think>keep<think>b</think> this";
        assert_eq!(strip_think_sections(raw), "keep this");
    }

    #[test]
    fn test_markdown_fences_removed_and_code_indented() {
        let raw = "Install it:\n```bash\npip install requests\n```\nThen retry.";
        assert_eq!(
            markdown_to_chat(raw),
            "Install it:\n    pip install requests\nThen retry."
        );
    }

    #[test]
    fn test_code_like_lines_indented_outside_fences() {
        let raw = "Try this\nimport os\nprint(os.getcwd())\nDone";
        assert_eq!(
            markdown_to_chat(raw),
            "Try this\n    import os\n    print(os.getcwd())\nDone"
        );
    }

    #[test]
    fn test_format_response_pipeline() {
        let raw = "<think>hmm</think>\n```python\ndef f():\n    return 1\n```";
        assert_eq!(format_response(raw), "def f():\n    return 1");
    }

    #[test]
    fn test_interpret_exit_code() {
        assert_eq!(interpret_exit_code(0), "success");
        assert_eq!(interpret_exit_code(127), "command not found");
        assert_eq!(interpret_exit_code(137), "killed (SIGKILL)");
        assert_eq!(interpret_exit_code(134), "terminated by signal");
        assert_eq!(interpret_exit_code(42), "unknown");
    }

    #[test]
    fn test_read_line_strips_newline_and_detects_eof() {
        let mut c = console("ls -la\r\n");
        assert_eq!(c.read_line(), Some("ls -la".to_string()));
        assert_eq!(c.read_line(), None);
    }

    #[test]
    fn test_confirm_defaults_and_answers() {
        let mut c = console("\nn\nYes\nnope\n");
        assert!(c.confirm("Explain?", true));
        assert!(!c.confirm("Explain?", true));
        assert!(c.confirm("Explain?", false));
        assert!(!c.confirm("Explain?", true));
        // End of input falls back to the default.
        assert!(c.confirm("Explain?", true));
    }

    #[test]
    fn test_command_output_shows_exit_code() {
        colored::control::set_override(false);
        let mut c = console("");
        c.show_command_output(&CommandOutput::new("boom\n", 2));
        let text = written(c);
        assert!(text.contains("Command Output (exit code 2, misuse of shell command)"));
        assert!(text.contains("  boom"));
    }

    #[test]
    fn test_missing_key_failure_has_tip() {
        colored::control::set_override(false);
        let mut c = console("");
        c.show_failure(&ProviderError::MissingApiKey {
            provider: "Groq".to_string(),
            env_var: "GROQ_API_KEY".to_string(),
        });
        let text = written(c);
        assert!(text.contains("Error: API key not configured for Groq"));
        assert!(text.contains("Tip: export GROQ_API_KEY=<your key>"));
    }
}
