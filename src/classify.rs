//! Command-versus-question classification of user input.
//!
//! Cheap syntactic cues are checked first (explicit `?`/`ai ` markers,
//! a trailing question mark, a known command verb, path or assignment
//! syntax). Only when none of those apply does the weak "looks like prose"
//! heuristic kick in: any input with a letter and a space is a question.
//! Multi-word commands missing from the lexicon (`custom-tool run now`)
//! are misread as questions by that last rule; extend the lexicon through
//! config rather than changing the rule.

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

/// Shell utilities, package managers and network tools recognised as
/// command verbs.
pub const DEFAULT_COMMANDS: &[&str] = &[
    "ls", "dir", "cd", "pwd", "echo", "cat", "type", "python", "pip", "npm", "node", "git", "rm",
    "del", "copy", "move", "mv", "cp", "touch", "mkdir", "rmdir", "cls", "clear", "exit", "whoami",
    "find", "grep", "set", "export", "env", "where", "which", "start", "code", "run", "java",
    "javac", "curl", "wget", "ssh", "scp", "ping", "tracert", "ipconfig", "ifconfig", "tasklist",
    "taskkill", "kill", "ps", "top", "htop", "sudo", "choco", "apt", "yum", "brew", "docker",
    "kubectl", "conda", "poetry", "venv", "virtualenv",
];

static PATH_OR_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[./\\]|^[a-zA-Z0-9_]+=").unwrap());

/// Classification of one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Command,
    Question,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Command => write!(f, "command"),
            Verdict::Question => write!(f, "question"),
        }
    }
}

/// Immutable set of known command names, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct CommandLexicon {
    commands: BTreeSet<String>,
}

impl Default for CommandLexicon {
    fn default() -> Self {
        Self::new(DEFAULT_COMMANDS.iter().copied())
    }
}

impl CommandLexicon {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            commands: commands.into_iter().filter_map(normalize).collect(),
        }
    }

    /// Default lexicon plus `extra` entries.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();
        lexicon.commands.extend(extra.into_iter().filter_map(normalize));
        lexicon
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains(&name.to_lowercase())
    }

    /// True if `input` begins with a known command followed by whitespace
    /// or the end of the string. Entries may span several words
    /// (`cargo build`).
    pub fn matches_prefix(&self, input: &str) -> bool {
        let words: Vec<String> = input.split_whitespace().map(str::to_lowercase).collect();
        self.commands.iter().any(|command| {
            let mut entry = command.split(' ');
            let mut words = words.iter();
            entry.all(|part| words.next().is_some_and(|word| word == part))
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Decides whether input should be run by the shell or sent to the model.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    lexicon: CommandLexicon,
}

impl Classifier {
    pub fn new(lexicon: CommandLexicon) -> Self {
        Self { lexicon }
    }

    /// Classify raw input. The first matching rule wins.
    pub fn classify(&self, input: &str) -> Verdict {
        let input = input.trim();

        if input.starts_with('?') || starts_with_ai_marker(input) {
            return Verdict::Question;
        }
        if input.ends_with('?') {
            return Verdict::Question;
        }
        if self.lexicon.matches_prefix(input) {
            return Verdict::Command;
        }
        if PATH_OR_ASSIGNMENT.is_match(input) {
            return Verdict::Command;
        }
        if input.chars().any(|c| c.is_ascii_alphabetic()) && input.contains(' ') {
            return Verdict::Question;
        }
        Verdict::Command
    }
}

/// Lowercase an entry and collapse its inner whitespace; blank entries are dropped.
fn normalize<S: AsRef<str>>(entry: S) -> Option<String> {
    let words: Vec<&str> = entry.as_ref().split_whitespace().collect();
    (!words.is_empty()).then(|| words.join(" ").to_lowercase())
}

fn starts_with_ai_marker(input: &str) -> bool {
    input
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("ai "))
}

/// Strip a leading `?` and then a leading `ai ` marker from a question.
pub fn question_payload(input: &str) -> &str {
    let mut text = input.trim();
    if let Some(rest) = text.strip_prefix('?') {
        text = rest.trim();
    }
    if starts_with_ai_marker(text) {
        text = text[3..].trim();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: &str) -> Verdict {
        Classifier::default().classify(input)
    }

    #[test]
    fn test_question_mark_prefix_wins_over_known_command() {
        assert_eq!(classify("?clear"), Verdict::Question);
        assert_eq!(classify("? git status"), Verdict::Question);
    }

    #[test]
    fn test_ai_prefix_is_case_insensitive() {
        assert_eq!(classify("ai list my files"), Verdict::Question);
        assert_eq!(classify("AI ls"), Verdict::Question);
        assert_eq!(classify("  Ai what now"), Verdict::Question);
    }

    #[test]
    fn test_ai_without_space_is_not_a_marker() {
        assert_eq!(classify("aider"), Verdict::Command);
        assert_eq!(classify("ai"), Verdict::Command);
    }

    #[test]
    fn test_trailing_question_mark() {
        assert_eq!(classify("why is my build failing?"), Verdict::Question);
        assert_eq!(classify("ls?"), Verdict::Question);
        assert_eq!(classify("git status?  "), Verdict::Question);
    }

    #[test]
    fn test_known_commands() {
        assert_eq!(classify("git status"), Verdict::Command);
        assert_eq!(classify("ls -la"), Verdict::Command);
        assert_eq!(classify("ls"), Verdict::Command);
        assert_eq!(classify("  pwd  "), Verdict::Command);
        assert_eq!(classify("GIT log --oneline"), Verdict::Command);
        assert_eq!(classify("echo hello world"), Verdict::Command);
        assert_eq!(classify("docker\tps"), Verdict::Command);
    }

    #[test]
    fn test_command_prefix_needs_word_boundary() {
        // "lsblk" is not "ls"; "gitk show me" falls through to the prose rule.
        assert_eq!(classify("lsblk"), Verdict::Command);
        assert_eq!(classify("gitk show me"), Verdict::Question);
    }

    #[test]
    fn test_paths_and_assignments() {
        assert_eq!(classify("FOO=bar"), Verdict::Command);
        assert_eq!(classify("RUST_LOG=debug cargo run"), Verdict::Command);
        assert_eq!(classify("./build.sh --release now"), Verdict::Command);
        assert_eq!(classify("/usr/bin/env python3 script.py"), Verdict::Command);
        assert_eq!(classify(".\\setup.bat install all"), Verdict::Command);
        assert_eq!(classify("\\\\server\\share list"), Verdict::Command);
    }

    #[test]
    fn test_prose_heuristic() {
        assert_eq!(classify("explain the last output"), Verdict::Question);
        assert_eq!(classify("custom-tool run now"), Verdict::Question);
    }

    #[test]
    fn test_default_is_command() {
        assert_eq!(classify("cargo"), Verdict::Command);
        assert_eq!(classify("make"), Verdict::Command);
        assert_eq!(classify("123 456"), Verdict::Command);
        assert_eq!(classify(""), Verdict::Command);
        assert_eq!(classify("   "), Verdict::Command);
    }

    #[test]
    fn test_custom_lexicon() {
        let classifier = Classifier::new(CommandLexicon::with_extra(["cargo", "custom-tool"]));
        assert_eq!(classifier.classify("cargo build --release"), Verdict::Command);
        assert_eq!(classifier.classify("custom-tool run now"), Verdict::Command);
        assert_eq!(classifier.classify("git status"), Verdict::Command);

        let bare = Classifier::new(CommandLexicon::new(["make"]));
        assert_eq!(bare.classify("git status"), Verdict::Question);
        assert_eq!(bare.classify("make all"), Verdict::Command);
    }

    #[test]
    fn test_multi_word_entries_match_whole_words() {
        let classifier = Classifier::new(CommandLexicon::with_extra(["cargo  build", "Go Test"]));
        assert_eq!(classifier.classify("cargo build --release"), Verdict::Command);
        assert_eq!(classifier.classify("cargo build"), Verdict::Command);
        assert_eq!(classifier.classify("go\ttest ./..."), Verdict::Command);
        assert_eq!(classifier.classify("cargo builder now"), Verdict::Question);
        assert_eq!(classifier.classify("cargo check it"), Verdict::Question);
        assert!(CommandLexicon::new(["cargo  build"]).contains("Cargo Build"));
    }

    #[test]
    fn test_lexicon_normalizes_entries() {
        let lexicon = CommandLexicon::new(["  Cargo ", "", "RUSTUP"]);
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("cargo"));
        assert!(lexicon.contains("rustup"));
    }

    #[test]
    fn test_question_payload() {
        assert_eq!(question_payload("?  what is this"), "what is this");
        assert_eq!(question_payload("ai explain grep"), "explain grep");
        assert_eq!(question_payload("AI  explain grep"), "explain grep");
        assert_eq!(question_payload("? ai both markers"), "both markers");
        assert_eq!(
            question_payload("why is my build failing?"),
            "why is my build failing?"
        );
    }
}
