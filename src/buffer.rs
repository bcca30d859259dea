//! Rolling buffer of recent command output.

use std::collections::VecDeque;

/// Default number of lines retained.
pub const DEFAULT_CAPACITY: usize = 40;

/// Bounded, append-only line buffer. Oldest lines are evicted first.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding at most `capacity` lines (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Split `text` into lines and push them, evicting from the front
    /// until the buffer is back within capacity.
    pub fn append(&mut self, text: &str) {
        self.lines.extend(text.lines().map(str::to_string));
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Last `n` lines joined by newline, oldest first.
    pub fn recent(&self, n: usize) -> String {
        let skip = self.lines.len().saturating_sub(n);
        self.lines
            .iter()
            .skip(skip)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
