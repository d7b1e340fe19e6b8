// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Status reporting
//!
//! The preparation pipeline reports progress as human-readable lines through
//! a [`StatusSink`]. The sink is passed in explicitly; the library holds no
//! global log handle.

/// Receiver of human-readable progress lines.
pub trait StatusSink {
    /// Append one status line.
    fn status(&mut self, line: &str);
}

impl<F: FnMut(&str)> StatusSink for F {
    fn status(&mut self, line: &str) {
        self(line)
    }
}

/// Collects status lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatusLog {
    lines: Vec<String>,
}

impl MemoryStatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl StatusSink for MemoryStatusLog {
    fn status(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Forwards status lines to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn status(&mut self, line: &str) {
        log::info!(target: "xpress::status", "{}", line);
    }
}

/// Format a row count with `.` as thousands separator (`12345` -> `12.345`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log_collects() {
        let mut log = MemoryStatusLog::new();
        log.status("Merge Data");
        log.status("Cleanse Matrix");
        assert_eq!(log.lines().len(), 2);
        assert!(log.contains("Cleanse"));
        log.clear();
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |line: &str| seen.push(line.to_uppercase());
            sink.status("ok");
        }
        assert_eq!(seen, vec!["OK".to_string()]);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.000");
        assert_eq!(format_count(1234567), "1.234.567");
    }
}
