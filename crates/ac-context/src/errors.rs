//! Error retention: a bounded ring of recent tool failures, so the LLM can
//! be shown what it already tried and failed at.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub tool: String,
    pub error: String,
}

pub struct ErrorRetention {
    ring: VecDeque<ErrorEntry>,
    cap: usize,
    pub summary_threshold: usize,
}

impl ErrorRetention {
    pub fn new(cap: usize, summary_threshold: usize) -> Self {
        Self {
            ring: VecDeque::new(),
            cap,
            summary_threshold,
        }
    }

    pub fn record(&mut self, tool: impl Into<String>, error: impl Into<String>) {
        self.ring.push_back(ErrorEntry {
            tool: tool.into(),
            error: error.into(),
        });
        while self.ring.len() > self.cap {
            self.ring.pop_front();
        }
    }

    /// Last `summary_threshold` errors, as `- <tool>: <error>` lines, under
    /// `[PREVIOUS ERRORS — Avoid repeating these mistakes:]`. `None` when
    /// the ring is empty, so an error-free run renders no block at all.
    pub fn to_context_string(&self) -> Option<String> {
        if self.ring.is_empty() {
            return None;
        }
        let start = self.ring.len().saturating_sub(self.summary_threshold);
        let mut lines = vec!["[PREVIOUS ERRORS — Avoid repeating these mistakes:]".to_string()];
        for entry in self.ring.iter().skip(start) {
            lines.push(format!("- {}: {}", entry.tool, entry.error));
        }
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ring_emits_no_block() {
        let retention = ErrorRetention::new(10, 5);
        assert!(retention.to_context_string().is_none());
    }

    #[test]
    fn ring_evicts_oldest_past_cap() {
        let mut retention = ErrorRetention::new(2, 5);
        retention.record("a", "e1");
        retention.record("b", "e2");
        retention.record("c", "e3");
        let text = retention.to_context_string().unwrap();
        assert!(!text.contains("a: e1"));
        assert!(text.contains("c: e3"));
    }

    #[test]
    fn summary_threshold_limits_emitted_entries() {
        let mut retention = ErrorRetention::new(10, 2);
        for i in 0..5 {
            retention.record("t", format!("e{i}"));
        }
        let text = retention.to_context_string().unwrap();
        assert_eq!(text.lines().count(), 3); // header + 2 entries
    }
}
