//! Bounded chat transcript.
//!
//! An ordered, in-process sequence of turns with a hard cap: pushing past the
//! bound evicts from the head (FIFO). Never persisted beyond the process.

use paperchat_core::turn::ChatTurn;
use std::collections::VecDeque;

/// Default retention bound, in turns.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// The rolling conversation transcript.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: VecDeque<ChatTurn>,
    limit: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl Transcript {
    /// Create a transcript retaining at most `limit` turns.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            turns: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Append a turn at the tail, evicting from the head past the bound.
    pub fn push(&mut self, turn: ChatTurn) {
        if self.turns.len() == self.limit {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// The last `n` turns, oldest first. Read-only.
    pub fn recent(&self, n: usize) -> Vec<&ChatTurn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> ChatTurn {
        ChatTurn::user(format!("message {n}"))
    }

    #[test]
    fn retains_exactly_the_bound_after_overflow() {
        let mut transcript = Transcript::new(10);
        for i in 0..25 {
            transcript.push(numbered(i));
        }
        assert_eq!(transcript.len(), 10);

        // The most recent 10, in order.
        let texts: Vec<&str> = transcript.iter().map(|t| t.text.as_str()).collect();
        let expected: Vec<String> = (15..25).map(|i| format!("message {i}")).collect();
        assert_eq!(texts, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn eviction_is_fifo() {
        let mut transcript = Transcript::new(3);
        for i in 0..4 {
            transcript.push(numbered(i));
        }
        let texts: Vec<&str> = transcript.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["message 1", "message 2", "message 3"]);
    }

    #[test]
    fn recent_window_returns_tail_in_order() {
        let mut transcript = Transcript::new(10);
        for i in 0..5 {
            transcript.push(numbered(i));
        }
        let window = transcript.recent(2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].text, "message 3");
        assert_eq!(window[1].text, "message 4");
    }

    #[test]
    fn recent_window_larger_than_transcript() {
        let mut transcript = Transcript::new(10);
        transcript.push(numbered(0));
        assert_eq!(transcript.recent(6).len(), 1);
        assert!(Transcript::default().recent(6).is_empty());
    }

    #[test]
    fn zero_limit_is_clamped() {
        let mut transcript = Transcript::new(0);
        transcript.push(numbered(0));
        assert_eq!(transcript.len(), 1);
    }
}
