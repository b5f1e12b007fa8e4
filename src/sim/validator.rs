//! Player input checking

use serde::{Deserialize, Serialize};

use super::sequence::Sequence;

/// Outcome of a single tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Tap at `position` did not match (`expected` is `None` past the end)
    Mismatch {
        position: usize,
        expected: Option<u8>,
        actual: u8,
    },
    /// Correct so far, `matched` taps in
    Partial { matched: usize },
    /// The whole sequence was reproduced
    Complete,
}

/// Player input buffer for the current round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValidator {
    input: Vec<u8>,
}

impl InputValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Record a tap and check it against the same position in `sequence`
    pub fn submit(&mut self, sequence: &Sequence, tile: u8) -> Verdict {
        self.input.push(tile);
        let position = self.input.len() - 1;
        match sequence.get(position) {
            Some(expected) if expected == tile => {
                if self.input.len() == sequence.len() {
                    Verdict::Complete
                } else {
                    Verdict::Partial {
                        matched: self.input.len(),
                    }
                }
            }
            expected => Verdict::Mismatch {
                position,
                expected,
                actual: tile,
            },
        }
    }
}
