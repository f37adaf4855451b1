//! Comparison and judgment types.

use serde::{Deserialize, Serialize};

/// Which side of a displayed pair the rater picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Two slots of one item, presented side by side.
///
/// `slot_a != slot_b` for every pair produced by
/// [`SessionState::draw_pair`](super::SessionState::draw_pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonPair {
    pub item_id: usize,
    pub slot_a: usize,
    pub text_a: String,
    pub slot_b: usize,
    pub text_b: String,
}

impl ComparisonPair {
    pub fn slot(&self, side: Side) -> usize {
        match side {
            Side::A => self.slot_a,
            Side::B => self.slot_b,
        }
    }

    pub fn text(&self, side: Side) -> &str {
        match side {
            Side::A => &self.text_a,
            Side::B => &self.text_b,
        }
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot == self.slot_a || slot == self.slot_b
    }

    /// The slot opposite `slot`, or `None` if `slot` is not in the pair.
    pub fn other(&self, slot: usize) -> Option<usize> {
        if self.slot_a == self.slot_b {
            None
        } else if slot == self.slot_a {
            Some(self.slot_b)
        } else if slot == self.slot_b {
            Some(self.slot_a)
        } else {
            None
        }
    }
}

/// Outcome of one resolved pair. Serialized with the export column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    #[serde(rename = "title_idx")]
    pub item_id: usize,
    pub winner: usize,
    pub loser: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Ready to draw the next pair.
    #[default]
    Idle,
    /// A pair has been drawn and awaits a judgment.
    PairDrawn,
}
