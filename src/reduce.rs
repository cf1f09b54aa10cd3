//! Per-process minimum over one half of the input

use crate::input::{InputSequence, HALF, INPUT_LEN};
use std::ops::Range;

/// Which half of the input a process reduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    First,
    Second,
}

impl Half {
    /// Index range covered by this half
    pub fn range(self) -> Range<usize> {
        match self {
            Half::First => 0..HALF,
            Half::Second => HALF..INPUT_LEN,
        }
    }

    /// Human-readable label, e.g. `first half, idx 0..9`
    pub fn describe(self) -> String {
        let name = match self {
            Half::First => "first",
            Half::Second => "second",
        };
        let range = self.range();
        format!("{} half, idx {}..{}", name, range.start, range.end - 1)
    }
}

/// Minimum of one half, computed once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMin {
    pub half: Half,
    pub value: i32,
}

impl PartialMin {
    pub fn compute(input: &InputSequence, half: Half) -> Self {
        let value = input
            .slice(half.range())
            .iter()
            .copied()
            .fold(i32::MAX, i32::min);
        Self { half, value }
    }
}
