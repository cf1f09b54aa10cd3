//! Random input shared by both processes
//!
//! The sequence is generated once in the parent before the fork. Each
//! process then owns its own copy, duplicated by the kernel, so nothing
//! here is reference counted or shared.

use rand::Rng;
use std::fmt;
use std::ops::Range;

/// Number of values in the input
pub const INPUT_LEN: usize = 20;

/// Largest value the generator produces (inclusive)
pub const VALUE_MAX: i32 = 999;

/// Boundary between the parent's half and the child's half
pub const HALF: usize = INPUT_LEN / 2;

/// Fixed-length sequence of values in `0..=VALUE_MAX`
#[derive(Debug, PartialEq, Eq)]
pub struct InputSequence {
    values: [i32; INPUT_LEN],
}

impl InputSequence {
    /// Sample every value uniformly from `0..=VALUE_MAX`
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = [0; INPUT_LEN];
        for value in values.iter_mut() {
            *value = rng.gen_range(0..=VALUE_MAX);
        }
        Self { values }
    }

    /// Generate from OS entropy; every run differs
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn from_values(values: [i32; INPUT_LEN]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[i32; INPUT_LEN] {
        &self.values
    }

    /// Borrow a contiguous part of the sequence
    pub fn slice(&self, range: Range<usize>) -> &[i32] {
        &self.values[range]
    }
}

impl fmt::Display for InputSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array ({} elems): ", INPUT_LEN)?;
        for value in &self.values {
            write!(f, "{} ", value)?;
        }
        Ok(())
    }
}
