//! Scripted random number generators.

use bastionlands_core::determinism::DeterministicRng;

/// Always returns the bottom of the requested range and `0.0` for floats.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Replays a fixed list of integers, ignoring the requested range. Floats
/// come from a separate list and fall back to `0.0` once it runs out.
///
/// # Panics
///
/// Panics when more integers are requested than were scripted, so a test
/// that rolls more dice than expected fails loudly.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
    floats: Vec<f64>,
    float_index: usize,
}

impl SequenceRng {
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            index: 0,
            floats: Vec::new(),
            float_index: 0,
        }
    }

    /// Scripts the values returned by `next_f64`.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats;
        self
    }

    /// Number of integers consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let value = self.values[self.index];
        self.index += 1;
        value
    }

    fn next_f64(&mut self) -> f64 {
        let value = self.floats.get(self.float_index).copied().unwrap_or(0.0);
        self.float_index += 1;
        value
    }
}
