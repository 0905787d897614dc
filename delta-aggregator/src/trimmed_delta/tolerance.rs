//! Floating point comparisons which treat values closer than a fixed epsilon as equal.
use super::Real;

/// Default tolerance for all comparisons made by the trimmer.
pub(crate) const EPSILON: Real = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tolerance {
    epsilon: Real,
}

impl Tolerance {
    pub(crate) fn new(epsilon: Real) -> Self {
        Self { epsilon }
    }

    /// True if `v1` and `v2` differ by strictly less than epsilon.
    pub(crate) fn equals(&self, v1: Real, v2: Real) -> bool {
        Real::abs(v2 - v1) < self.epsilon
    }

    /// True if `v1` is less than `v2`, or equal to it within epsilon.
    pub(crate) fn not_more_than(&self, v1: Real, v2: Real) -> bool {
        v1 < v2 || self.equals(v1, v2)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(EPSILON)
    }
}
