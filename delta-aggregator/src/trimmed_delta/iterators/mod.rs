//! Provides iterators to convert raw samples into trimmed deltas.
pub(crate) mod delta;

use super::{DeltaPoint, DeltaTrimmer, SamplePoint, Thresholds, TrimStatistics};
pub(crate) use delta::TrimmedDeltaIterable;
