//! Computes the deltas between successive samples of a counter, trimming out the outliers.
//!
//! # Example
//!
//! The following example turns a window of raw counter samples into deltas.
//! The drop to `3.0` is treated as a counter reset, so no delta is emitted for it,
//! but it becomes the baseline for the sample that follows.
//! ```rust,ignore
//!     use crate::trimmed_delta::{Thresholds, TrimmedDeltaIterable};
//!
//!     let deltas = [(0, 10.0), (10, 15.0), (20, 3.0), (30, 8.0)]
//!         .into_iter()
//!         .trimmed_deltas(&Thresholds::default())
//!         .collect::<Vec<_>>();
//!     assert_eq!(deltas, vec![(0, 0.0), (10, 5.0), (30, 5.0)]);
//! ```
pub(crate) mod datatype;
pub(crate) mod iterators;
pub(crate) mod tolerance;
pub(crate) mod trimmer;

pub(crate) use datatype::{DeltaPoint, SamplePoint};
pub(crate) use iterators::TrimmedDeltaIterable;
pub(crate) use tolerance::Tolerance;
pub(crate) use trimmer::{DeltaTrimmer, Thresholds, TrimStatistics};
pub(crate) use trimmed_delta_common::{Real, Timestamp};
