//! The state machine which turns successive samples into trimmed deltas.
//!
//! Simple rules are used to trim outliers:
//! 1. The delta of the first sample of a window is zero.
//! 2. A sample whose value is lower than its predecessor's is taken to be a counter reset and
//!    emits nothing.
//! 3. For values above the large value threshold, a sample whose increase exceeds a fixed
//!    proportion of its value is taken to be a spike and emits nothing.
//! 4. If the gap before a sample is at least a multiple of the average gap so far, the sample
//!    starts a new segment and its delta is zero.
//!
//! Samples which emit nothing still become the baseline for the following sample.
use super::{DeltaPoint, Real, Timestamp, Tolerance, tolerance::EPSILON};
use tracing::trace;

/// Values above this are subject to the proportional deviation filter.
pub(crate) const LARGE_VALUE_THRESHOLD: Real = 10000.0;
/// Large values may increase by at most this fraction of themselves.
pub(crate) const PROPORTIONAL_DEVIATION_DIVISOR: Real = 16.0;
/// A gap at least this many times the average gap starts a new segment.
pub(crate) const GAP_MULTIPLIER: Timestamp = 4;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Thresholds {
    pub(crate) tolerance: Tolerance,
    pub(crate) large_value: Real,
    pub(crate) proportional_divisor: Real,
    pub(crate) gap_multiplier: Timestamp,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::new(EPSILON),
            large_value: LARGE_VALUE_THRESHOLD,
            proportional_divisor: PROPORTIONAL_DEVIATION_DIVISOR,
            gap_multiplier: GAP_MULTIPLIER,
        }
    }
}

/// Running total of the gaps preceding samples whose deltas were passed through.
///
/// Gaps which started a new segment are never recorded.
#[derive(Default, Clone, Debug, PartialEq)]
pub(crate) struct GapAverage {
    count: i64,
    total: Timestamp,
}

impl GapAverage {
    /// The truncated mean gap, if any gaps have been recorded.
    pub(crate) fn mean(&self) -> Option<Timestamp> {
        (self.count > 0).then(|| self.total / self.count)
    }

    /// True if no gaps have been recorded, or if `gap` is short of `multiplier` times the mean.
    fn admits(&self, gap: Timestamp, multiplier: Timestamp) -> bool {
        self.mean()
            .is_none_or(|mean| gap < mean.wrapping_mul(multiplier))
    }

    fn record(&mut self, gap: Timestamp) {
        self.count += 1;
        self.total = self.total.wrapping_add(gap);
    }
}

/// Tallies of what the trimmer did with its samples.
#[derive(Default, Clone, Debug, PartialEq)]
pub(crate) struct TrimStatistics {
    /// Number of samples signalled.
    pub(crate) samples: usize,
    /// Number of deltas emitted, including the first sample's zero.
    pub(crate) deltas: usize,
    /// Number of samples taken to be resets or spikes, which emitted nothing.
    pub(crate) rejected: usize,
    /// Number of samples which emitted zero because of the gap preceding them.
    pub(crate) gap_resets: usize,
}

/// Applies the trimming rules to a single window of samples.
///
/// A trimmer holds the state of one window only, so a new one must be created for each window.
#[derive(Default, Clone, Debug)]
pub(crate) struct DeltaTrimmer {
    thresholds: Thresholds,

    previous: Option<(Timestamp, Real)>,
    accepted_gaps: GapAverage,
    statistics: TrimStatistics,
}

impl DeltaTrimmer {
    pub(crate) fn new(thresholds: &Thresholds) -> Self {
        Self {
            thresholds: thresholds.clone(),
            ..Default::default()
        }
    }

    pub(crate) fn statistics(&self) -> &TrimStatistics {
        &self.statistics
    }

    /// True if the increase `diff` onto `value` could be a genuine counter increment.
    fn is_plausible(&self, value: Real, diff: Real) -> bool {
        let tolerance = &self.thresholds.tolerance;
        tolerance.not_more_than(0.0, diff)
            && (tolerance.not_more_than(value, self.thresholds.large_value)
                || tolerance.not_more_than(diff, value / self.thresholds.proportional_divisor))
    }

    /// Takes in the next sample of the window and possibly outputs its delta.
    pub(crate) fn signal(&mut self, time: Timestamp, value: Real) -> Option<DeltaPoint> {
        self.statistics.samples += 1;
        let Some((previous_time, previous_value)) = self.previous.replace((time, value)) else {
            self.statistics.deltas += 1;
            return Some((time, 0.0));
        };

        let diff = value - previous_value;
        if !self.is_plausible(value, diff) {
            trace!("Rejected sample at {time}: value {value}, diff {diff}");
            self.statistics.rejected += 1;
            return None;
        }

        let gap = time.wrapping_sub(previous_time);
        let delta = if self
            .accepted_gaps
            .admits(gap, self.thresholds.gap_multiplier)
        {
            self.accepted_gaps.record(gap);
            diff
        } else {
            trace!(
                "Gap of {gap} at {time} exceeds average {:?}, starting new segment",
                self.accepted_gaps.mean()
            );
            self.statistics.gap_resets += 1;
            0.0
        };
        self.statistics.deltas += 1;
        Some((time, delta))
    }
}
