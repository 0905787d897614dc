//! Provides functions which dispatch the windows of a window set to the trimmer.
use crate::trimmed_delta::{Thresholds, Timestamp, TrimStatistics, TrimmedDeltaIterable};
use metrics::counter;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use strum::IntoStaticStr;
use thiserror::Error;
use tracing::{Span, info, instrument, warn};
use trimmed_delta_common::{
    GroupType, SampleRecord, SampleValue, WindowRecord, WindowSet,
    metrics::names::{
        GAP_RESETS, SAMPLES_READ, SAMPLES_REJECTED, WINDOWS_SKIPPED, WINDOWS_TRANSFORMED,
    },
};

#[derive(Debug, Error, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum WindowError {
    #[error("Unrecognised group type \"{0}\"")]
    UnknownGroupType(String),
    #[error("Cannot compute deltas of {0} samples")]
    UnsupportedGroupType(GroupType),
    #[error("Sample at {0} is not numeric")]
    NonNumericSample(Timestamp),
}

/// Whether the trimmer can process windows of the given group type.
pub(crate) fn can_aggregate(group_type: GroupType) -> bool {
    group_type.is_numeric()
}

/// Computes the trimmed deltas of a single window.
/// # Parameters
/// - window: the window to process, its samples should be in chronological order.
/// - thresholds: the thresholds used to trim outliers.
pub(crate) fn transform_window(
    window: &WindowRecord,
    thresholds: &Thresholds,
) -> Result<WindowRecord, WindowError> {
    trim_window(window, thresholds).map(|(deltas, _)| deltas)
}

#[instrument(
    skip_all,
    fields(
        name = %window.name,
        return_time = window.return_time,
        num_samples = window.samples.len(),
        num_deltas,
        num_rejected,
        num_gap_resets,
    )
)]
fn trim_window(
    window: &WindowRecord,
    thresholds: &Thresholds,
) -> Result<(WindowRecord, TrimStatistics), WindowError> {
    let group_type = window
        .group_type()
        .map_err(|_| WindowError::UnknownGroupType(window.group_type.clone()))?;
    if !can_aggregate(group_type) {
        return Err(WindowError::UnsupportedGroupType(group_type));
    }

    let samples = window
        .samples
        .iter()
        .map(|sample| {
            sample
                .value
                .as_real()
                .map(|value| (sample.timestamp, value))
                .ok_or(WindowError::NonNumericSample(sample.timestamp))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut deltas = samples.into_iter().trimmed_deltas(thresholds);
    let output = deltas
        .by_ref()
        .map(|(timestamp, delta)| SampleRecord {
            timestamp,
            value: SampleValue::Double(delta),
        })
        .collect::<Vec<_>>();

    let statistics = deltas.statistics().clone();
    let span = Span::current();
    span.record("num_deltas", statistics.deltas);
    span.record("num_rejected", statistics.rejected);
    span.record("num_gap_resets", statistics.gap_resets);

    let trimmed = WindowRecord {
        name: window.name.clone(),
        group_type: GroupType::Number.to_string(),
        return_time: window.return_time,
        samples: output,
    };
    Ok((trimmed, statistics))
}

fn record_statistics(statistics: &TrimStatistics) {
    counter!(WINDOWS_TRANSFORMED).increment(1);
    counter!(SAMPLES_READ).increment(statistics.samples as u64);
    counter!(SAMPLES_REJECTED).increment(statistics.rejected as u64);
    counter!(GAP_RESETS).increment(statistics.gap_resets as u64);
}

/// Computes the trimmed deltas of every window in the set, in parallel.
///
/// Windows which cannot be processed are logged and left out of the result.
/// The remaining windows keep their order.
/// Metrics are recorded on the calling thread once every window is processed.
#[instrument(skip_all, fields(num_windows = set.windows.len()))]
pub(crate) fn transform_windows(set: &WindowSet, thresholds: &Thresholds) -> WindowSet {
    let parent = Span::current();
    let results = set
        .windows
        .par_iter()
        .map(|window| parent.in_scope(|| trim_window(window, thresholds)))
        .collect::<Vec<_>>();

    let mut windows = Vec::with_capacity(results.len());
    for (window, result) in set.windows.iter().zip(results) {
        match result {
            Ok((deltas, statistics)) => {
                record_statistics(&statistics);
                windows.push(deltas);
            }
            Err(e) => {
                warn!("Skipping window \"{}\": {e}", window.name);
                let reason: &'static str = (&e).into();
                counter!(WINDOWS_SKIPPED, "reason" => reason).increment(1);
            }
        }
    }

    info!(
        "Transformed {} of {} windows",
        windows.len(),
        set.windows.len()
    );
    WindowSet { windows }
}
