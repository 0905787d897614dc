//! Provides the delta iterator and the trait for converting sample iterators into delta iterators.
use super::{DeltaPoint, DeltaTrimmer, SamplePoint, Thresholds, TrimStatistics};

/// Applies a [DeltaTrimmer] to a source iterator of samples.
///
/// The trimmer is owned by the iterator, so the state of the window lives exactly as long as
/// the window's traversal.
#[derive(Clone)]
pub(crate) struct TrimmedDeltaIter<I>
where
    I: Iterator,
    I::Item: SamplePoint,
{
    /// The samples of the window.
    source: I,
    /// The trimmer to apply.
    trimmer: DeltaTrimmer,
}

impl<I> TrimmedDeltaIter<I>
where
    I: Iterator,
    I::Item: SamplePoint,
{
    /// Tallies for the samples consumed so far.
    pub(crate) fn statistics(&self) -> &TrimStatistics {
        self.trimmer.statistics()
    }
}

impl<I> Iterator for TrimmedDeltaIter<I>
where
    I: Iterator,
    I::Item: SamplePoint,
{
    type Item = DeltaPoint;

    fn next(&mut self) -> Option<DeltaPoint> {
        for sample in &mut self.source {
            let delta = self.trimmer.signal(sample.get_time(), sample.get_value());
            if delta.is_some() {
                return delta;
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

/// Provides method for creating a delta iterator from another iterator.
pub(crate) trait TrimmedDeltaIterable<I>
where
    I: Iterator,
    I::Item: SamplePoint,
{
    /// Creates an iterator which emits the trimmed delta of each sample as it is consumed.
    fn trimmed_deltas(self, thresholds: &Thresholds) -> TrimmedDeltaIter<I>;
}

impl<I> TrimmedDeltaIterable<I> for I
where
    I: Iterator,
    I::Item: SamplePoint,
{
    fn trimmed_deltas(self, thresholds: &Thresholds) -> TrimmedDeltaIter<I> {
        TrimmedDeltaIter {
            source: self,
            trimmer: DeltaTrimmer::new(thresholds),
        }
    }
}
