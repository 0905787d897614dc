//! An abstraction of the time-dependent types that are consumed and produced by the trimmer.
use super::{Real, Timestamp};
use num::traits::AsPrimitive;

/// Abstracts types that are processed by the trimmer.
///
/// To implement SamplePoint a type must contain a timestamp and a numeric value.
pub(crate) trait SamplePoint {
    /// Returns the time of the sample.
    fn get_time(&self) -> Timestamp;

    /// Returns the value of the sample, converted to [Real].
    fn get_value(&self) -> Real;
}

/// This is the most basic SamplePoint type.
/// The first element is the timestamp, and the second the value, which may be any primitive
/// number. Integers are converted to [Real], which loses precision for very large values.
impl<V> SamplePoint for (Timestamp, V)
where
    V: AsPrimitive<Real>,
{
    fn get_time(&self) -> Timestamp {
        self.0
    }

    fn get_value(&self) -> Real {
        self.1.as_()
    }
}

/// The output of the trimmer, a timestamp and the delta at that time.
pub(crate) type DeltaPoint = (Timestamp, Real);
