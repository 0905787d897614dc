//! Defines the parameters used by the trimmer defined in this component.
use crate::trimmed_delta::{
    Real, Thresholds, Timestamp, Tolerance,
    tolerance::EPSILON,
    trimmer::{GAP_MULTIPLIER, LARGE_VALUE_THRESHOLD, PROPORTIONAL_DEVIATION_DIVISOR},
};
use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ParameterError {
    #[error("Epsilon must be finite and non-negative, found {0}")]
    Epsilon(Real),
    #[error("Large value threshold must be finite, found {0}")]
    LargeValueThreshold(Real),
    #[error("Proportional deviation divisor must be finite and non-zero, found {0}")]
    ProportionalDeviationDivisor(Real),
    #[error("Gap multiplier must be positive, found {0}")]
    GapMultiplier(Timestamp),
}

/// Encapsulates the thresholds used to trim outliers from the deltas.
#[derive(Debug, Clone, Parser)]
pub(crate) struct TrimParameters {
    /// Values closer than this are treated as equal in all comparisons.
    #[clap(long, default_value_t = EPSILON)]
    pub(crate) epsilon: Real,

    /// Samples with values above this are rejected if their increase is disproportionately large.
    #[clap(long, default_value_t = LARGE_VALUE_THRESHOLD)]
    pub(crate) large_value_threshold: Real,

    /// Samples with large values are rejected if their increase exceeds their value divided by this.
    #[clap(long, default_value_t = PROPORTIONAL_DEVIATION_DIVISOR)]
    pub(crate) proportional_deviation_divisor: Real,

    /// A sample whose gap from the previous sample is at least this multiple of the average gap starts a new segment.
    #[clap(long, default_value_t = GAP_MULTIPLIER)]
    pub(crate) gap_multiplier: Timestamp,
}

impl Default for TrimParameters {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            large_value_threshold: LARGE_VALUE_THRESHOLD,
            proportional_deviation_divisor: PROPORTIONAL_DEVIATION_DIVISOR,
            gap_multiplier: GAP_MULTIPLIER,
        }
    }
}

impl TrimParameters {
    /// Checks the parameters and converts them into the thresholds applied by the trimmer.
    pub(crate) fn thresholds(&self) -> Result<Thresholds, ParameterError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ParameterError::Epsilon(self.epsilon));
        }
        if !self.large_value_threshold.is_finite() {
            return Err(ParameterError::LargeValueThreshold(
                self.large_value_threshold,
            ));
        }
        if !self.proportional_deviation_divisor.is_finite()
            || self.proportional_deviation_divisor == 0.0
        {
            return Err(ParameterError::ProportionalDeviationDivisor(
                self.proportional_deviation_divisor,
            ));
        }
        if self.gap_multiplier <= 0 {
            return Err(ParameterError::GapMultiplier(self.gap_multiplier));
        }
        Ok(Thresholds {
            tolerance: Tolerance::new(self.epsilon),
            large_value: self.large_value_threshold,
            proportional_divisor: self.proportional_deviation_divisor,
            gap_multiplier: self.gap_multiplier,
        })
    }
}
