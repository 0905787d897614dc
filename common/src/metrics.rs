//! Names of the metrics reported by the components.
pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "trimmed_delta_";

    pub const WINDOWS_TRANSFORMED: &str = concatcp!(METRIC_NAME_PREFIX, "windows_transformed");
    pub const WINDOWS_SKIPPED: &str = concatcp!(METRIC_NAME_PREFIX, "windows_skipped");
    pub const SAMPLES_READ: &str = concatcp!(METRIC_NAME_PREFIX, "samples_read");
    pub const SAMPLES_REJECTED: &str = concatcp!(METRIC_NAME_PREFIX, "samples_rejected");
    pub const GAP_RESETS: &str = concatcp!(METRIC_NAME_PREFIX, "gap_resets");
}
