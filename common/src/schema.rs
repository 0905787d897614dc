//! Defines the window set document exchanged between the simulator and the delta aggregator.
//!
//! A window set is a JSON object with a single `windows` array. Each window carries the samples of
//! exactly one range, already partitioned by whoever produced the document:
//! ```json
//! {
//!   "windows": [
//!     {
//!       "name": "requests.count",
//!       "group-type": "number",
//!       "return-time": 60000,
//!       "samples": [
//!         { "timestamp": 0, "value": 10 },
//!         { "timestamp": 10000, "value": 15.5 }
//!       ]
//!     }
//!   ]
//! }
//! ```
use crate::{Real, Timestamp};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The kinds of data a window may hold.
///
/// This acts as a capability tag: consumers decide which group types they can process by
/// inspecting the tag, rather than by asking each window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum GroupType {
    /// Integer or floating point samples.
    #[default]
    Number,
    /// Free text samples.
    Text,
    /// Structured samples with more than one component.
    Complex,
}

impl GroupType {
    /// Whether samples of this group type can be converted into [Real] values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, GroupType::Number)
    }
}

/// The value of a single sample, as it appears in the document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    Long(i64),
    Double(Real),
    Text(String),
}

impl SampleValue {
    /// Converts numeric values to [Real], this loses precision for very large longs.
    ///
    /// Returns [None] for text values.
    pub fn as_real(&self) -> Option<Real> {
        match self {
            SampleValue::Long(value) => Some(*value as Real),
            SampleValue::Double(value) => Some(*value),
            SampleValue::Text(_) => None,
        }
    }
}

impl From<Real> for SampleValue {
    fn from(value: Real) -> Self {
        SampleValue::Double(value)
    }
}

impl From<i64> for SampleValue {
    fn from(value: i64) -> Self {
        SampleValue::Long(value)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SampleRecord {
    pub timestamp: Timestamp,
    pub value: SampleValue,
}

impl SampleRecord {
    pub fn new(timestamp: Timestamp, value: impl Into<SampleValue>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }
}

fn default_group_type() -> String {
    GroupType::Number.to_string()
}

/// The samples of one range, in chronological order.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WindowRecord {
    pub name: String,
    /// Kept as text so that windows with unrecognised group types can be reported and skipped
    /// without failing the whole document.
    #[serde(default = "default_group_type")]
    pub group_type: String,
    /// End of the range, as decided by the producer. Carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_time: Option<Timestamp>,
    #[serde(default)]
    pub samples: Vec<SampleRecord>,
}

impl WindowRecord {
    pub fn group_type(&self) -> Result<GroupType, strum::ParseError> {
        self.group_type.parse()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct WindowSet {
    pub windows: Vec<WindowRecord>,
}
