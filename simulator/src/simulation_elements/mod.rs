pub(crate) mod anomalies;
pub(crate) mod series;
pub(crate) mod utils;

pub(crate) use anomalies::{Anomaly, AnomalyEffects};
pub(crate) use series::SeriesTemplate;
pub(crate) use utils::{FloatRandomDistribution, IntRandomDistribution, NumConstant, TextConstant};
