use super::{
    Anomaly, AnomalyEffects, FloatRandomDistribution, IntRandomDistribution, NumConstant,
    TextConstant, utils::JsonValueError,
};
use rand::Rng;
use serde::Deserialize;
use tracing::instrument;
use trimmed_delta_common::{GroupType, SampleRecord, SampleValue, Timestamp, WindowRecord};

fn default_group_type() -> String {
    GroupType::Number.to_string()
}

fn default_repeat() -> NumConstant<usize> {
    NumConstant::Const(1)
}

fn default_start_time() -> NumConstant<Timestamp> {
    NumConstant::Const(0)
}

fn default_initial_value() -> NumConstant<f64> {
    NumConstant::Const(0.0)
}

/// Describes a monotonically increasing counter, and the anomalies which afflict it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct SeriesTemplate {
    pub(crate) name: TextConstant,
    /// Written to the window unchecked, so that non-numeric windows can be simulated.
    #[serde(default = "default_group_type")]
    pub(crate) group_type: String,
    /// Number of windows to generate from this template.
    #[serde(default = "default_repeat")]
    pub(crate) repeat: NumConstant<usize>,
    pub(crate) num_samples: NumConstant<usize>,
    #[serde(default = "default_start_time")]
    pub(crate) start_time: NumConstant<Timestamp>,
    /// Time between successive samples.
    pub(crate) interval: IntRandomDistribution<Timestamp>,
    #[serde(default = "default_initial_value")]
    pub(crate) initial_value: NumConstant<f64>,
    /// Amount the counter increases by between successive samples, negative draws count as zero.
    pub(crate) increment: FloatRandomDistribution<f64>,
    /// If set, values are rounded and written as longs.
    #[serde(default)]
    pub(crate) integer_values: bool,
    #[serde(default)]
    pub(crate) anomalies: Vec<Anomaly>,
}

impl SeriesTemplate {
    fn sample_record(&self, timestamp: Timestamp, value: f64) -> SampleRecord {
        let value = if self.integer_values {
            SampleValue::Long(value.round() as i64)
        } else {
            SampleValue::Double(value)
        };
        SampleRecord { timestamp, value }
    }

    /// Generates a window of samples from the template.
    /// # Parameters
    /// - name: the name of the window.
    /// - rng: the source of randomness, all draws for this window are taken from it.
    #[instrument(skip_all, level = "debug", fields(name = %name), err(level = "error"))]
    pub(crate) fn generate<R: Rng>(
        &self,
        name: String,
        rng: &mut R,
    ) -> Result<WindowRecord, JsonValueError> {
        let num_samples = self.num_samples.value()?;
        let mut time = self.start_time.value()?;
        let mut counter = self.initial_value.value()?;
        let anomalies = self
            .anomalies
            .iter()
            .map(Anomaly::resolve)
            .collect::<Result<Vec<_>, _>>()?;

        let mut samples = Vec::with_capacity(num_samples);
        for index in 0..num_samples {
            let effects = AnomalyEffects::sample(&anomalies, rng);
            if index > 0 {
                let interval = self.interval.sample(rng)?;
                let interval = effects
                    .interval_scale
                    .map_or(interval, |scale| (interval as f64 * scale) as Timestamp);
                time = time.saturating_add(interval);
                counter += self.increment.sample(rng)?.max(0.0);
            }
            if effects.reset {
                counter = 0.0;
            }
            let value = effects.value_scale.map_or(counter, |scale| counter * scale);
            samples.push(self.sample_record(time, value));
        }

        Ok(WindowRecord {
            name,
            group_type: self.group_type.clone(),
            return_time: samples.last().map(|sample| sample.timestamp),
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn template(json: &str) -> SeriesTemplate {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn steady_counter() {
        let template = template(
            r#"{
                "name": { "text": "requests" },
                "num-samples": { "const": 4 },
                "start-time": { "const": 1000 },
                "interval": { "random-type": "constant-int", "value": { "const": 10 } },
                "initial-value": { "const": 5 },
                "increment": { "random-type": "constant-float", "value": { "const": 2.5 } }
            }"#,
        );
        let window = template
            .generate("requests".to_owned(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(
            window,
            WindowRecord {
                name: "requests".to_owned(),
                group_type: "number".to_owned(),
                return_time: Some(1030),
                samples: vec![
                    SampleRecord::new(1000, 5.0),
                    SampleRecord::new(1010, 7.5),
                    SampleRecord::new(1020, 10.0),
                    SampleRecord::new(1030, 12.5),
                ],
            }
        );
    }

    #[test]
    fn integer_values() {
        let template = template(
            r#"{
                "name": { "text": "bytes" },
                "num-samples": { "const": 3 },
                "interval": { "random-type": "constant-int", "value": { "const": 1 } },
                "increment": { "random-type": "constant-float", "value": { "const": 1.6 } },
                "integer-values": true
            }"#,
        );
        let window = template
            .generate("bytes".to_owned(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(
            window.samples,
            vec![
                SampleRecord::new(0, 0_i64),
                SampleRecord::new(1, 2_i64),
                SampleRecord::new(2, 3_i64),
            ]
        );
    }

    #[test]
    fn counter_keeps_rising_after_spike() {
        let template = template(
            r#"{
                "name": { "text": "spiky" },
                "num-samples": { "const": 3 },
                "interval": { "random-type": "constant-int", "value": { "const": 10 } },
                "increment": { "random-type": "constant-float", "value": { "const": 1 } },
                "anomalies": [
                    { "anomaly-type": "spike", "probability": { "const": 1 }, "scale": { "const": 100 } }
                ]
            }"#,
        );
        let window = template
            .generate("spiky".to_owned(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(
            window.samples,
            vec![
                SampleRecord::new(0, 0.0),
                SampleRecord::new(10, 100.0),
                SampleRecord::new(20, 200.0),
            ]
        );
    }

    #[test]
    fn resets_and_gaps() {
        let template = template(
            r#"{
                "name": { "text": "restarts" },
                "num-samples": { "const": 3 },
                "interval": { "random-type": "constant-int", "value": { "const": 10 } },
                "increment": { "random-type": "constant-float", "value": { "const": 1 } },
                "anomalies": [
                    { "anomaly-type": "reset", "probability": { "const": 1 } },
                    { "anomaly-type": "gap", "probability": { "const": 1 }, "scale": { "const": 6 } }
                ]
            }"#,
        );
        let window = template
            .generate("restarts".to_owned(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(
            window.samples,
            vec![
                SampleRecord::new(0, 0.0),
                SampleRecord::new(60, 0.0),
                SampleRecord::new(120, 0.0),
            ]
        );
        assert_eq!(window.return_time, Some(120));
    }

    #[test]
    fn same_seed_same_window() {
        let template = template(
            r#"{
                "name": { "text": "noisy" },
                "num-samples": { "const": 50 },
                "interval": { "random-type": "uniform-int", "min": { "const": 9 }, "max": { "const": 12 } },
                "increment": { "random-type": "normal", "mean": { "const": 5 }, "sd": { "const": 2 } },
                "anomalies": [
                    { "anomaly-type": "reset", "probability": { "const": 0.05 } }
                ]
            }"#,
        );
        let first = template
            .generate("noisy".to_owned(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        let second = template
            .generate("noisy".to_owned(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.samples.len(), 50);
        assert!(
            first
                .samples
                .windows(2)
                .all(|pair| pair[0].timestamp < pair[1].timestamp)
        );
    }

    #[test]
    fn invalid_anomaly_fails_before_sampling() {
        let template = template(
            r#"{
                "name": { "text": "empty" },
                "num-samples": { "const": 0 },
                "interval": { "random-type": "constant-int", "value": { "const": 1 } },
                "increment": { "random-type": "constant-float", "value": { "const": 1 } },
                "anomalies": [
                    { "anomaly-type": "spike", "probability": { "const": 2 }, "scale": { "const": 10 } }
                ]
            }"#,
        );
        assert!(matches!(
            template.generate("empty".to_owned(), &mut StdRng::seed_from_u64(0)),
            Err(JsonValueError::Probability(probability)) if probability == 2.0
        ));
    }
}
