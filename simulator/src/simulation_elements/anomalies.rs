use super::{NumConstant, utils::JsonValueError};
use rand::Rng;
use serde::Deserialize;

/// A fault which may randomly afflict any sample of a simulated counter.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "anomaly-type")]
pub(crate) enum Anomaly {
    /// The counter drops to zero, as when the process owning it restarts.
    Reset { probability: NumConstant<f64> },
    /// The sample's value is multiplied by `scale`, the counter itself is unaffected.
    Spike {
        probability: NumConstant<f64>,
        scale: NumConstant<f64>,
    },
    /// The interval preceding the sample is multiplied by `scale`.
    Gap {
        probability: NumConstant<f64>,
        scale: NumConstant<f64>,
    },
}

/// An [Anomaly] whose constants have been resolved, ready to be sampled repeatedly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ActiveAnomaly {
    probability: f64,
    effect: Effect,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Effect {
    Reset,
    ScaleValue(f64),
    ScaleInterval(f64),
}

/// The combined effect of all anomalies occurring at one sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct AnomalyEffects {
    pub(crate) reset: bool,
    pub(crate) value_scale: Option<f64>,
    pub(crate) interval_scale: Option<f64>,
}

impl AnomalyEffects {
    /// Samples every anomaly in turn, and combines those which occur.
    pub(crate) fn sample<R: Rng>(anomalies: &[ActiveAnomaly], rng: &mut R) -> Self {
        anomalies
            .iter()
            .filter(|anomaly| rng.random_bool(anomaly.probability))
            .fold(Self::default(), |mut effects, anomaly| {
                match anomaly.effect {
                    Effect::Reset => effects.reset = true,
                    Effect::ScaleValue(scale) => {
                        effects.value_scale = combine(effects.value_scale, scale)
                    }
                    Effect::ScaleInterval(scale) => {
                        effects.interval_scale = combine(effects.interval_scale, scale)
                    }
                }
                effects
            })
    }
}

fn combine(scale: Option<f64>, factor: f64) -> Option<f64> {
    Some(scale.unwrap_or(1.0) * factor)
}

impl Anomaly {
    /// Resolves the anomaly's constants, and checks its probability.
    pub(crate) fn resolve(&self) -> Result<ActiveAnomaly, JsonValueError> {
        let (probability, effect) = match self {
            Self::Reset { probability } => (probability, Effect::Reset),
            Self::Spike { probability, scale } => (probability, Effect::ScaleValue(scale.value()?)),
            Self::Gap { probability, scale } => {
                (probability, Effect::ScaleInterval(scale.value()?))
            }
        };
        let probability = probability.value()?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(JsonValueError::Probability(probability));
        }
        Ok(ActiveAnomaly {
            probability,
            effect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn anomalies(json: &str) -> Vec<ActiveAnomaly> {
        serde_json::from_str::<Vec<Anomaly>>(json)
            .unwrap()
            .iter()
            .map(Anomaly::resolve)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn certain_anomalies_always_occur() {
        let anomalies = anomalies(
            r#"[
                { "anomaly-type": "reset", "probability": { "const": 1 } },
                { "anomaly-type": "spike", "probability": { "const": 1 }, "scale": { "const": 10 } },
                { "anomaly-type": "gap", "probability": { "const": 1 }, "scale": { "const": 5 } },
                { "anomaly-type": "gap", "probability": { "const": 1 }, "scale": { "const": 2 } }
            ]"#,
        );
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            AnomalyEffects::sample(&anomalies, &mut rng),
            AnomalyEffects {
                reset: true,
                value_scale: Some(10.0),
                interval_scale: Some(10.0),
            }
        );
    }

    #[test]
    fn impossible_anomalies_never_occur() {
        let anomalies = anomalies(
            r#"[
                { "anomaly-type": "reset", "probability": { "const": 0 } },
                { "anomaly-type": "spike", "probability": { "const": 0 }, "scale": { "const": 10 } }
            ]"#,
        );
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(
                AnomalyEffects::sample(&anomalies, &mut rng),
                AnomalyEffects::default()
            );
        }
    }

    #[test]
    fn invalid_probability() {
        let anomaly: Anomaly = serde_json::from_str(
            r#"{ "anomaly-type": "reset", "probability": { "const": 1.5 } }"#,
        )
        .unwrap();
        assert!(matches!(
            anomaly.resolve(),
            Err(JsonValueError::Probability(probability)) if probability == 1.5
        ));
    }

    #[test]
    fn resolved_constants() {
        let anomaly: Anomaly = serde_json::from_str(
            r#"{ "anomaly-type": "spike", "probability": { "const": 0.25 }, "scale": { "const": 8 } }"#,
        )
        .unwrap();
        assert_eq!(
            anomaly.resolve().unwrap(),
            ActiveAnomaly {
                probability: 0.25,
                effect: Effect::ScaleValue(8.0),
            }
        );
    }

    #[test]
    fn missing_scale_variable() {
        let anomaly = Anomaly::Gap {
            probability: NumConstant::Const(0.5),
            scale: NumConstant::FromEnvVar("TRIMMED_DELTA_SIMULATOR_UNSET_SCALE".to_owned()),
        };
        assert!(matches!(anomaly.resolve(), Err(JsonValueError::EnvVar(_))));
    }
}
