use crate::simulation_elements::{NumConstant, SeriesTemplate, utils::JsonValueError};
use rand::{SeedableRng, rngs::StdRng};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use serde::Deserialize;
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{Span, info, instrument};
use trimmed_delta_common::WindowSet;

///
/// This struct is created from the configuration JSON file.
///
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Simulation {
    // Base seed, each generated window is seeded from this plus its index
    #[serde(default)]
    pub(crate) seed: Option<NumConstant<u64>>,
    pub(crate) series: Vec<SeriesTemplate>,
}

#[derive(Debug, Error)]
pub(crate) enum SimulationError {
    #[error("Json Value error: {0}")]
    JsonValue(#[from] JsonValueError),
    #[error("Cannot open {0}: {1}")]
    Open(PathBuf, io::Error),
    #[error("Invalid simulation config: {0}")]
    Config(#[from] serde_json::Error),
}

/// A single window to be generated.
struct Job<'a> {
    name: String,
    template: &'a SeriesTemplate,
}

impl Simulation {
    pub(crate) fn load(path: &Path) -> Result<Self, SimulationError> {
        let file = File::open(path).map_err(|e| SimulationError::Open(path.to_owned(), e))?;
        Ok(serde_json::from_reader(io::BufReader::new(file))?)
    }

    /// The seed given in the configuration, if any.
    pub(crate) fn seed(&self) -> Result<Option<u64>, SimulationError> {
        Ok(self.seed.as_ref().map(NumConstant::value).transpose()?)
    }

    /// Expands each template into one job per repeat, in configuration order.
    fn jobs(&self) -> Result<Vec<Job<'_>>, SimulationError> {
        let mut jobs = Vec::new();
        for template in &self.series {
            let name = template.name.value()?;
            let repeat = template.repeat.value()?;
            if repeat == 1 {
                jobs.push(Job { name, template });
            } else {
                jobs.extend((0..repeat).map(|index| Job {
                    name: format!("{name}-{index}"),
                    template,
                }));
            }
        }
        Ok(jobs)
    }

    #[instrument(skip_all, fields(seed = seed, num_windows))]
    pub(crate) fn generate(&self, seed: u64) -> Result<WindowSet, SimulationError> {
        let jobs = self.jobs()?;
        Span::current().record("num_windows", jobs.len());

        let parent = Span::current();
        let windows = jobs
            .into_par_iter()
            .enumerate()
            .map(|(index, job)| {
                parent.in_scope(|| {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                    job.template.generate(job.name, &mut rng)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Generated {} windows", windows.len());
        Ok(WindowSet { windows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "seed": { "const": 42 },
        "series": [
            {
                "name": { "text": "requests" },
                "num-samples": { "const": 20 },
                "start-time": { "const": 1000 },
                "interval": { "random-type": "uniform-int", "min": { "const": 9 }, "max": { "const": 12 } },
                "increment": { "random-type": "exponential", "lifetime": { "const": 3 } },
                "integer-values": true,
                "anomalies": [
                    { "anomaly-type": "reset", "probability": { "const": 0.1 } }
                ]
            },
            {
                "name": { "text": "latency" },
                "repeat": { "const": 3 },
                "num-samples": { "const": 5 },
                "interval": { "random-type": "constant-int", "value": { "const": 60 } },
                "increment": { "random-type": "uniform-float", "min": { "const": 0 }, "max": { "const": 1 } }
            },
            {
                "name": { "text": "log" },
                "group-type": "text",
                "num-samples": { "const": 2 },
                "interval": { "random-type": "constant-int", "value": { "const": 1 } },
                "increment": { "random-type": "constant-float", "value": { "const": 1 } }
            }
        ]
    }"#;

    fn simulation() -> Simulation {
        serde_json::from_str(CONFIG).unwrap()
    }

    #[test]
    fn parse_config() {
        let simulation = simulation();
        assert_eq!(simulation.seed().unwrap(), Some(42));
        assert_eq!(simulation.series.len(), 3);
    }

    #[test]
    fn seed_is_optional() {
        let simulation: Simulation = serde_json::from_str(r#"{ "series": [] }"#).unwrap();
        assert_eq!(simulation.seed().unwrap(), None);
        assert!(simulation.generate(0).unwrap().windows.is_empty());
    }

    #[test]
    fn repeated_series_are_numbered() {
        let set = simulation().generate(42).unwrap();
        let names = set
            .windows
            .iter()
            .map(|window| window.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["requests", "latency-0", "latency-1", "latency-2", "log"]
        );
    }

    #[test]
    fn window_contents() {
        let set = simulation().generate(42).unwrap();
        let lengths = set
            .windows
            .iter()
            .map(|window| window.samples.len())
            .collect::<Vec<_>>();
        assert_eq!(lengths, vec![20, 5, 5, 5, 2]);

        let group_types = set
            .windows
            .iter()
            .map(|window| window.group_type.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            group_types,
            vec!["number", "number", "number", "number", "text"]
        );
        assert!(
            set.windows
                .iter()
                .all(|window| window.return_time
                    == window.samples.last().map(|sample| sample.timestamp))
        );
    }

    #[test]
    fn same_seed_same_set() {
        let simulation = simulation();
        assert_eq!(
            simulation.generate(42).unwrap(),
            simulation.generate(42).unwrap()
        );
    }

    #[test]
    fn invalid_template_fails() {
        let simulation: Simulation = serde_json::from_str(
            r#"{
                "series": [{
                    "name": { "text": "broken" },
                    "num-samples": { "const": 3 },
                    "interval": { "random-type": "uniform-int", "min": { "const": 5 }, "max": { "const": 5 } },
                    "increment": { "random-type": "constant-float", "value": { "const": 1 } }
                }]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            simulation.generate(0),
            Err(SimulationError::JsonValue(JsonValueError::EmptyRange))
        ));
    }

    #[test]
    fn missing_config_file() {
        assert!(matches!(
            Simulation::load(Path::new("/nonexistent/simulation.json")),
            Err(SimulationError::Open(..))
        ));
    }
}
