//! Evolutionary-engine tuning knobs, persisted as `ga_params.ini` (ยง10.3).
//!
//! The format is positional text, one value per line in a fixed order --
//! not key-value -- so this loads it directly with `str::parse` rather
//! than pulling in a config crate.

use std::path::Path;

use anyhow::{Context, bail};

use crate::constants::DEFAULT_POPULATION_SIZE;
use crate::fitness::Weights;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub mutation_rate: f64,
    pub elitism_rate: f64,
    pub population_size: usize,
    pub fitness_weights: Weights,
    pub elite_multiplier: f64,
    pub stdev_threshold: f64,
    pub generation_cap: Option<u32>,
    pub keep_running_after_solution: bool,
    pub keep_running_after_max: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            mutation_rate: 0.02,
            elitism_rate: 0.14,
            population_size: DEFAULT_POPULATION_SIZE,
            fitness_weights: Weights {
                fuel: 0.1,
                vertical_speed: 1.0,
                horizontal_speed: 0.98,
                distance: 1.0,
                rotation: 0.1,
            },
            elite_multiplier: 5.0,
            stdev_threshold: 0.1,
            generation_cap: None,
            keep_running_after_solution: false,
            keep_running_after_max: false,
        }
    }
}

/// Field order written and read in `ga_params.ini`, one value per line.
const FIELD_ORDER: &[&str] = &[
    "generation_cap",
    "keep_running_after_solution",
    "keep_running_after_max",
    "population_size",
    "mutation_rate",
    "elitism_rate",
    "fuel_weight",
    "distance_weight",
    "vertical_speed_weight",
    "horizontal_speed_weight",
    "rotation_weight",
    "elite_multiplier",
    "stdev_threshold",
];

impl Parameters {
    /// Loads `ga_params.ini` from `path`. A missing file is not an error:
    /// defaults are returned with a stderr notice, matching the original
    /// tool's direct-read config style.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                eprintln!(
                    "ga_params.ini not found at {}, using defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
        };
        Self::parse(&contents).with_context(|| format!("malformed {}", path.display()))
    }

    fn parse(contents: &str) -> anyhow::Result<Self> {
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty());

        let mut next = |label: &str| -> anyhow::Result<String> {
            lines
                .next()
                .map(str::trim)
                .map(str::to_owned)
                .with_context(|| format!("missing {label} in ga_params.ini"))
        };

        let parse_f64 = |label: &str, raw: &str| -> anyhow::Result<f64> {
            raw.parse::<f64>()
                .with_context(|| format!("invalid {label} value: {raw:?}"))
        };

        let generation_cap_raw = next("generation_cap")?;
        let generation_cap = if generation_cap_raw.is_empty() || generation_cap_raw == "none" {
            None
        } else {
            Some(
                generation_cap_raw
                    .parse::<u32>()
                    .context("invalid generation_cap value")?,
            )
        };
        let keep_running_after_solution =
            parse_bool("keep_running_after_solution", &next("keep_running_after_solution")?)?;
        let keep_running_after_max =
            parse_bool("keep_running_after_max", &next("keep_running_after_max")?)?;

        let population_size: usize = next("population_size")?
            .parse()
            .context("invalid population_size value")?;
        let mutation_rate = parse_f64("mutation_rate", &next("mutation_rate")?)?;
        let elitism_rate = parse_f64("elitism_rate", &next("elitism_rate")?)?;
        let fuel = parse_f64("fuel_weight", &next("fuel_weight")?)?;
        let distance = parse_f64("distance_weight", &next("distance_weight")?)?;
        let vertical_speed = parse_f64("vertical_speed_weight", &next("vertical_speed_weight")?)?;
        let horizontal_speed =
            parse_f64("horizontal_speed_weight", &next("horizontal_speed_weight")?)?;
        let rotation = parse_f64("rotation_weight", &next("rotation_weight")?)?;
        let elite_multiplier = parse_f64("elite_multiplier", &next("elite_multiplier")?)?;
        let stdev_threshold = parse_f64("stdev_threshold", &next("stdev_threshold")?)?;

        Ok(Self {
            mutation_rate,
            elitism_rate,
            population_size,
            fitness_weights: Weights {
                fuel,
                vertical_speed,
                horizontal_speed,
                distance,
                rotation,
            },
            elite_multiplier,
            stdev_threshold,
            generation_cap,
            keep_running_after_solution,
            keep_running_after_max,
        })
    }

    /// Writes this configuration back out in the same field order it was
    /// read in.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let cap = match self.generation_cap {
            Some(n) => n.to_string(),
            None => "none".to_string(),
        };
        let lines = [
            cap,
            self.keep_running_after_solution.to_string(),
            self.keep_running_after_max.to_string(),
            self.population_size.to_string(),
            self.mutation_rate.to_string(),
            self.elitism_rate.to_string(),
            self.fitness_weights.fuel.to_string(),
            self.fitness_weights.distance.to_string(),
            self.fitness_weights.vertical_speed.to_string(),
            self.fitness_weights.horizontal_speed.to_string(),
            self.fitness_weights.rotation.to_string(),
            self.elite_multiplier.to_string(),
            self.stdev_threshold.to_string(),
        ];
        debug_assert_eq!(lines.len(), FIELD_ORDER.len());
        std::fs::write(path, lines.join("\n") + "\n")
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

fn parse_bool(label: &str, raw: &str) -> anyhow::Result<bool> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => bail!("invalid {label} value: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_hardcoded_constants() {
        let p = Parameters::default();
        assert_eq!(p.mutation_rate, 0.02);
        assert_eq!(p.elitism_rate, 0.14);
        assert_eq!(p.population_size, 50);
        assert_eq!(p.elite_multiplier, 5.0);
        assert_eq!(p.generation_cap, None);
        assert!(!p.keep_running_after_solution);
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = std::env::temp_dir().join(format!(
            "lander-params-test-{:?}",
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ga_params.ini");

        let mut params = Parameters::default();
        params.generation_cap = Some(500);
        params.keep_running_after_max = true;
        params.save(&path).unwrap();

        let loaded = Parameters::load(&path).unwrap();
        assert_eq!(loaded, params);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = Parameters::load("/nonexistent/ga_params.ini").unwrap();
        assert_eq!(loaded, Parameters::default());
    }
}
