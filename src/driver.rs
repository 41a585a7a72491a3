//! Drives the evolutionary engine across generations in offline (fixture,
//! run-to-convergence) and online (contest, turn-by-turn) modes (ยง4.H).

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::decoder::decide;
use crate::fitness;
use crate::genetic::Engine;
use crate::map::Terrain;
use crate::parameters::Parameters;
use crate::physics::{Simulator, TerminalStatus, Trajectory};
use crate::random::RandomSource;
use crate::state::{Decision, Individual, SimulationState};
use crate::time_budget::TimeBudget;
use crate::worker_pool::WorkerPool;

/// How many times a tainted generation is re-run before the driver gives up
/// on it entirely (ยง7 "worker task panic").
const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// The outcome of running the offline driver to a stopping point.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub generation_index: u32,
    pub best_individual: Individual,
    pub best_trajectory: Trajectory,
    pub best_score: f64,
}

/// The last completed generation's results, readable concurrently with the
/// driver loop (ยง5: `current_generation`, `current_generation_results`,
/// `current_generation_name`, `params`, all guarded by a single mutex).
#[derive(Debug, Clone)]
pub struct GenerationSnapshot {
    pub generation_index: u32,
    pub results: Vec<(Trajectory, f64)>,
    pub params: Parameters,
}

pub struct Driver {
    terrain: Arc<Terrain>,
    initial: SimulationState,
    engine: Engine,
    params: Parameters,
    pool: WorkerPool,
    population: Vec<Individual>,
    source: RandomSource,
    generation_counter: u32,
    snapshot: Arc<Mutex<GenerationSnapshot>>,
}

impl Driver {
    /// `seed` pins the RNG for reproducible runs; `None` draws from OS
    /// entropy, matching the original's real-entropy default (ยง4.B).
    pub fn new(terrain: Terrain, initial: SimulationState, params: Parameters, seed: Option<u64>) -> Self {
        let source = match seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        let engine = Engine::new(params.population_size);
        let population = engine.seed_initial_generation(&source);
        let snapshot = Arc::new(Mutex::new(GenerationSnapshot {
            generation_index: 0,
            results: Vec::new(),
            params,
        }));
        Self {
            terrain: Arc::new(terrain),
            initial,
            engine,
            params,
            pool: WorkerPool::with_default_size(),
            population,
            source,
            generation_counter: 0,
            snapshot,
        }
    }

    /// Snapshot of the last completed generation, safe to poll from another
    /// thread while the driver loop keeps running.
    pub fn snapshot(&self) -> GenerationSnapshot {
        self.snapshot.lock().clone()
    }

    /// Offline mode: runs `next_generation` until a `Landed` individual
    /// appears or `generation_cap` is reached (if set).
    pub fn run_offline(&mut self, generation_cap: Option<u32>) -> GenerationSummary {
        loop {
            let (trajectories, scores) = self.evaluate_generation();
            let best = best_index(&scores);

            let landed = trajectories[best].status == TerminalStatus::Landed;
            let capped = generation_cap.is_some_and(|cap| self.generation_counter >= cap);
            if landed || capped {
                return GenerationSummary {
                    generation_index: self.generation_counter,
                    best_individual: self.population[best].clone(),
                    best_trajectory: trajectories[best].clone(),
                    best_score: scores[best],
                };
            }

            self.population =
                self.engine
                    .next_generation(&self.population, &scores, &self.params, &self.source);
        }
    }

    /// Online mode: spends up to `budget` evolving the population starting
    /// from `state`, then emits the decoded decision of the best
    /// individual's head gene and left-shifts it to stay aligned with the
    /// next turn.
    pub fn run_online_turn(&mut self, state: SimulationState, budget: Duration) -> Decision {
        self.initial = state;
        let mut time_budget = TimeBudget::new(budget);

        let mut best = 0;
        loop {
            let started = Instant::now();
            let (trajectories, scores) = self.evaluate_generation();
            time_budget.record(started.elapsed());
            best = best_index(&scores);

            if trajectories[best].status == TerminalStatus::Landed {
                break;
            }
            if time_budget.should_stop() {
                eprintln!(
                    "online turn returning early after {} generation(s): total {:?} + average {:?} would exceed the {:?} budget",
                    time_budget.generations(),
                    time_budget.total(),
                    time_budget.average(),
                    budget
                );
                break;
            }
            self.population =
                self.engine
                    .next_generation(&self.population, &scores, &self.params, &self.source);
        }

        let mut winner = self.population[best].clone();
        let decision = decide(&state, winner.gene(0), self.terrain.pad());
        winner.shift_left();
        self.population[best] = winner;
        decision
    }

    /// Runs one generation's episodes across the worker pool, retrying a
    /// tainted generation (a worker task panicked) up to
    /// `MAX_GENERATION_ATTEMPTS` times before giving up, and publishes the
    /// result to `snapshot` for concurrent readers.
    fn evaluate_generation(&mut self) -> (Vec<Trajectory>, Vec<f64>) {
        self.generation_counter += 1;

        let mut attempt = 1;
        let (trajectories, scores) = loop {
            match self.run_generation_tasks() {
                Ok(result) => break result,
                Err(reason) if attempt < MAX_GENERATION_ATTEMPTS => {
                    eprintln!(
                        "generation {} tainted by a worker panic ({reason}), retrying (attempt {}/{MAX_GENERATION_ATTEMPTS})",
                        self.generation_counter,
                        attempt + 1
                    );
                    attempt += 1;
                }
                Err(reason) => {
                    panic!(
                        "generation {} failed {MAX_GENERATION_ATTEMPTS} times in a row, aborting: {reason}",
                        self.generation_counter
                    );
                }
            }
        };

        let mut snapshot = self.snapshot.lock();
        snapshot.generation_index = self.generation_counter;
        snapshot.results = trajectories
            .iter()
            .cloned()
            .zip(scores.iter().copied())
            .collect();
        snapshot.params = self.params;
        drop(snapshot);

        (trajectories, scores)
    }

    fn run_generation_tasks(&self) -> Result<(Vec<Trajectory>, Vec<f64>), String> {
        let receivers: Vec<_> = self
            .population
            .iter()
            .map(|individual| {
                let terrain = self.terrain.clone();
                let initial = self.initial;
                let individual = individual.clone();
                let weights = self.params.fitness_weights;
                self.pool.submit(move || {
                    let simulator = Simulator::new(&terrain);
                    let trajectory = simulator.run_episode(initial, &individual);
                    let score = fitness::score(&trajectory, terrain.pad(), weights);
                    (trajectory, score)
                })
            })
            .collect();

        let mut trajectories = Vec::with_capacity(receivers.len());
        let mut scores = Vec::with_capacity(receivers.len());
        for rx in receivers {
            match rx.recv() {
                Ok(Ok((trajectory, score))) => {
                    trajectories.push(trajectory);
                    scores.push(score);
                }
                Ok(Err(panic_payload)) => return Err(panic_message(&panic_payload)),
                Err(_) => return Err("worker dropped its result sender without replying".to_string()),
            }
        }
        Ok((trajectories, scores))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn best_index(scores: &[f64]) -> usize {
    scores
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.partial_cmp(b).unwrap().then(ib.cmp(ia)))
        .map(|(index, _)| index)
        .expect("generation is never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn flat_terrain() -> Terrain {
        Terrain::new(vec![
            Point::new(0.0, 600.0),
            Point::new(1000.0, 100.0),
            Point::new(6000.0, 100.0),
            Point::new(7000.0, 600.0),
        ])
        .unwrap()
    }

    #[test]
    fn offline_mode_stops_at_the_generation_cap() {
        let terrain = flat_terrain();
        let initial = SimulationState::new(Point::new(3500.0, 2900.0), Point::new(0.0, 0.0), 500.0, 0.0, 0.0);
        let mut params = Parameters::default();
        params.population_size = 10;
        let mut driver = Driver::new(terrain, initial, params, Some(1));

        let summary = driver.run_offline(Some(2));
        assert!(summary.generation_index <= 2);
    }

    #[test]
    fn online_turn_returns_a_decision_within_range() {
        let terrain = flat_terrain();
        let initial = SimulationState::new(Point::new(3500.0, 2900.0), Point::new(0.0, 0.0), 500.0, 0.0, 0.0);
        let mut params = Parameters::default();
        params.population_size = 10;
        let mut driver = Driver::new(terrain, initial, params, Some(2));

        let decision = driver.run_online_turn(initial, Duration::from_millis(20));
        assert!((-90..=90).contains(&decision.rotate));
        assert!((0..=4).contains(&decision.power));
    }

    #[test]
    fn snapshot_reflects_the_last_completed_generation() {
        let terrain = flat_terrain();
        let initial = SimulationState::new(Point::new(3500.0, 2900.0), Point::new(0.0, 0.0), 500.0, 0.0, 0.0);
        let mut params = Parameters::default();
        params.population_size = 10;
        let mut driver = Driver::new(terrain, initial, params, Some(3));

        assert_eq!(driver.snapshot().generation_index, 0);
        let summary = driver.run_offline(Some(2));
        let snapshot = driver.snapshot();
        assert_eq!(snapshot.generation_index, summary.generation_index);
        assert_eq!(snapshot.results.len(), 10);
    }
}
