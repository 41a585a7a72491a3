//! The deterministic physics simulator (ยง4.D): advances one tick at a
//! time, detects ground crossings, and classifies the terminal outcome of
//! a full episode.

use bitflags::bitflags;

use crate::constants::{
    GRAVITY, MAX_HSPEED, MAX_POWER, MAX_POWER_RATE, MAX_TURN_RATE, MAX_VSPEED, WORLD_HEIGHT,
    WORLD_WIDTH,
};
use crate::decoder::decide;
use crate::geometry::{Segment, distance_squared_to_segment, intersection};
use crate::map::Terrain;
use crate::state::{Decision, Individual, SimulationState, clamp_power, clamp_rotation};

/// How a terminated episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    /// The episode is still running; never appears on a finished
    /// [`Trajectory`].
    Running,
    Landed,
    CrashedOffPad,
    CrashedOnPad,
    Lost,
}

bitflags! {
    /// Reasons a touchdown failed to qualify as a clean landing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CrashReason: u8 {
        const UNEVEN_GROUND     = 0b0001;
        const NON_ZERO_ROTATION = 0b0010;
        const VERTICAL_TOO_FAST = 0b0100;
        const HORIZONTAL_TOO_FAST = 0b1000;
    }
}

/// The full per-tick record of one episode: states, the decisions that
/// produced each transition, and the terminal classification.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub states: Vec<SimulationState>,
    pub decisions: Vec<Decision>,
    pub status: TerminalStatus,
    pub crash_reason: CrashReason,
}

impl Trajectory {
    pub fn last(&self) -> &SimulationState {
        self.states.last().expect("trajectory always has >= 1 state")
    }
}

/// Points on the ground close enough to count as "already touching",
/// matching contest-integer precision.
const TOUCH_EPSILON_SQ: f64 = 1e-6;

enum TickOutcome {
    Continue,
    Terminal(TerminalStatus, CrashReason),
}

pub struct Simulator<'a> {
    terrain: &'a Terrain,
}

impl<'a> Simulator<'a> {
    pub fn new(terrain: &'a Terrain) -> Self {
        Self { terrain }
    }

    /// Runs a full episode, decoding `individual`'s genes turn by turn
    /// until the episode terminates or the gene sequence is exhausted
    /// (treated as a runaway: `CrashedOffPad` with an empty reason, ยง7).
    pub fn run_episode(&self, initial: SimulationState, individual: &Individual) -> Trajectory {
        let mut states = vec![initial];
        let mut decisions = Vec::new();

        // Boundary behavior: a ship initialized already resting on the
        // ground lands (or crashes) on tick 0, before any gene is decoded.
        // Ordinary swept-segment detection can't see this because the
        // tick-0 motion segment would be degenerate for a stationary ship.
        if let Some((status, reason)) = self.resting_outcome(&initial) {
            return Trajectory {
                states,
                decisions,
                status,
                crash_reason: reason,
            };
        }

        let mut current = initial;
        let status;
        let crash_reason;
        let mut gene_index = 0;
        loop {
            if gene_index >= individual.len() {
                status = TerminalStatus::CrashedOffPad;
                crash_reason = CrashReason::empty();
                break;
            }
            let gene = individual.gene(gene_index);
            let decision = decide(&current, gene, self.terrain.pad());
            decisions.push(decision);

            let (next, outcome) = self.tick(current, decision);
            states.push(next);
            current = next;
            gene_index += 1;

            match outcome {
                TickOutcome::Continue => continue,
                TickOutcome::Terminal(s, r) => {
                    status = s;
                    crash_reason = r;
                    break;
                }
            }
        }

        Trajectory {
            states,
            decisions,
            status,
            crash_reason,
        }
    }

    /// Advances one tick from `state` under `decision`. Applies the action
    /// clamp and slew caps, integrates, then checks world bounds and
    /// ground intersection in that order.
    fn tick(&self, state: SimulationState, decision: Decision) -> (SimulationState, TickOutcome) {
        let r_target = clamp_rotation(decision.rotate as f64);
        let p_target = clamp_power(decision.power as f64, state.fuel);

        let mut power = state.power;
        if (p_target - power).abs() > MAX_POWER_RATE {
            power += (p_target - power).signum() * MAX_POWER_RATE;
        } else {
            power = p_target;
        }

        let mut rotate = state.rotate;
        if (r_target - rotate).abs() > MAX_TURN_RATE {
            rotate += (r_target - rotate).signum() * MAX_TURN_RATE;
        } else {
            rotate = r_target;
        }

        // Re-clamp power against fuel after slewing, and keep it within
        // [0, MAX_POWER] regardless of the slew direction.
        power = power.clamp(0.0, MAX_POWER.min(state.fuel));

        let theta = rotate.to_radians();
        let new_fuel = state.fuel - power;
        let new_velocity_x = state.velocity.x - power * theta.sin();
        let new_velocity_y = state.velocity.y + power * theta.cos() - GRAVITY;
        // Position uses the PRE-integration velocity; this matches the
        // contest's reference discretization and must not be reordered.
        let new_position = state.position + state.velocity;

        let mut next = SimulationState::new(
            new_position,
            crate::geometry::Point::new(new_velocity_x, new_velocity_y),
            new_fuel,
            rotate,
            power,
        );

        if next.position.x < 0.0
            || next.position.x > WORLD_WIDTH
            || next.position.y < 0.0
            || next.position.y > WORLD_HEIGHT
        {
            return (next, TickOutcome::Terminal(TerminalStatus::Lost, CrashReason::empty()));
        }

        if next.position.y <= self.terrain.y_cutoff() {
            let motion = Segment::new(state.position, next.position);
            for (index, ground) in self.terrain.segments().enumerate() {
                if let Some(point) = intersection(&motion, &ground) {
                    next.position = point;
                    let (status, reason) = self.classify_touchdown(index, &next);
                    return (next, TickOutcome::Terminal(status, reason));
                }
            }
        }

        (next, TickOutcome::Continue)
    }

    /// Classifies a stationary start position that already touches the
    /// ground, for the tick-0 boundary case.
    fn resting_outcome(&self, state: &SimulationState) -> Option<(TerminalStatus, CrashReason)> {
        for (index, segment) in self.terrain.segments().enumerate() {
            if distance_squared_to_segment(&segment, state.position) < TOUCH_EPSILON_SQ {
                return Some(self.classify_touchdown(index, state));
            }
        }
        None
    }

    fn classify_touchdown(
        &self,
        segment_index: usize,
        state: &SimulationState,
    ) -> (TerminalStatus, CrashReason) {
        let is_pad = segment_index == self.terrain.pad_index();

        let mut reason = CrashReason::empty();
        if !is_pad {
            reason |= CrashReason::UNEVEN_GROUND;
        }
        if state.rotate != 0.0 {
            reason |= CrashReason::NON_ZERO_ROTATION;
        }
        if state.velocity.y.abs() > MAX_VSPEED {
            reason |= CrashReason::VERTICAL_TOO_FAST;
        }
        if state.velocity.x.abs() > MAX_HSPEED {
            reason |= CrashReason::HORIZONTAL_TOO_FAST;
        }

        let status = if reason.is_empty() && is_pad {
            TerminalStatus::Landed
        } else if is_pad {
            TerminalStatus::CrashedOnPad
        } else {
            TerminalStatus::CrashedOffPad
        };
        (status, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::state::Gene;

    fn flat_terrain() -> Terrain {
        Terrain::new(vec![
            Point::new(0.0, 600.0),
            Point::new(1000.0, 100.0),
            Point::new(6000.0, 100.0),
            Point::new(7000.0, 600.0),
        ])
        .unwrap()
    }

    fn individual_of(r: f64, p: f64) -> Individual {
        Individual::constant(r, p)
    }

    #[test]
    fn resting_on_pad_lands_immediately() {
        let terrain = flat_terrain();
        let sim = Simulator::new(&terrain);
        let initial = SimulationState::new(Point::new(3500.0, 100.0), Point::new(0.0, 0.0), 500.0, 0.0, 0.0);
        let traj = sim.run_episode(initial, &individual_of(0.5, 0.5));
        assert_eq!(traj.status, TerminalStatus::Landed);
        assert!(traj.crash_reason.is_empty());
        assert_eq!(traj.states.len(), 1);
        assert!(traj.decisions.is_empty());
    }

    #[test]
    fn corner_state_moving_outward_is_lost_quickly() {
        let terrain = flat_terrain();
        let sim = Simulator::new(&terrain);
        let initial = SimulationState::new(
            Point::new(0.0, 2999.0),
            Point::new(-500.0, 500.0),
            500.0,
            0.0,
            0.0,
        );
        let traj = sim.run_episode(initial, &individual_of(0.5, 0.5));
        assert_eq!(traj.status, TerminalStatus::Lost);
        assert!(traj.states.len() <= 3);
    }

    #[test]
    fn tick_respects_slew_and_fuel_invariants() {
        let terrain = flat_terrain();
        let sim = Simulator::new(&terrain);
        let initial = SimulationState::new(Point::new(3500.0, 3000.0), Point::new(0.0, 0.0), 500.0, 0.0, 0.0);
        let genes: Vec<Gene> = (0..crate::constants::GENE_COUNT)
            .map(|i| Gene::new((i % 7) as f64 / 7.0, (i % 5) as f64 / 5.0))
            .collect();
        let individual = Individual::new(genes).unwrap();
        let traj = sim.run_episode(initial, &individual);

        let mut prev = traj.states[0];
        for state in traj.states.iter().skip(1) {
            assert!(state.power >= 0.0 && state.power <= MAX_POWER);
            assert!(state.rotate.abs() <= 90.0);
            assert!(state.fuel >= -1e-9);
            assert!((state.power - prev.power).abs() <= MAX_POWER_RATE + 1e-9);
            assert!((state.rotate - prev.rotate).abs() <= MAX_TURN_RATE + 1e-9);
            prev = *state;
        }
    }

    #[test]
    fn replaying_decisions_reproduces_the_trajectory() {
        let terrain = flat_terrain();
        let sim = Simulator::new(&terrain);
        let initial = SimulationState::new(Point::new(3500.0, 3000.0), Point::new(0.0, 0.0), 500.0, 0.0, 0.0);
        let individual = individual_of(0.4, 0.6);
        let traj = sim.run_episode(initial, &individual);

        let mut state = traj.states[0];
        let mut replayed = vec![state];
        for decision in &traj.decisions {
            let (next, _) = sim.tick(state, *decision);
            replayed.push(next);
            state = next;
        }
        assert_eq!(replayed, traj.states);
    }

    #[test]
    fn scenario_four_straight_down_drop_crashes_on_pad_without_rotation() {
        // Flat ground the whole width; ship drops straight down from just
        // above the pad with full power already applied -- it should not
        // pick up nonzero rotation or horizontal speed, so only vertical
        // speed (if any) can contribute to the crash reason.
        let terrain = Terrain::new(vec![Point::new(0.0, 100.0), Point::new(7000.0, 100.0)]).unwrap();
        let sim = Simulator::new(&terrain);
        let initial = SimulationState::new(Point::new(3500.0, 101.0), Point::new(0.0, 0.0), 500.0, 0.0, 4.0);
        let decision = Decision::new(0, 4);
        let (next, outcome) = sim.tick(initial, decision);
        assert_eq!(next.rotate, 0.0);
        match outcome {
            TickOutcome::Terminal(status, reason) => {
                assert!(!reason.contains(CrashReason::NON_ZERO_ROTATION));
                assert!(status == TerminalStatus::Landed || status == TerminalStatus::CrashedOnPad);
            }
            TickOutcome::Continue => panic!("expected ground contact within one tick"),
        }
    }
}
