//! The gated, multi-objective fitness evaluator (ยง4.E): turns a finished
//! [`Trajectory`] into a scalar score, higher is better.

use crate::constants::{MAX_HSPEED, MAX_VSPEED, WORLD_HEIGHT, WORLD_WIDTH};
use crate::geometry::{Segment, distance_to_segment, segments_intersect};
use crate::physics::{TerminalStatus, Trajectory};

/// Per-component weights applied to the gated fitness terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub distance: f64,
    pub rotation: f64,
    pub vertical_speed: f64,
    pub horizontal_speed: f64,
    pub fuel: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            rotation: 1.0,
            vertical_speed: 1.0,
            horizontal_speed: 1.0,
            fuel: 1.0,
        }
    }
}

/// Scores `trajectory` against `pad`. Each later term is gated by the
/// prior one reaching its ideal value, so the search gradient leads
/// populations through stages: reach the pad, stop rotating, land slow
/// enough, preserve fuel.
pub fn score(trajectory: &Trajectory, pad: Segment, weights: Weights) -> f64 {
    let last = trajectory.last();

    let d = landing_distance(trajectory, pad);
    let world_diagonal = (WORLD_WIDTH * WORLD_WIDTH + WORLD_HEIGHT * WORLD_HEIGHT).sqrt();
    let dist_score = 1.0 - d / world_diagonal;
    let importance_distance = dist_score * dist_score;
    let weighted_distance = dist_score * weights.distance;

    let on_target = d == 0.0;

    let rot_score = 1.0 - last.rotate.abs() / 90.0;
    let weighted_rotation = if on_target {
        rot_score * weights.rotation * importance_distance
    } else {
        0.0
    };

    let gated_on_upright = on_target && last.rotate == 0.0;

    let vs_score = if last.velocity.y.abs() <= MAX_VSPEED {
        1.0
    } else {
        1.0 - (last.velocity.y.abs() - MAX_VSPEED).max(0.0) / 200.0
    };
    let weighted_vertical_speed = if gated_on_upright {
        vs_score * vs_score * weights.vertical_speed
    } else {
        0.0
    };

    let hs_score = if last.velocity.x.abs() <= MAX_HSPEED {
        1.0
    } else {
        1.0 - (last.velocity.x.abs() - MAX_HSPEED).max(0.0) / 200.0
    };
    let weighted_horizontal_speed = if gated_on_upright {
        hs_score * hs_score * weights.horizontal_speed
    } else {
        0.0
    };

    let weighted_fuel = if trajectory.status == TerminalStatus::Landed {
        last.fuel * weights.fuel
    } else {
        0.0
    };

    weighted_distance
        + weighted_rotation
        + weighted_vertical_speed
        + weighted_horizontal_speed
        + weighted_fuel
}

/// Distance from the final position to the pad, collapsed to zero if the
/// ship actually touched down on the pad (either the final segment of
/// motion crossed it, or the last resting point lies on it).
fn landing_distance(trajectory: &Trajectory, pad: Segment) -> f64 {
    let last = trajectory.last();

    if trajectory.states.len() >= 2 {
        let penultimate = trajectory.states[trajectory.states.len() - 2];
        let motion = Segment::new(penultimate.position, last.position);
        if segments_intersect(&motion, &pad) {
            return 0.0;
        }
    }

    if last.position.y == pad.start.y
        && last.position.x >= pad.start.x.min(pad.end.x)
        && last.position.x <= pad.start.x.max(pad.end.x)
    {
        return 0.0;
    }

    distance_to_segment(&pad, last.position)
}
