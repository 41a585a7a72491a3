//! Turns one gene into a physically realizable [`Decision`] for the
//! current tick (ยง4.C).

use crate::geometry::{Segment, segments_intersect};
use crate::state::{Decision, Gene, SimulationState, clamp_power, clamp_rotation};

/// Decodes `gene` against `state` and the landing `pad`.
///
/// If the ship's predicted straight-line motion this tick would cross the
/// pad, the decoder commits to a vertical landing attempt: zero rotation,
/// power held steady. Otherwise the gene nudges rotation and power by a
/// bounded relative step from the current state.
pub fn decide(state: &SimulationState, gene: Gene, pad: Segment) -> Decision {
    let predicted_motion = Segment::new(state.position, state.position + state.velocity);
    if segments_intersect(&predicted_motion, &pad) {
        return Decision::new(0, state.power.round() as i32);
    }

    let target_rotate = state.rotate + gene.r * 30.0 - 15.0;
    let target_power = (state.power + gene.p * 3.0).floor() - 1.0;

    let rotate = clamp_rotation(target_rotate).round() as i32;
    let power = clamp_power(target_power, f64::INFINITY).round() as i32;

    Decision::new(rotate, power)
}
