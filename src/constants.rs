//! Protocol constants for the contest physics and the genetic search.

/// World width in meters (x axis).
pub const WORLD_WIDTH: f64 = 7000.0;
/// World height in meters (y axis).
pub const WORLD_HEIGHT: f64 = 3000.0;

/// Mars surface gravity, m/s^2.
pub const GRAVITY: f64 = 3.711;

/// Maximum vertical speed at touchdown, m/s.
pub const MAX_VSPEED: f64 = 40.0;
/// Maximum horizontal speed at touchdown, m/s.
pub const MAX_HSPEED: f64 = 20.0;
/// Rotation is clamped to [-MAX_ROTATION, MAX_ROTATION] degrees.
pub const MAX_ROTATION: f64 = 90.0;
/// Thrust power is clamped to [0, MAX_POWER].
pub const MAX_POWER: f64 = 4.0;
/// Per-tick rotation slew cap, degrees.
pub const MAX_TURN_RATE: f64 = 15.0;
/// Per-tick power slew cap.
pub const MAX_POWER_RATE: f64 = 1.0;
/// Starting fuel ceiling; map fixtures with a higher value are rejected.
pub const MAX_FUEL: f64 = 2000.0;

/// Number of genes in an individual. A protocol constant: gene arrays of any
/// other length are rejected rather than silently truncated or padded.
pub const GENE_COUNT: usize = 200;

/// Default population size.
pub const DEFAULT_POPULATION_SIZE: usize = 50;
