//! Lunar-lander descent control-policy search: a generational evolutionary
//! algorithm over fixed-length gene sequences, each decoded through a
//! deterministic physics simulator.

pub mod constants;
pub mod contest_io;
pub mod decoder;
pub mod driver;
pub mod fitness;
pub mod genetic;
pub mod geometry;
pub mod map;
pub mod parameters;
pub mod physics;
pub mod random;
pub mod state;
pub mod time_budget;
pub mod worker_pool;
