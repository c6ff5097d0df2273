//! Simulation module
//!
//! Everything that generates or advances asteroid state lives here. Nothing
//! in this module renders, blocks or touches I/O:
//! - Core generation runs once per asteroid
//! - Pool reconcile and layout run on parameter changes
//! - Tick runs once per frame
//! - All randomness comes from the caller's RNG

pub mod core;
pub mod layout;
pub mod pool;
pub mod state;
pub mod tick;

pub use self::core::{CoreNoise, deform, generate_core};
pub use layout::{angular_speed, relayout};
pub use pool::{ParticlePool, PoolChange};
pub use state::{AsteroidCore, ParticleInstance, Ring};
pub use tick::tick;
