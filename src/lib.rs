//! Asteroid Ring - a procedurally deformed asteroid with an orbiting particle ring
//!
//! Core modules:
//! - `params`: Live-tunable parameter store and color palette
//! - `sim`: Core generation, particle pool, orbital layout and frame tick
//! - `renderer`: Vertex/instance data handed to an external renderer
//! - `asteroid`: The asteroid entity and its generation pipeline
//! - `scene`: Owning context that batches parameter changes
//! - `cli`: Arguments of the headless driver

pub mod asteroid;
pub mod cli;
pub mod error;
pub mod params;
pub mod renderer;
pub mod scene;
pub mod sim;

pub use asteroid::{Asteroid, AsteroidObject, CoreColor};
pub use error::{AsteroidError, Result};
pub use params::{ColorPalette, ParamField, Parameters, ParameterStore, Recompute};
pub use scene::{Scene, SharedScene};

use glam::Vec3;

/// RGBA color, linear 0-1 components
pub type Rgba = [f32; 4];

/// Fixed constants of the reference design
pub mod consts {
    /// Default core radius
    pub const CORE_RADIUS: f32 = 20.0;
    /// Subdivision level of the core base polyhedron
    pub const CORE_DETAIL: u32 = 2;
    /// Scale applied to vertex positions before sampling noise
    pub const NOISE_FREQUENCY: f64 = 0.1;
    /// Displacement per unit of noise, as a fraction of the core radius
    pub const NOISE_DISPLACEMENT: f32 = 0.25;
    /// Seed of the coherent noise field (the field is fixed, not per-asteroid)
    pub const NOISE_SEED: u32 = 0;
    /// Default core color (orange)
    pub const CORE_COLOR_HEX: u32 = 0xffa500;

    /// Tilt of the whole asteroid object about Z (radians)
    pub const OBJECT_TILT_Z: f32 = std::f32::consts::PI / 10.0;

    /// Maximum self-rotation step per axis per tick (radians)
    pub const MAX_TUMBLE_STEP: f32 = 0.02;

    /// Band of the per-particle base size drawn at spawn
    pub const MIN_BASE_SIZE: f32 = 0.8;
    pub const MAX_BASE_SIZE: f32 = 1.2;

    /// Default palette
    pub const PALETTE_HEX: [u32; 4] = [0x8fc999, 0x5fc4d0, 0xee5624, 0xfaff70];
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Unclamped: inputs outside the source range extrapolate. A degenerate
/// source range maps everything to `out_min`.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() <= f32::EPSILON {
        return out_min;
    }
    out_min + (out_max - out_min) * (value - in_min) / span
}

/// Same as [`remap`] but the result is clamped to the target range
#[inline]
pub fn remap_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let (lo, hi) = if out_min <= out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    remap(value, in_min, in_max, out_min, out_max).clamp(lo, hi)
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert ring-plane polar (r, theta) to a 3-D point on the XZ plane
#[inline]
pub fn polar_to_planar(r: f32, theta: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
}

/// Convert a `0xRRGGBB` color to opaque RGBA
pub const fn hex_to_rgba(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}
