//! Orbital layout
//!
//! Full re-layout of the ring: equal angular spacing in ring order, random
//! radius and scale within the configured bands, and an angular speed that
//! is a linear function of radius.

use std::f32::consts::TAU;

use rand::Rng;

use super::state::Ring;
use crate::params::Parameters;
use crate::{polar_to_planar, remap, remap_clamped};

/// `min + (max - min) * u` with `u` uniform in [0, 1), or `min` when the
/// band is empty
fn draw<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    loop {
        let value = min + (max - min) * rng.random::<f32>();
        // Rounding can land exactly on max; redraw to keep the band half-open
        if value < max {
            return value;
        }
    }
}

/// Angular speed for a particle at `distance`
pub fn angular_speed(distance: f32, params: &Parameters) -> f32 {
    let map = if params.clamp_speed {
        remap_clamped
    } else {
        remap
    };
    map(
        distance,
        params.min_radius,
        params.max_radius,
        params.min_speed,
        params.max_speed,
    )
}

/// Assign angle, distance, scale and angular speed to every particle
pub fn relayout<R: Rng + ?Sized>(ring: &mut Ring, params: &Parameters, rng: &mut R) {
    let count = ring.len();
    if count == 0 {
        return;
    }
    let step = TAU / count as f32;

    for (index, particle) in ring.iter_mut().enumerate() {
        particle.angle = index as f32 * step;
        particle.distance = draw(rng, params.min_radius, params.max_radius);
        particle.scale = draw(rng, params.min_size, params.max_size);
        particle.angular_speed = angular_speed(particle.distance, params);
        particle.position = polar_to_planar(particle.distance, particle.angle);
    }

    log::debug!(
        "Ring laid out: {} particles, radius [{}, {}), size [{}, {})",
        count,
        params.min_radius,
        params.max_radius,
        params.min_size,
        params.max_size
    );
}
