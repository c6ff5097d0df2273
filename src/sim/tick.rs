//! Per-frame simulation tick
//!
//! Fixed increment per call: no time delta, one call per rendered frame.

use glam::Vec3;
use rand::Rng;

use super::state::{AsteroidCore, Ring};
use crate::params::Parameters;
use crate::{polar_to_planar, wrap_angle};

/// Advance the core rotation and every particle by one frame
pub fn tick<R: Rng + ?Sized>(
    core: &mut AsteroidCore,
    ring: &mut Ring,
    params: &Parameters,
    rng: &mut R,
) {
    core.rotation_y = wrap_angle(core.rotation_y - params.core_rotation);

    for particle in ring.iter_mut() {
        particle.angle = wrap_angle(particle.angle + particle.angular_speed);
        particle.position = polar_to_planar(particle.distance, particle.angle);

        // Tumble: independent random step per axis, bounded by the spin
        let jitter = Vec3::new(rng.random(), rng.random(), rng.random());
        let rotation = particle.rotation + particle.spin * jitter;
        particle.rotation = Vec3::new(
            wrap_angle(rotation.x),
            wrap_angle(rotation.y),
            wrap_angle(rotation.z),
        );
    }

    log::trace!(
        "Tick: core rotation {:.4}, {} particles",
        core.rotation_y,
        ring.len()
    );
}
