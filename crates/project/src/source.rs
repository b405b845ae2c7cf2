//! Displacement sources: composable generators of per-vertex displacement.
//!
//! A [`DisplacementSource`] produces a `(dx, dy)` displacement for any point
//! of the undeformed map. The production displacement field comes from the
//! external velocity-field integrator; these sources stand in for it when
//! building displacement grids for demos and tests, and double as a way to
//! drive the projection pipeline with synthetic deformations.
//!
//! All implementations are deterministic: same inputs produce the same
//! output.

use noise::{NoiseFn, Perlin};

/// A source of 2D displacement values.
///
/// Returns the `(dx, dy)` displacement applied to the undisplaced position
/// `(x, y)`. All implementations must be deterministic: same inputs = same
/// output.
pub trait DisplacementSource: Send + Sync {
    /// Sample the displacement at undeformed position `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> (f64, f64);
}

/// The identity deformation: every vertex stays in place.
pub struct Identity;

/// Perlin noise displacement producing a smooth pseudo-random warp from two
/// offset noise samples.
pub struct PerlinWarp {
    noise: Perlin,
    scale: f64,
    strength: f64,
}

/// Radially symmetric bulge: pushes points away from a center with Gaussian
/// falloff, the archetypal "region expands" deformation.
pub struct RadialBulge {
    pub x: f64,
    pub y: f64,
    pub strength: f64,
    pub radius: f64,
}

/// Singularity threshold. Distances below this are treated as zero.
const SINGULARITY_EPS: f64 = 1e-10;

impl PerlinWarp {
    /// Creates a new Perlin warp source.
    pub fn new(scale: f64, strength: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            strength,
        }
    }
}

impl DisplacementSource for Identity {
    fn sample(&self, _x: f64, _y: f64) -> (f64, f64) {
        (0.0, 0.0)
    }
}

impl DisplacementSource for PerlinWarp {
    fn sample(&self, x: f64, y: f64) -> (f64, f64) {
        let sx = x * self.scale;
        let sy = y * self.scale;
        let dx = self.noise.get([sx, sy]) * self.strength;
        let dy = self.noise.get([sx + 100.0, sy + 100.0]) * self.strength;
        (dx, dy)
    }
}

impl DisplacementSource for RadialBulge {
    fn sample(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.x;
        let dy = y - self.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < SINGULARITY_EPS || self.radius.abs() < SINGULARITY_EPS {
            return (0.0, 0.0);
        }
        let falloff = (-(dist / self.radius) * (dist / self.radius)).exp();
        let magnitude = self.strength * falloff;
        (dx / dist * magnitude, dy / dist * magnitude)
    }
}
