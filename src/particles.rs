//! Cloud Particles
//!
//! Clouds are a fixed list of disc sprites floating just above the surface,
//! placed once per rebuild and projected every frame with a cheap
//! four-corner occlusion test against the sphere.

use std::f64::consts::PI;

use crate::color::Rgb;
use crate::display::{BlendMode, PixelBuffer};
use crate::math3d::{round_half_up, sphere_depth, Vec3};
use crate::noise::NoiseField;
use crate::render::Camera;

/// Candidate particles per unit of planet size
const CANDIDATES_PER_SIZE: f64 = 3000.0;
/// Clearance between the surface and the innermost cloud shell
const SHELL_OFFSET: f64 = 0.01;
/// Radial spread of the shell at full atmosphere density
const SHELL_SPREAD: f64 = 0.3;
/// Radius of a particle sitting at the very bottom of the density range
const MAX_RADIUS: f64 = 0.08;

/// A single cloud sprite in planet-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub radius: f64,
    pub color: Rgb,
}

/// How much of a particle's footprint sits behind the planet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occlusion {
    Visible,
    Partial,
    Hidden,
}

/// Every cloud particle of one planet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudField {
    particles: Vec<Particle>,
}

impl CloudField {
    /// Scatter candidates in a shell around the sphere and keep those whose
    /// noise intensity falls under `cloud_density`.
    ///
    /// Draws come from `noise.rand` with a token counter starting at 0, so a
    /// given seed and trait set always yields the same clouds.
    pub fn generate(
        noise: &NoiseField,
        size: f64,
        atmo_density: f64,
        cloud_density: f64,
        color: Rgb,
    ) -> Self {
        if cloud_density <= 0.0 {
            return Self::default();
        }

        let candidates = Self::candidate_count(size);
        let mut token = 0u32;
        let mut next = || {
            let v = noise.rand(token);
            token += 1;
            v
        };

        let mut particles = Vec::new();
        for _ in 0..candidates {
            let r = size + SHELL_OFFSET + next() * next() * SHELL_SPREAD * atmo_density * size;
            let theta = next() * 2.0 * PI;
            let phi = next() * PI;

            let p = Vec3::from_spherical(r, theta, phi);
            let v = noise.sample(p.x * 2.0, p.y * 4.0, p.z * 2.0) + 0.5;
            if v > cloud_density {
                continue;
            }

            let radius = (cloud_density - v) / cloud_density * MAX_RADIUS;
            // Push out far enough that the sprite clears the surface
            let distance = r.max(size + radius * 2.0);
            particles.push(Particle {
                position: Vec3::from_spherical(distance, theta, phi),
                radius,
                color,
            });
        }

        Self { particles }
    }

    /// Number of placement attempts for a planet of `size`.
    /// A fractional count still gets its last partial attempt.
    pub fn candidate_count(size: f64) -> u32 {
        (CANDIDATES_PER_SIZE * size).ceil().max(0.0) as u32
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }
}

/// Draws particles over the terrain layer
pub struct ParticleProjector;

impl ParticleProjector {
    /// Is the sphere surface nearer than `z` at normalized (x, y)?
    /// Points off the silhouette are never occluded.
    #[inline]
    pub fn point_occluded(size: f64, x: f64, y: f64, z: f64) -> bool {
        match sphere_depth(size, x, y) {
            Some(depth) => z < depth,
            None => false,
        }
    }

    /// Four-corner test on the footprint of a view-space particle.
    /// Misses partial occlusion at grazing angles.
    pub fn occlusion(size: f64, view: Vec3, radius: f64) -> Occlusion {
        let corners = [
            (view.x - radius, view.y - radius),
            (view.x + radius, view.y - radius),
            (view.x - radius, view.y + radius),
            (view.x + radius, view.y + radius),
        ];
        let hidden = corners
            .iter()
            .filter(|(x, y)| Self::point_occluded(size, *x, *y, view.z))
            .count();
        match hidden {
            0 => Occlusion::Visible,
            4 => Occlusion::Hidden,
            _ => Occlusion::Partial,
        }
    }

    /// Rotate each particle into view space (X, then Y, then Z) and stamp it.
    /// Partly hidden particles are drawn behind existing pixels.
    pub fn render_all(size: f64, camera: &Camera, particles: &[Particle], dest: &mut PixelBuffer) {
        let w = camera.width as f64;

        for p in particles {
            let extent = p.radius * w;
            let diameter = extent.round();
            if diameter < 1.0 {
                continue;
            }

            let view = p
                .position
                .rotate_xyz(camera.rot_x, camera.rot_y, camera.rot_z);

            let mode = match Self::occlusion(size, view, p.radius) {
                Occlusion::Hidden => continue,
                Occlusion::Partial => BlendMode::Behind,
                Occlusion::Visible => BlendMode::Alpha,
            };

            let (sx, sy) = camera.to_screen(view.x, view.y);
            let x0 = round_half_up(sx - extent / 2.0) as i32;
            let y0 = round_half_up(sy - extent / 2.0) as i32;
            dest.fill_disc(x0, y0, diameter as u32, p.color, mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_color() -> Rgb {
        Rgb::from_hex(0xc8d8f0)
    }

    #[test]
    fn test_generate_is_deterministic() {
        let noise = NoiseField::new(0x42069);
        let a = CloudField::generate(&noise, 0.7, 0.5, 0.5, cloud_color());
        let b = CloudField::generate(&NoiseField::new(0x42069), 0.7, 0.5, 0.5, cloud_color());
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn test_candidate_count_rounds_up() {
        assert_eq!(CloudField::candidate_count(0.5), 1500);
        assert_eq!(CloudField::candidate_count(0.30005), 901);
        assert_eq!(CloudField::candidate_count(0.0001), 1);
        assert_eq!(CloudField::candidate_count(0.0), 0);
    }

    #[test]
    fn test_zero_density_has_no_clouds() {
        let noise = NoiseField::new(1);
        assert!(CloudField::generate(&noise, 0.7, 0.5, 0.0, cloud_color()).is_empty());
    }

    #[test]
    fn test_particles_clear_the_surface() {
        let noise = NoiseField::new(99);
        let size = 0.6;
        let clouds = CloudField::generate(&noise, size, 1.0, 0.8, cloud_color());
        assert!(clouds.len() <= (CANDIDATES_PER_SIZE * size) as usize);
        for p in clouds.iter() {
            assert!(p.radius >= 0.0);
            assert!(p.radius <= MAX_RADIUS);
            let d = p.position.length();
            assert!(d >= size + SHELL_OFFSET - 1e-9);
            assert!(d + 1e-9 >= size + 2.0 * p.radius);
            assert!(d <= size + SHELL_OFFSET + SHELL_SPREAD * size + 2.0 * MAX_RADIUS);
        }
    }

    #[test]
    fn test_denser_setting_accepts_more() {
        let noise = NoiseField::new(7);
        let sparse = CloudField::generate(&noise, 0.7, 0.5, 0.3, cloud_color());
        let dense = CloudField::generate(&noise, 0.7, 0.5, 0.9, cloud_color());
        assert!(dense.len() >= sparse.len());
    }

    #[test]
    fn test_occlusion_at_surface_depth() {
        let size = 0.7;
        let eps = 1e-6;
        for &(x, y) in &[(0.0, 0.0), (0.3, -0.2), (-0.5, 0.4), (0.1, 0.68)] {
            let depth = sphere_depth(size, x, y).unwrap();
            let front = Vec3::new(x, y, depth + eps);
            let behind = Vec3::new(x, y, depth - eps);
            assert!(!ParticleProjector::point_occluded(size, x, y, front.z));
            assert!(ParticleProjector::point_occluded(size, x, y, behind.z));
            assert_eq!(ParticleProjector::occlusion(size, front, 0.0), Occlusion::Visible);
            assert_eq!(ParticleProjector::occlusion(size, behind, 0.0), Occlusion::Hidden);
        }
    }

    #[test]
    fn test_occlusion_partial_and_off_disc() {
        let size = 0.5;
        // Behind the planet, straddling the right limb
        let straddle = Vec3::new(0.5, 0.0, -0.3);
        assert_eq!(ParticleProjector::occlusion(size, straddle, 0.05), Occlusion::Partial);
        // Well outside the silhouette
        let far = Vec3::new(0.9, 0.9, -0.5);
        assert_eq!(ParticleProjector::occlusion(size, far, 0.05), Occlusion::Visible);
    }

    #[test]
    fn test_render_front_and_back() {
        let cam = Camera::new(100, 100);
        let size = 0.5;
        let mut dest = PixelBuffer::with_size(100, 100);
        // Opaque planet disc stand-in
        dest.fill_disc(25, 25, 50, Rgb::new(10, 10, 10), BlendMode::Alpha);

        let white = Rgb::new(255, 255, 255);
        let front = Particle {
            position: Vec3::new(0.0, 0.0, 0.6),
            radius: 0.05,
            color: white,
        };
        let behind = Particle {
            position: Vec3::new(0.0, 0.0, -0.6),
            radius: 0.05,
            color: Rgb::new(255, 0, 0),
        };
        let tiny = Particle {
            position: Vec3::new(0.8, 0.8, 0.0),
            radius: 0.001,
            color: white,
        };
        ParticleProjector::render_all(size, &cam, &[behind, front, tiny], &mut dest);

        assert_eq!(dest.get_pixel_rgba(50, 50), Some((255, 255, 255, 255)));
        assert_eq!(dest.get_pixel_rgba(90, 90), Some((0, 0, 0, 0)));
        // Hidden particle left no red anywhere
        let has_red = (0..100).any(|y| {
            (0..100).any(|x| matches!(dest.get_pixel_rgba(x, y), Some((255, 0, 0, _))))
        });
        assert!(!has_red);
    }

    #[test]
    fn test_partial_draws_behind_terrain() {
        let cam = Camera::new(100, 100);
        let size = 0.5;
        let mut dest = PixelBuffer::with_size(100, 100);
        dest.fill_disc(25, 25, 50, Rgb::new(10, 10, 10), BlendMode::Alpha);
        let limb = Particle {
            position: Vec3::new(0.5, 0.0, -0.1),
            radius: 0.1,
            color: Rgb::new(200, 200, 255),
        };
        ParticleProjector::render_all(size, &cam, &[limb], &mut dest);
        // Inside the disc the terrain wins
        assert_eq!(dest.get_pixel_rgba(72, 50), Some((10, 10, 10, 255)));
        // Outside it the cloud shows
        assert_eq!(dest.get_pixel_rgba(78, 50), Some((200, 200, 255, 255)));
    }
}
