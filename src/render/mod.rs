//! Per-pixel planet rendering
//!
//! Screen space is normalized so the viewport spans [-1, 1] on both axes
//! with the planet centred at the origin. The camera looks down -Z, so
//! larger z is nearer.

mod halo;
mod sphere;

pub use halo::HaloCompositor;
pub use sphere::SphereProjector;

use crate::orbit::OrbitControl;

/// Viewport size plus the planet orientation for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    pub rot_x: f64,
    pub rot_y: f64,
    pub rot_z: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rot_x: 0.0,
            rot_y: 0.0,
            rot_z: 0.0,
        }
    }

    /// Orbit pitch as-is; yaw is the orbit yaw plus a constant spin over `time` seconds
    pub fn from_orbit(
        orbit: &OrbitControl,
        time: f64,
        spin_rate: f64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width,
            height,
            rot_x: orbit.rot_x(),
            rot_y: time * spin_rate + orbit.rot_y(),
            rot_z: 0.0,
        }
    }

    pub fn with_rotation(mut self, rot_x: f64, rot_y: f64, rot_z: f64) -> Self {
        self.rot_x = rot_x;
        self.rot_y = rot_y;
        self.rot_z = rot_z;
        self
    }

    /// Normalized device coordinates of the pixel at (x, y)
    #[inline]
    pub fn to_ndc(&self, x: u32, y: u32) -> (f64, f64) {
        let hw = self.width as f64 / 2.0;
        let hh = self.height as f64 / 2.0;
        ((x as f64 - hw) / hw, (y as f64 - hh) / hh)
    }

    /// Pixel-space position of a normalized point
    #[inline]
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        let hw = self.width as f64 / 2.0;
        let hh = self.height as f64 / 2.0;
        (x * hw + hw, y * hh + hh)
    }
}
