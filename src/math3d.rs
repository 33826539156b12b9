//! 3D Math Utilities
//!
//! Vector type and the fixed-order rotations shared by the sphere and
//! particle projectors. Everything here is `f64`: the renderer works in
//! normalized units where the sphere radius is at most 1.0.

use std::ops::{Add, Mul, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Approximate equality check for floating point comparison
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }

    /// Rotate around X axis
    #[inline]
    pub fn rotate_x(&self, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x,
            y: self.y * cos - self.z * sin,
            z: self.y * sin + self.z * cos,
        }
    }

    /// Rotate around Y axis
    #[inline]
    pub fn rotate_y(&self, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Rotate around Z axis
    #[inline]
    pub fn rotate_z(&self, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }

    /// Apply all three rotations: X, then Y, then Z.
    ///
    /// Terrain lookup uses it to take a view point into planet space, while
    /// particles use it to take planet points into view space. Under a
    /// non-zero rotation the cloud layer therefore turns against the ground.
    #[inline]
    pub fn rotate_xyz(&self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotate_x(rx).rotate_y(ry).rotate_z(rz)
    }

    /// Cartesian point from a radius and two spherical angles.
    /// `theta` sweeps around the Z axis, `phi` is measured from +Z.
    #[inline]
    pub fn from_spherical(r: f64, theta: f64, phi: f64) -> Self {
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();
        Self {
            x: r * cos_t * sin_p,
            y: r * sin_t * sin_p,
            z: r * cos_p,
        }
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

/// Depth of a sphere of radius `radius` centred at the origin, seen along +Z
/// at normalized screen position `(x, y)`. `None` outside the silhouette.
#[inline]
pub fn sphere_depth(radius: f64, x: f64, y: f64) -> Option<f64> {
    let d2 = radius * radius - x * x - y * y;
    if d2 < 0.0 {
        None
    } else {
        Some(d2.sqrt())
    }
}

/// Round half up, matching how pixel positions are snapped to the grid.
#[inline]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
