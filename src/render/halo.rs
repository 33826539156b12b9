use tracing::debug;

use super::Camera;
use crate::color::Rgb;
use crate::display::{BlendMode, PixelBuffer};
use crate::traits::Traits;

/// Halo reaches this far past the surface at full atmosphere density
const HALO_REACH: f64 = 0.4;
/// Peak opacity scale before quantization
const HALO_OPACITY: f64 = 0.15;
/// Posterization steps
const HALO_STEPS: f64 = 14.0;

/// Cached atmospheric glow. Depends only on size, atmosphere density and
/// accent color, so it is rebuilt on trait changes and viewport resizes and
/// reused for every other frame.
#[derive(Debug, Clone)]
pub struct HaloCompositor {
    buffer: PixelBuffer,
    dirty: bool,
}

impl Default for HaloCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl HaloCompositor {
    pub fn new() -> Self {
        Self {
            buffer: PixelBuffer::with_size(0, 0),
            dirty: true,
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Halo opacity at normalized (dx, dy), in [0, 1] before byte conversion
    pub fn opacity_at(size: f64, atmo_density: f64, dx: f64, dy: f64) -> f64 {
        let halo_size = size + atmo_density * HALO_REACH;
        if halo_size <= size {
            return 0.0;
        }
        let d2 = dx * dx + dy * dy;
        if d2.sqrt() > halo_size {
            return 0.0;
        }

        let halo_z = (halo_size * halo_size - d2).max(0.0).sqrt();
        let dz = if d2.sqrt() > size {
            halo_z.powi(3) * 3.0
        } else {
            halo_z - (size * size - d2).max(0.0).sqrt()
        };

        let f = dz / (halo_size - size) * HALO_OPACITY;
        (f * HALO_STEPS).round() / HALO_STEPS
    }

    /// Recompute the buffer for `traits` at the camera's viewport size
    pub fn rebuild(&mut self, traits: &Traits, camera: &Camera) {
        let color = Self::color_for(traits.acc_color);
        self.buffer.resize(camera.width, camera.height);

        for y in 0..camera.height {
            for x in 0..camera.width {
                let (dx, dy) = camera.to_ndc(x, y);
                let f = Self::opacity_at(traits.size, traits.atmo_density, dx, dy);
                let alpha = (f * 255.0).trunc().clamp(0.0, 255.0) as u8;
                self.buffer
                    .set_pixel_rgba(x as i32, y as i32, color.r, color.g, color.b, alpha);
            }
        }

        self.dirty = false;
        debug!(
            width = camera.width,
            height = camera.height,
            coverage = self.buffer.coverage(),
            "halo rebuilt"
        );
    }

    /// Rebuild if dirty or if the viewport changed size
    pub fn ensure(&mut self, traits: &Traits, camera: &Camera) {
        if self.dirty
            || self.buffer.width() != camera.width
            || self.buffer.height() != camera.height
        {
            self.rebuild(traits, camera);
        }
    }

    /// Add the halo onto `dest` with premultiplied additive blending
    pub fn composite(&self, dest: &mut PixelBuffer) {
        dest.composite_full(&self.buffer, BlendMode::Lighter);
    }

    /// Color the halo is filled with for a given accent
    pub fn color_for(accent: Rgb) -> Rgb {
        accent.rotate_hue(180.0)
    }
}
