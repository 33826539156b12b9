use super::Camera;
use crate::display::PixelBuffer;
use crate::math3d::{sphere_depth, Vec3};
use crate::terrain::TerrainModel;

/// Ray-casts an orthographic view of the sphere: each pixel inside the
/// silhouette maps to exactly one visible surface point.
pub struct SphereProjector;

impl SphereProjector {
    /// Visible surface point under normalized position (dx, dy), in view space
    #[inline]
    pub fn unproject(size: f64, dx: f64, dy: f64) -> Option<Vec3> {
        if (dx * dx + dy * dy).sqrt() > size {
            return None;
        }
        sphere_depth(size, dx, dy).map(|z| Vec3::new(dx, dy, z))
    }

    /// View space to planet-local space: rotate X, then Y, then Z
    #[inline]
    pub fn to_planet(camera: &Camera, p: Vec3) -> Vec3 {
        p.rotate_xyz(camera.rot_x, camera.rot_y, camera.rot_z)
    }

    /// Write the terrain layer. Pixels outside the disc become fully
    /// transparent; pixels inside are opaque band colors.
    pub fn render(camera: &Camera, model: &TerrainModel<'_>, size: f64, dest: &mut PixelBuffer) {
        dest.resize(camera.width, camera.height);

        for y in 0..camera.height {
            for x in 0..camera.width {
                let (dx, dy) = camera.to_ndc(x, y);
                match Self::unproject(size, dx, dy) {
                    Some(view) => {
                        let terrain = model.terrain_at(Self::to_planet(camera, view));
                        dest.set_pixel(x as i32, y as i32, terrain.color);
                    },
                    None => dest.set_pixel_rgba(x as i32, y as i32, 0, 0, 0, 0),
                }
            }
        }
    }
}
