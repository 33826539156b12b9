//! Planet aggregate
//!
//! Owns everything derived from one set of traits and renders a frame from
//! it. All derived state is rebuilt together, so a render always sees a
//! consistent noise table, band set, cloud list and halo.

use tracing::debug;

use crate::color::Rgb;
use crate::display::PixelBuffer;
use crate::noise::NoiseField;
use crate::particles::{CloudField, ParticleProjector};
use crate::render::{Camera, HaloCompositor, SphereProjector};
use crate::terrain::{TerrainModel, TerrainSet, WATER};
use crate::traits::Traits;

/// Cloud lightness relative to the water band
const CLOUD_LIGHTNESS: f64 = 2.5;

pub struct Planet {
    traits: Traits,
    noise: NoiseField,
    terrains: TerrainSet,
    clouds: CloudField,
    halo: HaloCompositor,
}

impl Planet {
    /// Traits are trusted here; validate them at the editing boundary
    pub fn new(traits: Traits) -> Self {
        let mut planet = Self {
            traits,
            noise: NoiseField::new(traits.seed),
            terrains: TerrainSet::default(),
            clouds: CloudField::default(),
            halo: HaloCompositor::new(),
        };
        planet.derive_from_noise();
        planet
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    /// Replace the traits wholesale and rebuild
    pub fn set_traits(&mut self, traits: Traits) {
        self.traits = traits;
        self.rebuild();
    }

    /// Re-derive noise, bands and clouds from the current traits and mark
    /// the halo for recomputation on the next render.
    pub fn rebuild(&mut self) {
        self.noise = NoiseField::new(self.traits.seed);
        self.derive_from_noise();
    }

    /// Bands, clouds and halo from the current noise field
    fn derive_from_noise(&mut self) {
        let t = self.traits;
        self.terrains = TerrainSet::build(t.num_terrains, t.water, t.base_color, t.acc_color);
        self.halo.mark_dirty();
        self.clouds = CloudField::generate(
            &self.noise,
            t.size,
            t.atmo_density,
            t.cloud_density,
            self.cloud_color(),
        );

        debug!(
            seed = t.seed,
            bands = self.terrains.len(),
            clouds = self.clouds.len(),
            "planet rebuilt"
        );
    }

    fn cloud_color(&self) -> Rgb {
        self.terrains
            .by_name(WATER)
            .map(|water| water.color.scale_lightness(CLOUD_LIGHTNESS))
            .unwrap_or(Rgb::new(255, 255, 255))
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn terrains(&self) -> &TerrainSet {
        &self.terrains
    }

    pub fn clouds(&self) -> &CloudField {
        &self.clouds
    }

    pub fn halo(&self) -> &HaloCompositor {
        &self.halo
    }

    pub fn terrain_model(&self) -> TerrainModel<'_> {
        TerrainModel::new(&self.noise, &self.terrains)
    }

    /// Render one frame into `dest`, resizing it to the camera viewport.
    /// Terrain first, then clouds, then the halo added on top.
    pub fn render(&mut self, camera: &Camera, dest: &mut PixelBuffer) {
        self.halo.ensure(&self.traits, camera);

        SphereProjector::render(camera, &self.terrain_model(), self.traits.size, dest);
        ParticleProjector::render_all(self.traits.size, camera, self.clouds.as_slice(), dest);
        self.halo.composite(dest);
    }
}
