//! Terrain bands and the height model
//!
//! A `TerrainSet` is an ordered list of color bands keyed by the height at
//! which each begins. `TerrainModel` turns a point on the sphere into a
//! height via three octaves of noise and then into a band.

use std::borrow::Cow;

use crate::color::Rgb;
use crate::math3d::Vec3;
use crate::noise::NoiseField;

/// Name of the lowest band. Always starts at height 0.
pub const WATER: &str = "water";

/// Returned when a height cannot be resolved to a band. Loud on purpose.
pub static ERROR_TERRAIN: Terrain = Terrain {
    name: Cow::Borrowed("error"),
    color: Rgb::new(255, 0, 255),
    start_height: f64::NAN,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub name: Cow<'static, str>,
    pub color: Rgb,
    pub start_height: f64,
}

impl Terrain {
    pub fn new(name: impl Into<Cow<'static, str>>, color: Rgb, start_height: f64) -> Self {
        Self {
            name: name.into(),
            color,
            start_height,
        }
    }

    /// The shared sentinel band
    pub fn error() -> &'static Terrain {
        &ERROR_TERRAIN
    }

    pub fn is_error(&self) -> bool {
        self.name == ERROR_TERRAIN.name && self.start_height.is_nan()
    }
}

/// Bands sorted by descending `start_height`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainSet {
    bands: Vec<Terrain>,
}

impl TerrainSet {
    pub fn new(mut bands: Vec<Terrain>) -> Self {
        bands.sort_by(|a, b| b.start_height.total_cmp(&a.start_height));
        Self { bands }
    }

    /// Derive the band palette from planet traits.
    ///
    /// One water band at height 0, colored as the accent's complement at half
    /// lightness, then `num_terrains - 1` land bands whose thresholds are
    /// evenly spaced from `water_height` up to 1 and whose colors walk a Lab
    /// gradient from `base` to `accent`.
    pub fn build(num_terrains: u32, water_height: f64, base: Rgb, accent: Rgb) -> Self {
        let n = num_terrains.max(1);
        let water_color = accent.rotate_hue(180.0).scale_lightness(0.5);

        let mut bands = Vec::with_capacity(n as usize);
        bands.push(Terrain::new(WATER, water_color, 0.0));

        for i in 1..n {
            let gradient_t = i as f64 / (n - 1) as f64;
            let threshold_t = i as f64 / n as f64;
            bands.push(Terrain::new(
                i.to_string(),
                Rgb::lerp_lab(base, accent, gradient_t),
                water_height + (1.0 - water_height) * threshold_t,
            ));
        }

        Self::new(bands)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Terrain> {
        self.bands.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&Terrain> {
        self.bands.iter().find(|t| t.name == name)
    }

    /// First band (highest threshold first) whose start is at or below `height`
    pub fn at_height(&self, height: f64) -> Option<&Terrain> {
        self.bands.iter().find(|t| t.start_height <= height)
    }

    /// Position of the band `at_height` would return, counted from the top
    pub fn index_at_height(&self, height: f64) -> Option<usize> {
        self.bands.iter().position(|t| t.start_height <= height)
    }
}

/// Height and band lookup for points on the sphere surface.
#[derive(Clone, Copy)]
pub struct TerrainModel<'a> {
    noise: &'a NoiseField,
    terrains: &'a TerrainSet,
}

impl<'a> TerrainModel<'a> {
    pub fn new(noise: &'a NoiseField, terrains: &'a TerrainSet) -> Self {
        Self { noise, terrains }
    }

    /// Three octaves at 2x, 4x and 16x frequency, weighted 1, 0.5 and 0.125.
    /// The base octave is lifted by 0.5; the sum is floored at 0.
    pub fn height_at(&self, p: Vec3) -> f64 {
        let p1 = p * 2.0;
        let n1 = self.noise.sample(p1.x, p1.y, p1.z) + 0.5;

        let p2 = p1 * 2.0;
        let n2 = self.noise.sample(p2.x, p2.y, p2.z) * 0.5;

        let p3 = p2 * 4.0;
        let n3 = self.noise.sample(p3.x, p3.y, p3.z) * 0.125;

        (n1 + n2 + n3).max(0.0)
    }

    /// Band at `p`, or the error sentinel if nothing matches
    pub fn terrain_at(&self, p: Vec3) -> &'a Terrain {
        self.terrains
            .at_height(self.height_at(p))
            .unwrap_or(Terrain::error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_set() -> TerrainSet {
        TerrainSet::build(4, 0.5, Rgb::from_hex(0xa4be92), Rgb::from_hex(0xf5dac3))
    }

    #[test]
    fn test_build_layout() {
        let set = default_set();
        assert_eq!(set.len(), 4);
        let starts: Vec<f64> = set.iter().map(|t| t.start_height).collect();
        assert_eq!(starts, vec![0.875, 0.75, 0.625, 0.0]);
        let names: Vec<&str> = set.iter().map(|t| &*t.name).collect();
        assert_eq!(names, vec!["3", "2", "1", "water"]);
    }

    #[test]
    fn test_top_band_is_accent() {
        let accent = Rgb::from_hex(0xf5dac3);
        let set = default_set();
        let top = set.iter().next().unwrap().color;
        assert!((top.r as i16 - accent.r as i16).abs() <= 1);
        assert!((top.g as i16 - accent.g as i16).abs() <= 1);
        assert!((top.b as i16 - accent.b as i16).abs() <= 1);
    }

    #[test]
    fn test_water_color_is_dark_complement() {
        let accent = Rgb::from_hex(0xf5dac3);
        let set = default_set();
        let water = set.by_name(WATER).unwrap();
        assert!(water.color.to_lab().l < accent.to_lab().l);
        assert!(set.by_name("nope").is_none());
    }

    #[test]
    fn test_zero_height_is_water_for_all_configs() {
        for n in 2..=8 {
            for w in [0.0, 0.1, 0.5, 0.9, 1.0] {
                let set = TerrainSet::build(n, w, Rgb::from_hex(0x102030), Rgb::from_hex(0xffeedd));
                assert_eq!(set.len(), n as usize);
                assert_eq!(set.at_height(0.0).unwrap().name, WATER);
            }
        }
    }

    #[test]
    fn test_band_monotonic_in_height() {
        let set = TerrainSet::build(8, 0.3, Rgb::from_hex(0x334455), Rgb::from_hex(0xccbbaa));
        let mut prev_start = f64::NEG_INFINITY;
        for i in 0..=400 {
            let h = i as f64 * 0.005;
            let band = set.at_height(h).unwrap();
            assert!(band.start_height >= prev_start, "band regressed at h={}", h);
            assert!(band.start_height <= h);
            prev_start = band.start_height;
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        let set = default_set();
        assert_eq!(set.at_height(0.4999).unwrap().name, WATER);
        assert_eq!(set.at_height(0.625).unwrap().name, "1");
        assert_eq!(set.at_height(0.7).unwrap().name, "1");
        assert_eq!(set.at_height(5.0).unwrap().name, "3");
        assert_eq!(set.index_at_height(5.0), Some(0));
        assert_eq!(set.index_at_height(0.0), Some(3));
    }

    #[test]
    fn test_empty_set_yields_sentinel() {
        let noise = NoiseField::new(1);
        let empty = TerrainSet::default();
        assert!(empty.at_height(0.3).is_none());
        let model = TerrainModel::new(&noise, &empty);
        let t = model.terrain_at(Vec3::new(0.0, 0.0, 0.7));
        assert!(t.is_error());
        assert_eq!(t.color, Rgb::new(255, 0, 255));
    }

    #[test]
    fn test_height_is_never_negative() {
        let noise = NoiseField::new(77);
        let set = default_set();
        let model = TerrainModel::new(&noise, &set);
        for i in 0..500 {
            let a = i as f64 * 0.37;
            let p = Vec3::from_spherical(0.7, a, a * 0.53);
            let h = model.height_at(p);
            assert!(h >= 0.0);
            assert!(!model.terrain_at(p).is_error());
        }
    }
}
