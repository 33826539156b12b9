//! Planet traits
//!
//! The numeric and color parameters a planet is derived from. Traits are a
//! value object: edits produce a validated copy, and anything out of range is
//! rejected here so the renderer never sees it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

pub const MIN_TERRAINS: u32 = 2;
pub const MAX_TERRAINS: u32 = 8;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraitError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("size must be greater than 0")]
    ZeroSize,
    #[error("terrain count {0} is outside {MIN_TERRAINS}..={MAX_TERRAINS}")]
    TerrainCount(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traits {
    pub seed: u32,
    /// Sphere radius in normalized screen units
    pub size: f64,
    /// Height separating the water band from land
    pub water: f64,
    pub atmo_density: f64,
    pub cloud_density: f64,
    pub base_color: Rgb,
    pub acc_color: Rgb,
    pub num_terrains: u32,
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            seed: 0x42069,
            size: 0.7,
            water: 0.5,
            atmo_density: 0.5,
            cloud_density: 0.5,
            base_color: Rgb::from_hex(0xa4be92),
            acc_color: Rgb::from_hex(0xf5dac3),
            num_terrains: 4,
        }
    }
}

/// A single-field change requested by the editing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraitEdit {
    Seed(u32),
    Size(f64),
    Water(f64),
    AtmoDensity(f64),
    CloudDensity(f64),
    BaseColor(Rgb),
    AccColor(Rgb),
    NumTerrains(u32),
}

/// Which trait an interactive control is pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitField {
    Seed,
    Size,
    Water,
    AtmoDensity,
    CloudDensity,
    BaseColor,
    AccColor,
    NumTerrains,
}

impl TraitField {
    pub const ALL: [TraitField; 8] = [
        TraitField::Seed,
        TraitField::Size,
        TraitField::Water,
        TraitField::AtmoDensity,
        TraitField::CloudDensity,
        TraitField::BaseColor,
        TraitField::AccColor,
        TraitField::NumTerrains,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TraitField::Seed => "seed",
            TraitField::Size => "size",
            TraitField::Water => "water",
            TraitField::AtmoDensity => "atmo_density",
            TraitField::CloudDensity => "cloud_density",
            TraitField::BaseColor => "base_color",
            TraitField::AccColor => "acc_color",
            TraitField::NumTerrains => "num_terrains",
        }
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), TraitError> {
    if !value.is_finite() {
        return Err(TraitError::NotFinite { name, value });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(TraitError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

impl Traits {
    pub fn validate(&self) -> Result<(), TraitError> {
        check_unit("size", self.size)?;
        if self.size <= 0.0 {
            return Err(TraitError::ZeroSize);
        }
        check_unit("water", self.water)?;
        check_unit("atmo_density", self.atmo_density)?;
        check_unit("cloud_density", self.cloud_density)?;
        if !(MIN_TERRAINS..=MAX_TERRAINS).contains(&self.num_terrains) {
            return Err(TraitError::TerrainCount(self.num_terrains));
        }
        Ok(())
    }

    /// Copy with one field replaced, or an error if the result is invalid
    pub fn apply(&self, edit: TraitEdit) -> Result<Traits, TraitError> {
        let mut next = *self;
        match edit {
            TraitEdit::Seed(v) => next.seed = v,
            TraitEdit::Size(v) => next.size = v,
            TraitEdit::Water(v) => next.water = v,
            TraitEdit::AtmoDensity(v) => next.atmo_density = v,
            TraitEdit::CloudDensity(v) => next.cloud_density = v,
            TraitEdit::BaseColor(c) => next.base_color = c,
            TraitEdit::AccColor(c) => next.acc_color = c,
            TraitEdit::NumTerrains(n) => next.num_terrains = n,
        }
        next.validate()?;
        Ok(next)
    }

    /// Edit that moves `field` by `steps` increments.
    /// Scalars step by 0.05, colors rotate hue by 15 degrees per step.
    pub fn nudge(&self, field: TraitField, steps: i32) -> TraitEdit {
        let delta = steps as f64 * 0.05;
        match field {
            TraitField::Seed => TraitEdit::Seed(self.seed.wrapping_add_signed(steps)),
            TraitField::Size => TraitEdit::Size(self.size + delta),
            TraitField::Water => TraitEdit::Water(self.water + delta),
            TraitField::AtmoDensity => TraitEdit::AtmoDensity(self.atmo_density + delta),
            TraitField::CloudDensity => TraitEdit::CloudDensity(self.cloud_density + delta),
            TraitField::BaseColor => {
                TraitEdit::BaseColor(self.base_color.rotate_hue(steps as f64 * 15.0))
            },
            TraitField::AccColor => {
                TraitEdit::AccColor(self.acc_color.rotate_hue(steps as f64 * 15.0))
            },
            TraitField::NumTerrains => {
                TraitEdit::NumTerrains(self.num_terrains.saturating_add_signed(steps))
            },
        }
    }

    /// Fresh traits drawn uniformly from each field's range
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut random_color = || Rgb::new(rng.gen(), rng.gen(), rng.gen()).desaturate(1.0);
        let base_color = random_color();
        let acc_color = random_color();
        Self {
            seed: rng.gen(),
            size: rng.gen_range(0.3..1.0),
            water: rng.gen(),
            atmo_density: rng.gen(),
            cloud_density: rng.gen(),
            base_color,
            acc_color,
            num_terrains: (rng.gen::<f64>() * 6.0).round() as u32 + MIN_TERRAINS,
        }
    }
}
