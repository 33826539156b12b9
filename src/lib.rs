//! Procedural planet generator
//!
//! A seed and a handful of traits deterministically produce a banded
//! terrain sphere, a posterized atmospheric halo and a shell of cloud
//! particles, all rasterized in software into an RGBA pixel buffer.

pub mod cli;
pub mod color;
pub mod config;
pub mod display;
pub mod logging;
pub mod math3d;
pub mod noise;
pub mod orbit;
pub mod particles;
pub mod planet;
pub mod render;
pub mod terrain;
pub mod traits;
pub mod util;

pub use color::Rgb;
pub use config::{AppConfig, ConfigError};
pub use display::{BlendMode, PixelBuffer};
pub use noise::NoiseField;
pub use orbit::{OrbitConfig, OrbitControl};
pub use particles::{CloudField, Occlusion, Particle, ParticleProjector};
pub use planet::Planet;
pub use render::{Camera, HaloCompositor, SphereProjector};
pub use terrain::{Terrain, TerrainModel, TerrainSet};
pub use traits::{TraitEdit, TraitError, TraitField, Traits};
