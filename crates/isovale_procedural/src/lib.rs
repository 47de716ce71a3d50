//! # ISOVALE Procedural Generation
//!
//! Deterministic terrain synthesis for a fixed-size isometric tile world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same terrain
//!    (cosmetic per-tile color jitter is the one deliberate exception)
//! 2. **Eager**: The whole grid is generated in one call and returned as
//!    an immutable snapshot; there is no streaming or incremental update
//! 3. **Layered**: The noise engine is a leaf dependency of the terrain
//!    synthesizer and knows nothing about tiles or biomes
//!
//! ## Core Components
//!
//! - `Perlin` / `LayeredNoise`: seeded 2D gradient noise and fractal layering
//! - `WorldGenerator`: the four-pass pipeline (raw fields, river carving,
//!   neighborhood smoothing, biome/tile finalization)
//! - `BiomeKind`: elevation/moisture classification into eight terrain types
//!
//! ## Example
//!
//! ```rust,ignore
//! use isovale_procedural::generate_world;
//!
//! let world = generate_world(128, 128, 1)?;
//! let corner = world.get(0, 0).unwrap();
//! assert_eq!(corner.elevation, 0); // rim attenuation pins the corner under water
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod error;
pub mod noise;
pub mod worldgen;

pub use biome::{classify, BiomeKind, BiomeProperties, Rgba};
pub use error::{WorldGenError, WorldGenResult};
pub use noise::{LayeredNoise, Perlin};
pub use worldgen::{
    generate_world, terrain_height, Tile, WorldGenerator, WorldGrid, WORLD_HEIGHT, WORLD_WIDTH,
};
