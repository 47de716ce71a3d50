//! # ISOVALE World Generation Front-End
//!
//! Headless binary: loads an optional `isovale.toml`, generates the world,
//! and prints a census/timing report. The grid it produces is exactly what
//! the renderer and physics consume, so this doubles as a smoke test of the
//! full generation surface.

use std::path::Path;
use std::time::Instant;

use serde::Deserialize;

use isovale_procedural::biome::{MOUNTAIN_LEVEL, WATER_LEVEL};
use isovale_procedural::{generate_world, WorldGrid, WORLD_HEIGHT, WORLD_WIDTH};

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "isovale.toml";

/// World generation parameters, loaded once at startup.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GenerationConfig {
    /// World width in tiles.
    width: i32,
    /// World height in tiles.
    height: i32,
    /// World seed.
    seed: u32,
}

impl Default for GenerationConfig {
    #[allow(clippy::cast_possible_wrap)]
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH as i32,
            height: WORLD_HEIGHT as i32,
            seed: 1,
        }
    }
}

/// Loads the config file if present, defaults otherwise.
fn load_config(path: &Path) -> Result<GenerationConfig, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(GenerationConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Prints the water/land/mountain census for a generated grid.
fn print_census(world: &WorldGrid) {
    let mut water = 0usize;
    let mut land = 0usize;
    let mut mountain = 0usize;

    for tile in world.tiles() {
        #[allow(clippy::cast_precision_loss)]
        let elevation = tile.elevation as f32;
        if elevation < WATER_LEVEL {
            water += 1;
        } else if elevation > MOUNTAIN_LEVEL {
            mountain += 1;
        } else {
            land += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let pct = |n: usize| 100.0 * n as f64 / world.len() as f64;
    println!("Water tiles:    {water} ({:.1}%)", pct(water));
    println!("Land tiles:     {land} ({:.1}%)", pct(land));
    println!("Mountain tiles: {mountain} ({:.1}%)", pct(mountain));
}

fn main() {
    let config = match load_config(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("isovale: failed to load {CONFIG_PATH}: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "Generating {}x{} world (seed {})...",
        config.width, config.height, config.seed
    );

    let start = Instant::now();
    let world = match generate_world(config.width, config.height, config.seed) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("isovale: {err}");
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    println!("World generation complete in {elapsed:?}");
    print_census(&world);
}
