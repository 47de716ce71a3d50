//! # Terrain Synthesizer
//!
//! Builds the world tile grid from layered noise in four strict passes:
//!
//! 1. **Raw fields**: elevation, moisture and river noise per cell, with a
//!    radial island falloff biasing landmass toward the map center
//! 2. **Hydrological carving**: monotone clamps that cut river channels,
//!    tributaries and lakes below the water table
//! 3. **Neighborhood smoothing**: 3x3 mean blend over a snapshot of the
//!    previous pass, leaving underwater cells untouched so shorelines and
//!    channels stay crisp
//! 4. **Finalization**: biome classification, integer elevation, walkability
//!    and jittered tile color
//!
//! The intermediate cell grid is private to this module and discarded once
//! the tile grid is built. The returned [`WorldGrid`] is read-only for the
//! rest of the program's life.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::biome::{classify, Rgba, MOUNTAIN_LEVEL, WATER_LEVEL};
use crate::error::{WorldGenError, WorldGenResult};
use crate::noise::LayeredNoise;

/// Default world width in tiles.
pub const WORLD_WIDTH: u32 = 128;
/// Default world height in tiles.
pub const WORLD_HEIGHT: u32 = 128;

/// Octave count for the continent landmass layer.
pub const CONTINENT_OCTAVES: u32 = 4;
/// Octave count for the fine terrain detail layer.
pub const TERRAIN_OCTAVES: u32 = 6;
/// Octave count for the river layer.
pub const RIVER_OCTAVES: u32 = 2;
/// River noise above this value carves a channel.
pub const RIVER_THRESHOLD: f32 = 0.82;

/// Maximum per-channel color jitter applied to tile colors.
const COLOR_JITTER: i32 = 5;

/// Intermediate per-cell terrain attributes.
///
/// Mutated across the generation passes and never exposed outside the
/// synthesizer.
#[derive(Clone, Copy, Debug, Default)]
struct TerrainCell {
    elevation: f32,
    moisture: f32,
    river_value: f32,
}

/// One output tile of the generated world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Grid X coordinate.
    pub x: i32,
    /// Grid Y coordinate.
    pub y: i32,
    /// Terrain elevation, truncated toward zero.
    pub elevation: i32,
    /// Display color: biome base color plus cosmetic jitter.
    pub color: Rgba,
    /// Whether the player can stand on this tile.
    pub walkable: bool,
}

/// The generated world: a fixed-size, fully populated tile grid.
///
/// Row-major storage; never resized. External collaborators (renderer,
/// physics) read it and must never mutate it.
pub struct WorldGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// Grid width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if the grid holds no tiles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns the tile at `(x, y)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        if x < self.width && y < self.height {
            self.tiles.get((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// All tiles in row-major order.
    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

/// Radial falloff from the map center, in normalized coordinates.
///
/// 1.0 at the center, 0.0 at the corners; square-rooted to soften the edge.
fn island_factor(nx: f32, ny: f32) -> f32 {
    let dx = nx - 0.5;
    let dy = ny - 0.5;
    let distance = (dx * dx + dy * dy).sqrt() * 2.0;
    (1.0 - distance.min(1.0)).sqrt()
}

/// World generator holding the five pre-built noise stacks.
///
/// Constructed once per `(width, height, seed)`; generation itself takes
/// `&self` and is a pure computation apart from the cosmetic color jitter.
pub struct WorldGenerator {
    width: u32,
    height: u32,
    seed: u32,
    /// Large-scale low-frequency landmass shape.
    continent: LayeredNoise,
    /// Fine terrain detail.
    detail: LayeredNoise,
    /// Moisture field for biome tiebreaks and lake formation.
    moisture: LayeredNoise,
    /// River channel field.
    river: LayeredNoise,
    /// Folded into sharp mountain ridges in pass 1.
    ridge: LayeredNoise,
}

impl WorldGenerator {
    /// Seed offset of the continent layer.
    const CONTINENT_SEED: u32 = 1;
    /// Seed offset of the detail layer.
    const DETAIL_SEED: u32 = 2;
    /// Seed offset of the moisture layer.
    const MOISTURE_SEED: u32 = 3;
    /// Seed offset of the river layer.
    const RIVER_SEED: u32 = 4;
    /// Seed offset of the mountain ridge layer.
    const RIDGE_SEED: u32 = 5;

    /// Creates a generator for a `width` x `height` world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::InvalidDimension`] if either dimension is
    /// not positive. No generation work happens before this check.
    pub fn new(width: i32, height: i32, seed: u32) -> WorldGenResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(WorldGenError::InvalidDimension { width, height });
        }

        #[allow(clippy::cast_sign_loss)]
        let (width, height) = (width as u32, height as u32);

        Ok(Self {
            width,
            height,
            seed,
            continent: LayeredNoise::new(
                seed.wrapping_add(Self::CONTINENT_SEED),
                CONTINENT_OCTAVES,
                0.6,
                0.5,
            ),
            detail: LayeredNoise::new(
                seed.wrapping_add(Self::DETAIL_SEED),
                TERRAIN_OCTAVES,
                0.5,
                2.0,
            ),
            moisture: LayeredNoise::new(seed.wrapping_add(Self::MOISTURE_SEED), 4, 0.5, 2.0),
            river: LayeredNoise::new(seed.wrapping_add(Self::RIVER_SEED), RIVER_OCTAVES, 0.7, 3.0),
            ridge: LayeredNoise::new(seed.wrapping_add(Self::RIDGE_SEED), 4, 0.7, 1.5),
        })
    }

    /// Grid width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Generates the world with an entropy-seeded jitter source.
    ///
    /// Terrain shape is fully determined by the generator's seed; only the
    /// cosmetic per-tile color jitter draws from the entropy source.
    #[must_use]
    pub fn generate(&self) -> WorldGrid {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(&mut rng)
    }

    /// Generates the world, drawing color jitter from `rng`.
    ///
    /// Passing a fixed-seed source makes the output bit-reproducible,
    /// colors included.
    pub fn generate_with_rng<R: Rng>(&self, rng: &mut R) -> WorldGrid {
        let mut cells = self.synthesize_fields();
        Self::carve_water(&mut cells);
        Self::smooth_elevation(&mut cells, self.width as usize, self.height as usize);
        let grid = self.finalize(&cells, rng);
        self.log_census(&grid);
        grid
    }

    /// Pass 1: raw elevation/moisture/river fields from the noise stacks.
    fn synthesize_fields(&self) -> Vec<TerrainCell> {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut cells = Vec::with_capacity(w * h);

        for y in 0..h {
            for x in 0..w {
                #[allow(clippy::cast_precision_loss)]
                let (nx, ny) = (x as f32 / self.width as f32, y as f32 / self.height as f32);

                let continent_shape = self.continent.sample(nx * 0.5, ny * 0.5);
                let terrain_detail = self.detail.sample(nx * 5.0, ny * 5.0);

                // Ridged noise: fold the signal around its midpoint and cube
                // it so ridges come out sharp and narrow
                let folded = 1.0 - (self.ridge.sample(nx * 3.0, ny * 3.0) * 2.0 - 1.0).abs();
                let mountain_ridge = folded * folded * folded;

                let moisture = self.moisture.sample(nx * 4.0, ny * 4.0);
                let river_value = self.river.sample(nx * 8.0, ny * 8.0);

                // Attenuate toward the map edges; the +0.3 floor keeps edges
                // at 30% of their unattenuated elevation
                let island = island_factor(nx, ny);
                let elevation = (continent_shape * 0.5
                    + terrain_detail * 0.2
                    + mountain_ridge * 0.3)
                    * 100.0
                    * (island * 0.7 + 0.3);

                cells.push(TerrainCell {
                    elevation,
                    moisture,
                    river_value,
                });
            }
        }

        cells
    }

    /// Pass 2: hydrological carving.
    ///
    /// Three independent monotone clamps per cell; none can ever raise
    /// elevation, so their order does not matter.
    fn carve_water(cells: &mut [TerrainCell]) {
        for cell in cells {
            Self::carve_cell(cell);
        }
    }

    /// Applies the river, tributary and lake clamps to one cell.
    fn carve_cell(cell: &mut TerrainCell) {
        // Main channel: depth grows with how far the noise exceeds the
        // threshold
        if cell.river_value > RIVER_THRESHOLD {
            let strength = (cell.river_value - RIVER_THRESHOLD) / (1.0 - RIVER_THRESHOLD);
            cell.elevation = cell.elevation.min(WATER_LEVEL - strength * 5.0);
        }

        // Tributary band: borderline cells still dip below the water table
        if cell.river_value > RIVER_THRESHOLD - 0.1 && cell.river_value <= RIVER_THRESHOLD {
            cell.elevation = cell.elevation.min(WATER_LEVEL - 1.0);
        }

        // Lakes form in low, wet basins regardless of river noise
        if cell.elevation < WATER_LEVEL + 5.0 && cell.moisture > 0.7 {
            cell.elevation = cell.elevation.min(WATER_LEVEL - 2.0);
        }
    }

    /// Pass 3: 3x3 neighborhood smoothing over a snapshot of the grid.
    ///
    /// Neighbor reads come from the pre-pass elevations (full double
    /// buffer); writing in place would corrupt later cells' inputs. Cells at
    /// or below the water level keep their exact elevation so water shapes
    /// stay crisp.
    fn smooth_elevation(cells: &mut [TerrainCell], width: usize, height: usize) {
        let before: Vec<f32> = cells.iter().map(|c| c.elevation).collect();

        for y in 0..height {
            for x in 0..width {
                let own = before[y * width + x];
                if own <= WATER_LEVEL {
                    continue;
                }

                // Bounded 3x3 window: 9 cells inside, 6 on edges, 4 at
                // corners; no wraparound
                let mut total = 0.0;
                let mut count = 0u32;
                for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                        total += before[ny * width + nx];
                        count += 1;
                    }
                }

                #[allow(clippy::cast_precision_loss)]
                let mean = total / count as f32;
                cells[y * width + x].elevation = mean * 0.7 + own * 0.3;
            }
        }
    }

    /// Pass 4: biome classification and tile emission.
    fn finalize<R: Rng>(&self, cells: &[TerrainCell], rng: &mut R) -> WorldGrid {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut tiles = Vec::with_capacity(w * h);

        for y in 0..h {
            for x in 0..w {
                let cell = &cells[y * w + x];
                let biome = classify(cell.elevation, cell.moisture);
                let props = biome.properties();

                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                tiles.push(Tile {
                    x: x as i32,
                    y: y as i32,
                    elevation: cell.elevation as i32,
                    color: jitter_color(props.base_color, rng),
                    walkable: props.walkable,
                });
            }
        }

        WorldGrid {
            width: self.width,
            height: self.height,
            tiles,
        }
    }

    /// Logs the water/land/mountain tile census for the generated grid.
    fn log_census(&self, grid: &WorldGrid) {
        let mut water = 0usize;
        let mut land = 0usize;
        let mut mountain = 0usize;

        for tile in grid.tiles() {
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
        let pct = |n: usize| 100.0 * n as f32 / grid.len() as f32;
        tracing::info!(
            "World generation complete: {}x{} seed {} - water {water} ({:.1}%), land {land} ({:.1}%), mountain {mountain} ({:.1}%)",
            grid.width(),
            grid.height(),
            self.seed,
            pct(water),
            pct(land),
            pct(mountain),
        );
    }
}

/// Adds independent per-channel jitter in `[-5, 5]`, clamped to `[0, 255]`.
///
/// Cosmetic only; never mixed into elevation, moisture or biome state.
fn jitter_color<R: Rng>(base: Rgba, rng: &mut R) -> Rgba {
    let mut channel = |c: u8| -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let jittered = (i32::from(c) + rng.gen_range(-COLOR_JITTER..=COLOR_JITTER)).clamp(0, 255);
        jittered as u8
    };
    Rgba {
        r: channel(base.r),
        g: channel(base.g),
        b: channel(base.b),
        a: 255,
    }
}

/// Generates a world in one call: the sole high-level entry point.
///
/// Deterministic given `(width, height, seed)` except for the cosmetic
/// color jitter; use [`WorldGenerator::generate_with_rng`] to pin that too.
///
/// # Errors
///
/// Returns [`WorldGenError::InvalidDimension`] if either dimension is not
/// positive.
pub fn generate_world(width: i32, height: i32, seed: u32) -> WorldGenResult<WorldGrid> {
    Ok(WorldGenerator::new(width, height, seed)?.generate())
}

/// Analytic height query outside the main generation path.
///
/// A corner-to-corner slope with sinusoidal hills and a central radial
/// bump, in default-world normalized coordinates. Independent of the noise
/// engine and the generated grid.
#[must_use]
pub fn terrain_height(x: f32, y: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let (nx, ny) = (x / WORLD_WIDTH as f32, y / WORLD_HEIGHT as f32);

    let mut height = (nx + ny) * 50.0;
    height += 10.0 * (nx * 10.0).sin() * (ny * 10.0).cos();

    let dist_from_center = ((nx - 0.5).powi(2) + (ny - 0.5).powi(2)).sqrt();
    height + 40.0 * (1.0 - dist_from_center * 4.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert_eq!(
            WorldGenerator::new(0, 128, 1).err(),
            Some(WorldGenError::InvalidDimension {
                width: 0,
                height: 128
            })
        );
        assert_eq!(
            WorldGenerator::new(128, -4, 1).err(),
            Some(WorldGenError::InvalidDimension {
                width: 128,
                height: -4
            })
        );
        assert!(WorldGenerator::new(1, 1, 1).is_ok());
    }

    #[test]
    fn test_island_factor_profile() {
        // Maximal at the center, zero at the corners
        assert!((island_factor(0.5, 0.5) - 1.0).abs() < 1e-6);
        assert!(island_factor(0.0, 0.0) < 1e-6);
        assert!(island_factor(1.0, 1.0) < 1e-6);

        // Monotone falloff along a radius
        let near = island_factor(0.55, 0.5);
        let far = island_factor(0.9, 0.5);
        assert!(near > far, "Falloff should decrease outward: {near} vs {far}");
    }

    #[test]
    fn test_carving_is_monotone() {
        let gen = WorldGenerator::new(32, 32, 1).unwrap();
        let before = gen.synthesize_fields();
        let mut after = before.clone();
        WorldGenerator::carve_water(&mut after);

        for (b, a) in before.iter().zip(&after) {
            assert!(
                a.elevation <= b.elevation,
                "Carving must never raise elevation: {} -> {}",
                b.elevation,
                a.elevation
            );
            assert_eq!(a.moisture, b.moisture);
            assert_eq!(a.river_value, b.river_value);
        }
    }

    #[test]
    fn test_river_channel_clamp() {
        let mut cell = TerrainCell {
            elevation: 60.0,
            moisture: 0.0,
            river_value: 0.91,
        };
        WorldGenerator::carve_cell(&mut cell);

        let strength = (0.91 - RIVER_THRESHOLD) / (1.0 - RIVER_THRESHOLD);
        let expected = WATER_LEVEL - strength * 5.0;
        assert!((cell.elevation - expected).abs() < 1e-4);
        assert!(cell.elevation < WATER_LEVEL);
    }

    #[test]
    fn test_tributary_band_clamp() {
        // Inside the half-open band (THRESHOLD - 0.1, THRESHOLD]
        let mut cell = TerrainCell {
            elevation: 50.0,
            moisture: 0.0,
            river_value: RIVER_THRESHOLD,
        };
        WorldGenerator::carve_cell(&mut cell);
        assert!((cell.elevation - (WATER_LEVEL - 1.0)).abs() < 1e-6);

        // Just below the band: untouched
        let mut dry = TerrainCell {
            elevation: 50.0,
            moisture: 0.0,
            river_value: RIVER_THRESHOLD - 0.1,
        };
        WorldGenerator::carve_cell(&mut dry);
        assert!((dry.elevation - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_lake_clamp() {
        let mut wet_basin = TerrainCell {
            elevation: WATER_LEVEL + 4.0,
            moisture: 0.8,
            river_value: 0.0,
        };
        WorldGenerator::carve_cell(&mut wet_basin);
        assert!((wet_basin.elevation - (WATER_LEVEL - 2.0)).abs() < 1e-6);

        // Same basin but dry: untouched
        let mut dry_basin = TerrainCell {
            elevation: WATER_LEVEL + 4.0,
            moisture: 0.5,
            river_value: 0.0,
        };
        WorldGenerator::carve_cell(&mut dry_basin);
        assert!((dry_basin.elevation - (WATER_LEVEL + 4.0)).abs() < 1e-6);

        // High ground stays dry no matter the moisture
        let mut high = TerrainCell {
            elevation: WATER_LEVEL + 6.0,
            moisture: 0.9,
            river_value: 0.0,
        };
        WorldGenerator::carve_cell(&mut high);
        assert!((high.elevation - (WATER_LEVEL + 6.0)).abs() < 1e-6);
    }

    fn flat_cells(elevations: &[f32]) -> Vec<TerrainCell> {
        elevations
            .iter()
            .map(|&elevation| TerrainCell {
                elevation,
                moisture: 0.0,
                river_value: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_smoothing_leaves_water_untouched() {
        // Center cell is underwater, surrounded by high ground
        let mut cells = flat_cells(&[50.0, 50.0, 50.0, 50.0, 10.0, 50.0, 50.0, 50.0, 50.0]);
        WorldGenerator::smooth_elevation(&mut cells, 3, 3);
        assert!(
            (cells[4].elevation - 10.0).abs() < 1e-6,
            "Water cell must keep its exact pre-pass elevation"
        );
    }

    #[test]
    fn test_smoothing_blends_land() {
        let mut cells = flat_cells(&[30.0, 30.0, 30.0, 30.0, 60.0, 30.0, 30.0, 30.0, 30.0]);
        WorldGenerator::smooth_elevation(&mut cells, 3, 3);

        // Full 9-cell window at the center: mean = (8*30 + 60) / 9
        let mean = (8.0 * 30.0 + 60.0) / 9.0;
        let expected = mean * 0.7 + 60.0 * 0.3;
        assert!(
            (cells[4].elevation - expected).abs() < 1e-4,
            "Expected {expected}, got {}",
            cells[4].elevation
        );
    }

    #[test]
    fn test_smoothing_window_clamps_at_edges() {
        // Corner cell averages over 4 cells, edge cells over 6
        let mut cells = flat_cells(&[40.0, 40.0, 40.0, 40.0, 40.0, 40.0, 40.0, 40.0, 40.0]);
        cells[0].elevation = 76.0;
        let own = 76.0;
        WorldGenerator::smooth_elevation(&mut cells, 3, 3);

        let corner_mean = (76.0 + 40.0 + 40.0 + 40.0) / 4.0;
        let expected = corner_mean * 0.7 + own * 0.3;
        assert!(
            (cells[0].elevation - expected).abs() < 1e-4,
            "Expected {expected}, got {}",
            cells[0].elevation
        );
    }

    #[test]
    fn test_smoothing_reads_prepass_snapshot() {
        // A raster-order in-place pass would smooth cell 1 against cell 0's
        // already-smoothed value; the double buffer must not
        let mut cells = flat_cells(&[90.0, 30.0, 30.0, 30.0]);
        WorldGenerator::smooth_elevation(&mut cells, 2, 2);

        let mean = (90.0 + 30.0 + 30.0 + 30.0) / 4.0;
        let expected = mean * 0.7 + 30.0 * 0.3;
        assert!(
            (cells[1].elevation - expected).abs() < 1e-4,
            "Neighbor reads must come from the pre-pass grid"
        );
    }

    #[test]
    fn test_color_jitter_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let base = Rgba::opaque(21, 120, 35);
        for _ in 0..200 {
            let c = jitter_color(base, &mut rng);
            assert!((16..=26).contains(&c.r));
            assert!((115..=125).contains(&c.g));
            assert!((30..=40).contains(&c.b));
            assert_eq!(c.a, 255);
        }
    }

    #[test]
    fn test_color_jitter_clamps_at_channel_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let white = jitter_color(Rgba::opaque(255, 255, 255), &mut rng);
            assert!(white.r >= 250 && white.g >= 250 && white.b >= 250);

            let dark = jitter_color(Rgba::opaque(0, 64, 220), &mut rng);
            assert!(dark.r <= 5);
        }
    }

    #[test]
    fn test_terrain_height_analytic_shape() {
        // Central radial bump: the +40 term is active at the center and
        // zero beyond a quarter of the map from it
        let center = terrain_height(64.0, 64.0);
        let off_bump = terrain_height(0.0, 64.0);
        assert!(center > off_bump, "{center} should exceed {off_bump}");

        // Corner-to-corner slope dominates away from the bump
        assert!(terrain_height(120.0, 120.0) > terrain_height(8.0, 8.0));
    }

    #[test]
    fn test_elevation_truncates_toward_zero() {
        let gen = WorldGenerator::new(16, 16, 3).unwrap();
        let cells = vec![
            TerrainCell {
                elevation: 7.9,
                moisture: 0.0,
                river_value: 0.0
            };
            256
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let grid = gen.finalize(&cells, &mut rng);
        assert_eq!(grid.get(5, 5).unwrap().elevation, 7);
    }
}
