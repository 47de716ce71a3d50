//! # Biome Classification
//!
//! Maps terrain attributes to discrete biomes.
//!
//! Classification is elevation-first: the elevation band picks the biome
//! outright except in the Plains and Hills bands, where moisture decides
//! between open ground and forest.

/// Elevation below which terrain is under water.
pub const WATER_LEVEL: f32 = 20.0;
/// Upper elevation bound of beaches.
pub const BEACH_LEVEL: f32 = 23.0;
/// Upper elevation bound of the plains/forest band.
pub const PLAINS_LEVEL: f32 = 35.0;
/// Upper elevation bound of the hills band.
pub const HILLS_LEVEL: f32 = 50.0;
/// Upper elevation bound of bare mountains; above this lies snow.
pub const MOUNTAIN_LEVEL: f32 = 70.0;

/// An RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Biome types, ordered by increasing elevation threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BiomeKind {
    /// Deep ocean and carved river channels.
    DeepWater = 0,
    /// Shallow water near shorelines.
    ShallowWater = 1,
    /// Sandy coastline.
    Beach = 2,
    /// Open grassland.
    Plains = 3,
    /// Forest (moist lowlands and hillsides).
    Forest = 4,
    /// Dry highlands.
    Hills = 5,
    /// Rocky mountains.
    Mountains = 6,
    /// Snow-capped peaks.
    SnowCaps = 7,
}

/// Static per-biome rendering and gameplay attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeProperties {
    /// Base tile color before cosmetic jitter.
    pub base_color: Rgba,
    /// Vertical exaggeration applied by the renderer.
    pub height_modifier: f32,
    /// Surface roughness hint for the renderer.
    pub roughness: f32,
    /// Whether the player can stand on this biome.
    pub walkable: bool,
}

impl BiomeKind {
    /// Returns the static properties for this biome.
    #[must_use]
    pub const fn properties(self) -> BiomeProperties {
        match self {
            Self::DeepWater => BiomeProperties {
                base_color: Rgba::opaque(0, 64, 220),
                height_modifier: 0.3,
                roughness: 0.1,
                walkable: false,
            },
            Self::ShallowWater => BiomeProperties {
                base_color: Rgba::opaque(0, 128, 255),
                height_modifier: 0.5,
                roughness: 0.2,
                walkable: false,
            },
            Self::Beach => BiomeProperties {
                base_color: Rgba::opaque(240, 220, 180),
                height_modifier: 0.6,
                roughness: 0.2,
                walkable: true,
            },
            Self::Plains => BiomeProperties {
                base_color: Rgba::opaque(100, 210, 100),
                height_modifier: 1.0,
                roughness: 0.3,
                walkable: true,
            },
            Self::Forest => BiomeProperties {
                base_color: Rgba::opaque(21, 120, 35),
                height_modifier: 1.1,
                roughness: 0.4,
                walkable: true,
            },
            Self::Hills => BiomeProperties {
                base_color: Rgba::opaque(90, 160, 90),
                height_modifier: 1.2,
                roughness: 0.6,
                walkable: true,
            },
            Self::Mountains => BiomeProperties {
                base_color: Rgba::opaque(150, 140, 130),
                height_modifier: 1.5,
                roughness: 0.8,
                walkable: false,
            },
            Self::SnowCaps => BiomeProperties {
                base_color: Rgba::opaque(255, 255, 255),
                height_modifier: 1.6,
                roughness: 0.9,
                walkable: false,
            },
        }
    }

    /// Returns whether the player can stand on this biome.
    #[inline]
    #[must_use]
    pub const fn walkable(self) -> bool {
        self.properties().walkable
    }
}

/// Classifies a cell into exactly one biome.
///
/// Elevation picks the band; moisture decides Plains-vs-Forest and
/// Hills-vs-Forest inside the two mid bands. Total over every `(elevation,
/// moisture)` pair, including values equal to the threshold constants.
#[must_use]
pub fn classify(elevation: f32, moisture: f32) -> BiomeKind {
    // Water biomes based on depth
    if elevation < WATER_LEVEL - 5.0 {
        return BiomeKind::DeepWater;
    }
    if elevation < WATER_LEVEL {
        return BiomeKind::ShallowWater;
    }

    // Beach and coastal areas
    if elevation < BEACH_LEVEL {
        return BiomeKind::Beach;
    }

    // Lowlands: plains or forest by moisture
    if elevation < PLAINS_LEVEL {
        if moisture < 0.6 {
            return BiomeKind::Plains;
        }
        return BiomeKind::Forest;
    }

    // Highlands: dry hills or forested hillsides
    if elevation < HILLS_LEVEL {
        if moisture < 0.4 {
            return BiomeKind::Hills;
        }
        return BiomeKind::Forest;
    }

    // Rocky mountains, then snow at the highest elevations
    if elevation < MOUNTAIN_LEVEL {
        return BiomeKind::Mountains;
    }
    BiomeKind::SnowCaps
}
