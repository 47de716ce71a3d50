//! # Perlin Noise Implementation
//!
//! Seeded, deterministic 2D gradient noise plus fractal octave layering.
//!
//! ## Determinism Guarantee
//!
//! A `Perlin` context is a pure function of its seed: the fixed base
//! permutation is shuffled with a seeded `ChaCha8Rng`, so the same seed
//! produces **exactly** the same table on any platform, any time. Sampling
//! takes `&self` and holds no interior mutability, so contexts are freely
//! shareable across threads.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The canonical base permutation of `0..=255`.
///
/// This is the fixed gradient-hash source; it is never used directly for
/// lookups but is shuffled per seed into a [`Perlin`] context.
const BASE_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225,
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148,
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32,
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54,
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64,
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213,
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9,
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104,
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241,
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93,
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
///
/// Eases interpolation weights so the noise field has continuous first and
/// second derivatives across unit-cell boundaries.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation `a + t(b - a)`.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Maps the low 4 bits of `hash` to a gradient dot-product with `(x, y)`.
///
/// Classic permutation-table gradient: residues 13 and 15 contribute no `v`
/// term, which this table variant relies on for its field shapes.
#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Seeded 2D Perlin noise context.
///
/// Holds the seeded permutation explicitly instead of caching it in process
/// globals, so a context is constructed once per seed and passed into every
/// sampling call.
///
/// # Example
///
/// ```rust,ignore
/// let noise = Perlin::new(42);
/// let value = noise.sample(10.5, 20.3);
/// assert!((-1.2..=1.2).contains(&value));
/// ```
pub struct Perlin {
    /// 512-entry seeded permutation (256 entries, doubled so corner hashing
    /// never needs modulo wraparound).
    perm: [u8; 512],
}

impl Perlin {
    /// Creates a noise context for `seed`.
    ///
    /// Shuffles a copy of the base permutation with a seeded Fisher-Yates
    /// pass, then doubles it to 512 entries.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        let mut table = BASE_PERMUTATION;
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);

        Self { perm }
    }

    /// Samples single-octave noise at `(x, y)`.
    ///
    /// # Returns
    ///
    /// A value approximately in `[-1, 1]` (gradient-noise theory bounds it
    /// near that range for this gradient set; it is not a hard contract).
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xf = x.floor();
        let yf = y.floor();

        // Unit-cell lattice coordinates. Masking the floored integer keeps
        // the wraparound non-negative even for negative inputs.
        let xi = (xf as i32 & 255) as usize;
        let yi = (yf as i32 & 255) as usize;

        // Fractional offset within the unit cell, always in [0, 1).
        let fx = x - xf;
        let fy = y - yf;

        let u = fade(fx);
        let v = fade(fy);

        // Hash the four cell corners through two permutation lookups each.
        let a = self.perm[xi] as usize + yi;
        let aa = self.perm[a];
        let ab = self.perm[a + 1];
        let b = self.perm[xi + 1] as usize + yi;
        let ba = self.perm[b];
        let bb = self.perm[b + 1];

        lerp(
            lerp(grad(aa, fx, fy), grad(ba, fx - 1.0, fy), u),
            lerp(grad(ab, fx, fy - 1.0), grad(bb, fx - 1.0, fy - 1.0), u),
            v,
        )
    }
}

/// Fractal (multi-octave) noise stack.
///
/// Each octave samples its own [`Perlin`] context built from `seed + i`,
/// so octaves sharing a base seed still sample decorrelated gradient fields.
/// Frequency starts at the base scale and doubles per octave; amplitude
/// decays by the persistence factor.
pub struct LayeredNoise {
    /// One seeded context per octave.
    layers: Vec<Perlin>,
    /// Per-octave amplitude decay.
    persistence: f32,
    /// Frequency of the first octave.
    base_frequency: f32,
}

impl LayeredNoise {
    /// Creates a fractal stack of `octaves` layers.
    ///
    /// Octave `i` uses seed `seed + i`; `scale` is the frequency of the
    /// first octave.
    #[must_use]
    pub fn new(seed: u32, octaves: u32, persistence: f32, scale: f32) -> Self {
        let layers = (0..octaves)
            .map(|i| Perlin::new(seed.wrapping_add(i)))
            .collect();
        Self {
            layers,
            persistence,
            base_frequency: scale,
        }
    }

    /// Samples the normalized fractal sum at `(x, y)`.
    ///
    /// # Returns
    ///
    /// A value approximately in `[-1, 1]`; exactly `0.0` for a zero-octave
    /// stack (the amplitude sum guard).
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.base_frequency;
        let mut max_value = 0.0;

        for layer in &self.layers {
            total += layer.sample(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= self.persistence;
            frequency *= 2.0;
        }

        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }

    /// Number of octaves in the stack.
    #[must_use]
    pub fn octaves(&self) -> usize {
        self.layers.len()
    }
}
