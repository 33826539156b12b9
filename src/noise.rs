//! Seeded Noise Field
//!
//! Classic 3D gradient noise over a seeded permutation table, plus the
//! string-hash driven `rand` stream used to shuffle that table and to place
//! cloud particles. Same seed, same table, same output: bit for bit.

/// Offset applied to every sample coordinate before the lattice lookup.
/// Keeps inputs near the origin (and small negatives) well inside the
/// positive range so the integer cell extraction never wraps.
const SAMPLE_OFFSET: f64 = 78151.135;

/// Scale from a signed 32-bit integer to [-0.5, 0.5).
const INV_2_32: f64 = 2.3283064365386963e-10;

const MASH_INIT: f64 = 4022871197.0;
const MASH_MULT: f64 = 0.02519603282416938;
const TWO_POW_32: f64 = 4294967296.0;

/// JavaScript-style `ToInt32`: truncate, wrap modulo 2^32, reinterpret signed.
/// The Mash hash is defined in terms of this conversion.
#[inline]
fn to_int32(v: f64) -> i32 {
    if !v.is_finite() {
        return 0;
    }
    v.trunc().rem_euclid(TWO_POW_32) as u32 as i32
}

/// Incremental string hash. Each call folds its input into the running
/// state, so the value returned depends on every earlier call too.
struct Mash {
    n: f64,
}

impl Mash {
    fn new() -> Self {
        Self { n: MASH_INIT }
    }

    fn mash(&mut self, data: &str) -> f64 {
        for byte in data.bytes() {
            self.n += f64::from(byte);
            let f = MASH_MULT * self.n - f64::from(to_int32(self.n * MASH_MULT));
            let t = f * f64::from(to_int32(MASH_MULT * self.n));
            let ti = f64::from(to_int32(t));
            self.n = TWO_POW_32 * (t - ti) + ti;
        }
        f64::from(to_int32(self.n)) * INV_2_32
    }
}

/// Quintic fade curve: 6t⁵ - 15t⁴ + 10t³
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the corner offset with one of the 12 edge gradients
/// (16 hash slots, four of them repeated).
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// Deterministic 3D noise source for one planet.
#[derive(Debug, Clone)]
pub struct NoiseField {
    seed: u32,
    /// 256-entry shuffle, stored twice so corner hashing never wraps.
    perm: Vec<u8>,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        let mut field = Self {
            seed,
            perm: Vec::with_capacity(512),
        };
        let mut table: Vec<u8> = (0..=255).collect();
        field.shuffle(&mut table);
        field.perm.extend_from_slice(&table);
        field.perm.extend_from_slice(&table);
        field
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The doubled permutation table (512 entries).
    pub fn permutation(&self) -> &[u8] {
        &self.perm
    }

    /// Seeded 1D pseudo-random value in [0, 1) for an integer token.
    ///
    /// A separate stream from `sample`: it is keyed by `token + seed` hashed
    /// as a decimal string, not by spatial position.
    pub fn rand(&self, token: u32) -> f64 {
        let mut m = Mash::new();
        let mut a = m.mash(" ");
        m.mash(" ");
        m.mash(" ");
        let key = (u64::from(token) + u64::from(self.seed)).to_string();
        a -= m.mash(&key);
        if a < 0.0 {
            a += 1.0;
        }
        let y = INV_2_32 + a * 2091639.0;
        y - f64::from(to_int32(y))
    }

    /// Fisher-Yates shuffle driven by `rand`, walking from the top index down.
    fn shuffle(&self, table: &mut [u8]) {
        let mut i = table.len();
        while i > 0 {
            let idx = (self.rand(i as u32) * i as f64).floor() as usize;
            i -= 1;
            table.swap(i, idx);
        }
    }

    /// Gradient noise at `(x, y, z)`. Continuous, roughly in [-1, 1].
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let x = x + SAMPLE_OFFSET;
        let y = y + SAMPLE_OFFSET;
        let z = z + SAMPLE_OFFSET;

        // Unit cube containing the point
        let cx = (x.floor() as i64 & 255) as usize;
        let cy = (y.floor() as i64 & 255) as usize;
        let cz = (z.floor() as i64 & 255) as usize;

        // Position inside the cube
        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.perm;
        let a = p[cx] as usize + cy;
        let aa = p[a] as usize + cz;
        let ab = p[a + 1] as usize + cz;
        let b = p[cx + 1] as usize + cy;
        let ba = p[b] as usize + cz;
        let bb = p[b + 1] as usize + cz;

        let g0 = grad(p[aa], x, y, z);
        let g1 = grad(p[ba], x - 1.0, y, z);
        let g2 = grad(p[ab], x, y - 1.0, z);
        let g3 = grad(p[bb], x - 1.0, y - 1.0, z);
        let g4 = grad(p[aa + 1], x, y, z - 1.0);
        let g5 = grad(p[ba + 1], x - 1.0, y, z - 1.0);
        let g6 = grad(p[ab + 1], x, y - 1.0, z - 1.0);
        let g7 = grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0);

        lerp(
            w,
            lerp(v, lerp(u, g0, g1), lerp(u, g2, g3)),
            lerp(v, lerp(u, g4, g5), lerp(u, g6, g7)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_to_int32_wraps_like_js() {
        assert_eq!(to_int32(1.9), 1);
        assert_eq!(to_int32(-1.9), -1);
        assert_eq!(to_int32(4294967296.0 + 5.0), 5);
        assert_eq!(to_int32(2147483648.0), i32::MIN);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_permutation_is_doubled_shuffle() {
        let field = NoiseField::new(0x42069);
        let perm = field.permutation();
        assert_eq!(perm.len(), 512);
        assert_eq!(&perm[..256], &perm[256..]);
        let mut sorted = perm[..256].to_vec();
        sorted.sort_unstable();
        let identity: Vec<u8> = (0..=255).collect();
        assert_eq!(sorted, identity);
    }

    #[test]
    fn test_reference_values() {
        let field = NoiseField::new(0x42069);
        assert_eq!(&field.permutation()[..8], &[192, 44, 69, 111, 194, 250, 43, 141]);
        assert!((field.rand(0) - 0.4787126164883375).abs() < 1e-12);
        assert!((field.rand(1) - 0.3994781959336251).abs() < 1e-12);
        assert!((field.rand(7) - 0.9061367488466203).abs() < 1e-12);
        assert!((field.sample(0.1, 0.2, 0.3) - -0.2991551032255504).abs() < 1e-12);
        assert!((field.sample(1.4, -0.7, 0.6) - -0.343874213916923).abs() < 1e-12);
        assert!((field.sample(0.0, 0.0, 1.4) - 0.33868949162284245).abs() < 1e-12);

        let zero = NoiseField::new(0);
        assert_eq!(&zero.permutation()[..8], &[196, 185, 112, 255, 96, 200, 7, 57]);
        assert!((zero.rand(0) - 0.5945264333859086).abs() < 1e-12);
    }

    #[test]
    fn test_sample_deterministic_across_instances() {
        let a = NoiseField::new(1234);
        let b = NoiseField::new(1234);
        for i in 0..200 {
            let t = i as f64 * 0.173;
            let (x, y, z) = (t.sin() * 3.0, t.cos() * 2.0 - 1.0, t * 0.5 - 4.0);
            assert_eq!(a.sample(x, y, z).to_bits(), a.sample(x, y, z).to_bits());
            assert_eq!(a.sample(x, y, z).to_bits(), b.sample(x, y, z).to_bits());
        }
    }

    #[test]
    fn test_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        assert_ne!(a.permutation(), b.permutation());
    }

    #[test]
    fn test_sample_range() {
        let field = NoiseField::new(0xdead_beef);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let x = rng.gen_range(-50.0..50.0);
            let y = rng.gen_range(-50.0..50.0);
            let z = rng.gen_range(-50.0..50.0);
            let v = field.sample(x, y, z);
            assert!(v.is_finite());
            assert!((-1.1..=1.1).contains(&v), "sample {} out of range", v);
        }
    }

    #[test]
    fn test_sample_continuity() {
        let field = NoiseField::new(999);
        for i in 0..100 {
            let x = i as f64 * 0.1;
            let v1 = field.sample(x, 0.3, -0.2);
            let v2 = field.sample(x + 0.001, 0.3, -0.2);
            assert!((v1 - v2).abs() < 0.05, "Noise discontinuity at x={}", x);
        }
    }

    #[test]
    fn test_rand_range() {
        let field = NoiseField::new(0xffff_ffff);
        for token in 0..2000 {
            let v = field.rand(token);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }
}
