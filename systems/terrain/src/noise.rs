//! Integer hashing and interpolation helpers behind every terrain decision.

use std::f64::consts::PI;

/// Thomas Wang's 32-bit integer hash.
pub(crate) fn hash32(value: u32) -> u32 {
    let mut x = (value ^ 61) ^ (value >> 16);
    x = x.wrapping_add(x << 3);
    x ^= x >> 4;
    x = x.wrapping_mul(0x27d4_eb2d);
    x ^ (x >> 15)
}

/// Hash of a salted two-dimensional coordinate under a seed.
pub(crate) fn hash_cell(salt: u32, seed: u32, x: i64, y: i64) -> u32 {
    let mut state = hash32(seed ^ salt.wrapping_mul(0x9e37_79b9));
    state = hash32(state ^ x as u32);
    state = hash32(state ^ (x >> 32) as u32);
    state = hash32(state.wrapping_add(y as u32));
    hash32(state ^ (y >> 32) as u32)
}

/// Maps a hash onto `[0, 1)`.
pub(crate) fn unit(hash: u32) -> f64 {
    f64::from(hash) / (f64::from(u32::MAX) + 1.0)
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Raised-cosine ease: zero slope at both ends of `[0, 1]`.
pub(crate) fn raised_cosine(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (1.0 - (PI * t).cos()) * 0.5
}

/// Bilinearly interpolated value noise over a square lattice.
///
/// Lattice corners hold hashed values in `[0, 1)`; samples are taken at
/// tile centers and eased with [`raised_cosine`].
pub(crate) fn lattice_noise(salt: u32, seed: u32, x: i64, y: i64, spacing: u32) -> f64 {
    let spacing = i64::from(spacing.max(1));
    let cell_x = x.div_euclid(spacing);
    let cell_y = y.div_euclid(spacing);
    let step = spacing as f64;
    let fx = raised_cosine(((x - cell_x * spacing) as f64 + 0.5) / step);
    let fy = raised_cosine(((y - cell_y * spacing) as f64 + 0.5) / step);

    let corner = |dx: i64, dy: i64| unit(hash_cell(salt, seed, cell_x + dx, cell_y + dy));
    let top = lerp(corner(0, 0), corner(1, 0), fx);
    let bottom = lerp(corner(0, 1), corner(1, 1), fx);
    lerp(top, bottom, fy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbouring_inputs_scatter() {
        let hashes: std::collections::BTreeSet<u32> = (0..256).map(hash32).collect();
        assert_eq!(hashes.len(), 256);
        assert_ne!(hash_cell(1, 0, 5, 0), hash_cell(2, 0, 5, 0));
        assert_ne!(hash_cell(1, 0, 5, 0), hash_cell(1, 0, -5, 0));
    }

    #[test]
    fn unit_stays_below_one() {
        assert!(unit(u32::MAX) < 1.0);
        assert_eq!(unit(0), 0.0);
    }

    #[test]
    fn raised_cosine_hits_endpoints_and_midpoint() {
        assert!(raised_cosine(0.0).abs() < 1e-12);
        assert!((raised_cosine(1.0) - 1.0).abs() < 1e-12);
        assert!((raised_cosine(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn lattice_noise_is_bounded_and_pure() {
        for x in -40..40 {
            for y in 0..20 {
                let value = lattice_noise(7, 99, x, y, 8);
                assert!((0.0..1.0).contains(&value));
                assert_eq!(value, lattice_noise(7, 99, x, y, 8));
            }
        }
    }
}
