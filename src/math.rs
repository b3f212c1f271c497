/// Wrap a coordinate into the periodic range `[0, max)`. Works for any finite input, not just values
/// that are at most one period away from the range.
#[inline(always)]
pub fn wrap(x: f32, max: f32) -> f32 {
    let r = x.rem_euclid(max);
    // rem_euclid rounds tiny negative inputs up to exactly `max`.
    r * (r < max) as i32 as f32
}

/// Wrap an integer cell coordinate into `[0, max)`.
#[inline(always)]
pub fn wrap_cell(i: i64, max: usize) -> usize {
    i.rem_euclid(max as i64) as usize
}

// Integer avalanche hash (lowbias32 style).
#[inline]
fn hash(n: u32) -> u32 {
    let mut x = n;
    x ^= x >> 17;
    x = x.wrapping_mul(0xed5a_d4bb);
    x ^= x >> 11;
    x = x.wrapping_mul(0xac4c_1b51);
    x ^= x >> 15;
    x = x.wrapping_mul(0x3184_8bab);
    x ^= x >> 14;
    x
}

/// Pseudo-random value in `[-1, 1)` that depends only on the bit patterns of the inputs. The same
/// inputs always produce the same output, so callers need no generator state.
#[inline]
pub fn hash_noise(x: f32, y: f32, angle: f32) -> f32 {
    let h = hash(x.to_bits().wrapping_add(hash(y.to_bits().wrapping_add(hash(angle.to_bits())))));
    // Top 24 bits give an exactly representable f32 in [0, 1).
    (h >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
}
