//! Numeric and boolean generators.

use rand::Rng;

/// Exclusive upper bound for a column with the given digit limit.
///
/// `(10^limit - 1) / 2`: the halving keeps values inside the signed range
/// when the column's signedness is unknown.
pub fn integer_bound(limit: u32) -> u64 {
    10u64
        .checked_pow(limit)
        .map(|p| (p - 1) / 2)
        .unwrap_or(u64::MAX / 2)
}

/// Generate a non-negative integer below [`integer_bound`].
pub fn generate_integer<R: Rng>(rng: &mut R, limit: u32) -> String {
    let bound = integer_bound(limit);
    if bound == 0 {
        return "0".to_string();
    }
    rng.gen_range(0..bound).to_string()
}

/// Float columns get whole numbers from the integer generator.
pub fn generate_float<R: Rng>(rng: &mut R, limit: u32) -> String {
    generate_integer(rng, limit)
}

/// Uniformly `0` or `1`.
pub fn generate_boolean<R: Rng>(rng: &mut R) -> String {
    u8::from(rng.gen_bool(0.5)).to_string()
}
