//! FNV-1a hashing for deterministic content selection.
//!
//! Browser clients compute the same hash with JavaScript numbers, where the
//! multiplication is an IEEE-754 double product that is then truncated to a
//! signed 32-bit integer. Large products lose their low bits before the
//! truncation, so the result is not the textbook 32-bit FNV-1a value. This
//! module reproduces that arithmetic exactly: server and client must agree on
//! the selected index without a round-trip.

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 16_777_619;

/// Hash `input` with the FNV-1a variant shared with the browser client.
///
/// Iterates over UTF-16 code units, XORs each into the accumulator, multiplies
/// by [`FNV_PRIME`] and masks to 32 bits. The absolute value of the final
/// signed accumulator is returned.
///
/// The output is stable across processes and platforms. It is not a
/// cryptographic hash.
pub fn fnv1a_hash(input: &str) -> u32 {
    let mut hash = f64::from(FNV_OFFSET_BASIS);

    for unit in input.encode_utf16() {
        let mixed = to_int32(hash) ^ i32::from(unit);
        hash = f64::from(to_int32(f64::from(mixed) * f64::from(FNV_PRIME)));
    }

    // |i32::MIN| and the untouched offset basis both fit in u32.
    hash.abs() as u32
}

/// ECMAScript `ToInt32` for integral doubles below 2^63.
fn to_int32(value: f64) -> i32 {
    (value as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_golden_values() {
        assert_eq!(fnv1a_hash("12345-2024-01-01"), 464_381_229);
        assert_eq!(fnv1a_hash("67890-2024-01-01"), 2_111_760_519);
        assert_eq!(fnv1a_hash("12345-2024-01-02"), 447_603_610);
        assert_eq!(fnv1a_hash("777000-2024-01-01"), 1_739_281_628);
        assert_eq!(fnv1a_hash("a"), 468_965_076);
    }

    #[test]
    fn test_empty_input_returns_offset_basis() {
        assert_eq!(fnv1a_hash(""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_to_int32_wraps_like_javascript() {
        assert_eq!(to_int32(2_166_136_261.0), -2_128_831_035);
        assert_eq!(to_int32(4_294_967_296.0), 0);
        assert_eq!(to_int32(-1.0), -1);
    }

    proptest! {
        #[test]
        fn prop_hash_is_deterministic(input in ".{0,64}") {
            prop_assert_eq!(fnv1a_hash(&input), fnv1a_hash(&input));
        }

        #[test]
        fn prop_hash_fits_signed_magnitude(input in ".{1,64}") {
            // After at least one round the accumulator is a signed 32-bit value.
            prop_assert!(fnv1a_hash(&input) <= 1u32 << 31);
        }
    }
}
