//! Per-signal storage with width-selected representation
//!
//! A signal's representation is fixed once, at construction, from its
//! declared width: a native word up to 64 bits, a `BigUint` above that. Both
//! variants follow the same masking and reinterpretation rules (`bits` and
//! `wide` respectively), so circuits mixing narrow and wide signals behave
//! uniformly. The width is not stored here; the owning table passes the
//! declared width into every operation that needs it.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::{bits, wide};

/// Storage for one signal value, selected by declared width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalValue {
    /// Widths 1..=64, kept masked in a native word.
    Word(u64),
    /// Widths above 64, kept masked in a big unsigned integer.
    Wide(BigUint),
}

impl SignalValue {
    /// Zero with the representation for `width`.
    pub fn zero(width: usize) -> Self {
        if width <= bits::WORD_BITS {
            SignalValue::Word(0)
        } else {
            SignalValue::Wide(BigUint::zero())
        }
    }

    /// Build from an unsigned magnitude, masked to `width`.
    pub fn from_biguint(value: &BigUint, width: usize) -> Self {
        if width <= bits::WORD_BITS {
            let low = value.iter_u64_digits().next().unwrap_or(0);
            SignalValue::Word(low & bits::mask(width))
        } else {
            SignalValue::Wide(value & wide::mask(width))
        }
    }

    /// Overwrite with an unsigned magnitude, masked to `width`.
    pub fn store(&mut self, value: &BigUint, width: usize) {
        *self = Self::from_biguint(value, width);
    }

    /// Overwrite from a native word, masked to `width`.
    pub fn store_word(&mut self, value: u64, width: usize) {
        match self {
            SignalValue::Word(w) => *w = value & bits::mask(width),
            // A wide slot's width exceeds 64, so any word fits unmasked
            SignalValue::Wide(v) => *v = BigUint::from(value),
        }
    }

    /// Unsigned magnitude as a `BigUint` (the boundary representation).
    pub fn to_biguint(&self) -> BigUint {
        match self {
            SignalValue::Word(w) => BigUint::from(*w),
            SignalValue::Wide(v) => v.clone(),
        }
    }

    /// Low 64 bits of the value.
    pub fn word(&self) -> u64 {
        match self {
            SignalValue::Word(w) => *w,
            SignalValue::Wide(v) => v.iter_u64_digits().next().unwrap_or(0),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            SignalValue::Word(w) => *w == 0,
            SignalValue::Wide(v) => v.is_zero(),
        }
    }

    /// Two's-complement reinterpretation at the declared width.
    pub fn as_signed(&self, width: usize) -> BigInt {
        match self {
            SignalValue::Word(w) => BigInt::from(bits::as_signed(*w, width)),
            SignalValue::Wide(v) => wide::as_signed(v, width),
        }
    }

    pub fn reduce_and(&self, width: usize) -> bool {
        match self {
            SignalValue::Word(w) => bits::reduce_and(*w, width),
            SignalValue::Wide(v) => wide::reduce_and(v, width),
        }
    }

    pub fn reduce_or(&self, width: usize) -> bool {
        match self {
            SignalValue::Word(w) => bits::reduce_or(*w, width),
            SignalValue::Wide(v) => wide::reduce_or(v, width),
        }
    }

    pub fn reduce_xor(&self, width: usize) -> bool {
        match self {
            SignalValue::Word(w) => bits::reduce_xor(*w, width),
            SignalValue::Wide(v) => wide::reduce_xor(v, width),
        }
    }
}
