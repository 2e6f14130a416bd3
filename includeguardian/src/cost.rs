// Copyright (c) The IncludeGuardian Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The cost algebra: a token-count / byte-size pair that every analysis
//! accumulates in.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A file's compilation cost, as a pair of a preprocessing token count and a
/// post-preprocessing byte size.
///
/// Closed under addition, subtraction and integer scaling. Zero is the
/// additive identity. There is no total ordering on `Cost` -- analyses that
/// need to compare costs do so through [`Cost::tokens`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Cost {
    tokens: i64,
    bytes: u64,
}

impl Cost {
    /// The additive identity.
    pub const ZERO: Cost = Cost { tokens: 0, bytes: 0 };

    /// Creates a new cost from a token count and a byte size.
    pub fn new(tokens: i64, bytes: u64) -> Self {
        Self { tokens, bytes }
    }

    /// The number of preprocessing tokens.
    pub fn tokens(&self) -> i64 {
        self.tokens
    }

    /// The post-preprocessing byte size.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost {
            tokens: self.tokens + rhs.tokens,
            bytes: self.bytes + rhs.bytes,
        }
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        *self = *self + rhs;
    }
}

impl Sub for Cost {
    type Output = Cost;

    fn sub(self, rhs: Cost) -> Cost {
        Cost {
            tokens: self.tokens - rhs.tokens,
            bytes: self.bytes.saturating_sub(rhs.bytes),
        }
    }
}

impl SubAssign for Cost {
    fn sub_assign(&mut self, rhs: Cost) {
        *self = *self - rhs;
    }
}

impl Mul<i64> for Cost {
    type Output = Cost;

    fn mul(self, rhs: i64) -> Cost {
        Cost {
            tokens: self.tokens * rhs,
            bytes: self.bytes * rhs as u64,
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_is_commutative_and_subtraction_undoes_it() {
        let a = Cost::new(10, 100);
        let b = Cost::new(3, 40);
        assert_eq!((a + b) - b, a);
        assert_eq!(a + b, b + a);
    }

    #[test]
    fn scaling_distributes_over_addition() {
        let a = Cost::new(2, 5);
        let b = Cost::new(7, 11);
        let k = 4;
        assert_eq!(Cost::mul(a + b, k), a * k + b * k);
    }

    #[test]
    fn zero_is_the_additive_identity() {
        let a = Cost::new(42, 7);
        assert_eq!(a + Cost::ZERO, a);
        assert_eq!(a - Cost::ZERO, a);
    }

    #[cfg(feature = "proptest09")]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn add_then_sub_roundtrips(a_tok in any::<i32>(), a_b in any::<u32>(), b_tok in any::<i32>(), b_b in any::<u32>()) {
                let a = Cost::new(a_tok as i64, a_b as u64);
                let b = Cost::new(b_tok as i64, b_b as u64);
                prop_assert_eq!((a + b) - b, a);
            }

            #[test]
            fn scaling_distributes(a_tok in any::<i16>(), a_b in any::<u16>(), b_tok in any::<i16>(), b_b in any::<u16>(), k in 0i64..100) {
                let a = Cost::new(a_tok as i64, a_b as u64);
                let b = Cost::new(b_tok as i64, b_b as u64);
                prop_assert_eq!((a + b) * k, a * k + b * k);
            }
        }
    }
}
