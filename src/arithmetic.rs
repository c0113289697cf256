//! Overflow-checked arithmetic over iterators, shared by the daily solutions.
//!
//! Sums use [`checked_sum::CheckedSum`]; this module adds the product and lowest common multiple
//! counterparts, and an [`Overflow`] error to report either.

use num_integer::Integer;
use num_traits::{CheckedMul, One};
use thiserror::Error;

/// An intermediate value did not fit its integer type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("integer overflow while computing {0}")]
pub struct Overflow(pub &'static str);

/// Iterator extension for multiplying every item with overflow checking.
pub trait CheckedProduct<T> {
    /// The product of all items, `None` on overflow. Empty iterators give one.
    fn checked_product(self) -> Option<T>;
}

impl<T, I> CheckedProduct<T> for I
where
    T: CheckedMul + One,
    I: Iterator<Item = T>,
{
    fn checked_product(mut self) -> Option<T> {
        self.try_fold(T::one(), |product, value| product.checked_mul(&value))
    }
}

/// Lowest common multiple of every item, `None` on overflow. Empty iterators give one.
pub fn checked_lcm<T, I>(values: I) -> Option<T>
where
    T: Integer + CheckedMul + Copy,
    I: IntoIterator<Item = T>,
{
    values.into_iter().try_fold(T::one(), |lcm, value| {
        if value.is_zero() || lcm.is_zero() {
            return Some(T::zero());
        }
        (lcm / lcm.gcd(&value)).checked_mul(&value)
    })
}
