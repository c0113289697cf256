//! Shared plumbing for daily puzzle solutions.
//!
//! A day is made of two pieces:
//!
//! - an input type implementing [`ParseData`] (or plain `str` when no parsing step is wanted)
//! - one or two types implementing [`Solution`] for the [`PartOne`] / [`PartTwo`] markers
//!
//! The [`runner`] module wires those together, and [`grid`] holds the rectangular cell model most
//! map-shaped puzzles are built on.
//!
//! ```
//! use advent_framework::{DynamicResult, ParseData, PartOne, Solution};
//!
//! struct Depths(Vec<u32>);
//!
//! impl ParseData for Depths {
//!     fn parse(input: &str) -> DynamicResult<Self> {
//!         let depths = input
//!             .lines()
//!             .map(str::parse)
//!             .collect::<Result<Vec<_>, _>>()?;
//!         Ok(Self(depths))
//!     }
//! }
//!
//! struct Deepest;
//!
//! impl Solution<PartOne> for Deepest {
//!     type Input = Depths;
//!     type Output = u32;
//!
//!     fn solve(input: &Depths) -> DynamicResult<u32> {
//!         Ok(input.0.iter().copied().max().unwrap_or_default())
//!     }
//! }
//!
//! let depths = Depths::parse("3\n9\n4")?;
//! assert_eq!(Deepest::solve(&depths)?, 9);
//! # Ok::<(), advent_framework::DynamicError>(())
//! ```

#![warn(clippy::pedantic)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::branches_sharing_code,
    clippy::collection_is_never_read,
    clippy::equatable_if_let,
    clippy::needless_collect,
    clippy::needless_pass_by_ref_mut,
    clippy::option_if_let_else,
    clippy::set_contains_or_insert,
    clippy::suboptimal_flops,
    clippy::trait_duplication_in_bounds,
    clippy::type_repetition_in_bounds,
    clippy::use_self,
    clippy::useless_let_if_seq
)]
#![deny(
    clippy::expect_used,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::unwrap_used
)]

use std::error::Error;
use std::fmt::Display;

pub mod grid;
pub mod parsing;
pub mod runner;

mod sealed {
    /// Keeps [`Part`][super::Part] closed to the two markers defined in this crate.
    pub trait Sealed {}
}

/// Any error a parse step or solution can raise, boxed for dynamic dispatch.
pub type DynamicError = Box<dyn Error + Send + Sync + 'static>;
/// Result alias returning a [`DynamicError`].
pub type DynamicResult<T> = Result<T, DynamicError>;

/// Identifies which half of a puzzle is being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    One,
    Two,
}

impl Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One => f.write_str("first"),
            Self::Two => f.write_str("second"),
        }
    }
}

/// Type-level marker for a puzzle half, used as the generic argument of [`Solution`].
pub trait Part: sealed::Sealed {
    /// The runtime [`PartKind`] matching this marker.
    fn kind() -> PartKind;
}

/// Marker for the first answer of a day.
pub struct PartOne;
impl sealed::Sealed for PartOne {}
impl Part for PartOne {
    fn kind() -> PartKind {
        PartKind::One
    }
}

/// Marker for the second answer of a day.
pub struct PartTwo;
impl sealed::Sealed for PartTwo {}
impl Part for PartTwo {
    fn kind() -> PartKind {
        PartKind::Two
    }
}

/// Computes one answer of a puzzle from its input.
///
/// A single type may implement this for both [`PartOne`] and [`PartTwo`].
pub trait Solution<P: Part> {
    /// What the solution reads. Use `str` to receive the raw puzzle text.
    type Input: ?Sized;

    /// The answer, printed through [`Display`].
    type Output: Display;

    /// Compute the answer.
    ///
    /// # Errors
    ///
    /// Malformed input, an unsatisfiable puzzle or arithmetic overflow are surfaced as a
    /// [`DynamicError`].
    fn solve(input: &Self::Input) -> DynamicResult<Self::Output>;
}

/// Structured puzzle input built from the raw text.
pub trait ParseData {
    /// Parse the puzzle text.
    ///
    /// # Errors
    ///
    /// Fails fast on the first malformed piece of input.
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized;
}
