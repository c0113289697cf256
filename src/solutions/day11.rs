use advent_framework::grid::{Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 11: Cosmic Expansion",
    parsed = Universe,
    part_one = Day11,
    part_two = Day11
)]
impl super::AdventOfCode2023<11> {}

/*
The image shows galaxies `#` in empty space `.`. Every row and column without a galaxy has
expanded, so it counts as several rows or columns when measuring the shortest (Manhattan) path
between two galaxies.
*/

#[derive(Error, Debug)]
enum Day11Error {
    #[error("invalid image pixel {0:?}")]
    InvalidPixel(char),
}

#[derive(Debug)]
struct Universe {
    galaxies: Vec<Position>,
    /// Sorted indices of rows without galaxies.
    empty_rows: Vec<usize>,
    /// Sorted indices of columns without galaxies.
    empty_cols: Vec<usize>,
}

impl ParseData for Universe {
    fn parse(input: &str) -> DynamicResult<Self> {
        let image = Grid::parse(input, |pixel| match pixel {
            '#' => Ok(true),
            '.' => Ok(false),
            other => Err(Day11Error::InvalidPixel(other)),
        })?;

        let galaxies = image
            .iter()
            .filter_map(|(position, &galaxy)| galaxy.then_some(position))
            .collect();
        let empty_rows = (0..image.height())
            .filter(|&row| !image.row(row).any(|&galaxy| galaxy))
            .collect();
        let empty_cols = (0..image.width())
            .filter(|&col| !image.column(col).any(|&galaxy| galaxy))
            .collect();

        Ok(Self {
            galaxies,
            empty_rows,
            empty_cols,
        })
    }
}

/// Number of sorted `empties` strictly between `a` and `b`.
fn empties_between(a: usize, b: usize, empties: &[usize]) -> u64 {
    let (low, high) = (a.min(b), a.max(b));
    let crossed = empties.partition_point(|&index| index < high)
        - empties.partition_point(|&index| index <= low);
    crossed as u64
}

impl Universe {
    /// Shortest path between two galaxies once every empty line counts `expansion` times.
    fn distance(&self, a: Position, b: Position, expansion: u64) -> Option<u64> {
        let crossed = empties_between(a.row, b.row, &self.empty_rows)
            + empties_between(a.col, b.col, &self.empty_cols);
        (a.manhattan_distance(b) as u64).checked_add(crossed.checked_mul(expansion - 1)?)
    }

    fn total_distance(&self, expansion: u64) -> Result<u64, Overflow> {
        let mut total = 0u64;
        for (index, &a) in self.galaxies.iter().enumerate() {
            for &b in &self.galaxies[index + 1..] {
                total = self
                    .distance(a, b, expansion)
                    .and_then(|distance| total.checked_add(distance))
                    .ok_or(Overflow("total galaxy distance"))?;
            }
        }
        Ok(total)
    }
}

struct Day11;

impl Day11 {
    const EXPANSION_ONE: u64 = 2;
    const EXPANSION_TWO: u64 = 1_000_000;
}

impl Solution<PartOne> for Day11 {
    type Input = Universe;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.total_distance(Self::EXPANSION_ONE)?)
    }
}

impl Solution<PartTwo> for Day11 {
    type Input = Universe;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.total_distance(Self::EXPANSION_TWO)?)
    }
}
