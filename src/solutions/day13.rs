use advent_framework::grid::Grid;
use advent_framework::parsing::InputScanner;
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 13: Point of Incidence",
    parsed = Patterns,
    part_one = Day13,
    part_two = Day13
)]
impl super::AdventOfCode2023<13> {}

/*
Patterns of ash `.` and rocks `#` are separated by blank lines. Each pattern has a line of
reflection, either between two rows or between two columns; lines mirrored past the pattern's edge
are ignored.

Rows and columns are stored as bitmasks so comparing two lines is one integer comparison.
*/

#[derive(Error, Debug)]
enum Day13Error {
    #[error("invalid pattern tile {0:?}")]
    InvalidTile(char),
    #[error("pattern lines longer than 64 tiles are not supported")]
    TooWide,
    #[error("no line of reflection in the pattern starting on line {}", .0 + 1)]
    NoReflection(usize),
}

#[derive(Debug)]
struct Pattern {
    first_line: usize,
    rows: Vec<u64>,
    cols: Vec<u64>,
}

fn bitmask<'a>(tiles: impl Iterator<Item = &'a bool>) -> u64 {
    tiles.fold(0, |mask, &rock| (mask << 1) | u64::from(rock))
}

impl Pattern {
    fn parse(first_line: usize, block: &str) -> DynamicResult<Self> {
        let grid = Grid::parse(block, |tile| match tile {
            '#' => Ok(true),
            '.' => Ok(false),
            other => Err(Day13Error::InvalidTile(other)),
        })?;
        if grid.width() > 64 || grid.height() > 64 {
            return Err(Day13Error::TooWide.into());
        }
        Ok(Self {
            first_line,
            rows: (0..grid.height()).map(|row| bitmask(grid.row(row))).collect(),
            cols: (0..grid.width()).map(|col| bitmask(grid.column(col))).collect(),
        })
    }

    /// Mirror summary: 100 per row above a horizontal line, else the columns left of a vertical
    /// line.
    fn summary(&self, smudges: u32) -> Result<usize, Day13Error> {
        if let Some(rows_above) = reflection(&self.rows, smudges) {
            Ok(rows_above * 100)
        } else {
            reflection(&self.cols, smudges).ok_or(Day13Error::NoReflection(self.first_line))
        }
    }
}

/// The first place to split `lines` where the mirrored pairs differ by exactly `smudges` bits in
/// total. Returns how many lines come before the split.
fn reflection(lines: &[u64], smudges: u32) -> Option<usize> {
    (1..lines.len()).find(|&split| {
        let (before, after) = lines.split_at(split);
        before
            .iter()
            .rev()
            .zip(after)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum::<u32>()
            == smudges
    })
}

#[derive(Debug)]
struct Patterns(Vec<Pattern>);

impl ParseData for Patterns {
    fn parse(input: &str) -> DynamicResult<Self> {
        let patterns = InputScanner::new(input)
            .remaining_blocks()
            .into_iter()
            .map(|(first_line, block)| Pattern::parse(first_line, &block))
            .collect::<DynamicResult<_>>()?;
        Ok(Self(patterns))
    }
}

impl Patterns {
    fn total_summary(&self, smudges: u32) -> DynamicResult<usize> {
        let summaries = self
            .0
            .iter()
            .map(|pattern| pattern.summary(smudges))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("sum of summaries"))?)
    }
}

struct Day13;

impl Solution<PartOne> for Day13 {
    type Input = Patterns;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.total_summary(0)
    }
}

/*
For part 2 every pattern has exactly one smudge: one tile flipped. The new line of reflection is
the one that becomes valid once the smudge is fixed.
*/

impl Solution<PartTwo> for Day13 {
    type Input = Patterns;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.total_summary(1)
    }
}
