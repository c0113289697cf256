use std::collections::{HashMap, VecDeque};

use advent_framework::grid::{Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 21: Step Counter",
    parsed = Garden,
    part_one = Day21,
    part_two = Day21
)]
impl super::AdventOfCode2023<21> {}

/*
The map shows garden plots `.`, rocks `#` and the starting plot `S`. Each step moves to a
neighbouring plot. A plot reached in `k` steps can also be reached in `k + 2` by stepping back and
forth, so the plots reachable in exactly `n` steps are those at distance at most `n` with the same
parity as `n`.
*/

#[derive(Error, Debug)]
enum Day21Error {
    #[error("invalid garden tile {0:?}")]
    InvalidTile(char),
    #[error("expected exactly one start tile, found {0}")]
    StartCount(usize),
    #[error("stepping across repeated gardens needs a square garden of odd width, at least 3 wide")]
    NotSquare,
    #[error("stepping across repeated gardens needs the start in the centre")]
    StartOffCentre,
    #[error("{steps} steps do not end on a garden edge, expected {half} plus a multiple of {width}")]
    UnalignedSteps {
        steps: u64,
        half: usize,
        width: usize,
    },
}

#[derive(Debug)]
struct Garden {
    /// `true` for plots, including the start.
    plots: Grid<bool>,
    start: Position,
}

impl ParseData for Garden {
    fn parse(input: &str) -> DynamicResult<Self> {
        let tiles = Grid::parse(input, |tile| match tile {
            '.' | '#' | 'S' => Ok(tile),
            other => Err(Day21Error::InvalidTile(other)),
        })?;
        let starts: Vec<Position> = tiles
            .iter()
            .filter(|&(_, &tile)| tile == 'S')
            .map(|(position, _)| position)
            .collect();
        let &[start] = starts.as_slice() else {
            return Err(Day21Error::StartCount(starts.len()).into());
        };

        let mut plots = Grid::filled(tiles.height(), tiles.width(), true);
        for (position, &tile) in tiles.iter() {
            if let Some(plot) = plots.get_mut(position) {
                *plot = tile != '#';
            }
        }
        Ok(Self { plots, start })
    }
}

/// Reachable plot counts for one garden, memoised by starting plot and step count.
struct ReachCounter<'a> {
    garden: &'a Garden,
    counts: HashMap<(Position, usize), u64>,
}

impl<'a> ReachCounter<'a> {
    fn new(garden: &'a Garden) -> Self {
        Self {
            garden,
            counts: HashMap::new(),
        }
    }

    /// Plots of a single garden reachable from `from` in exactly `steps` steps.
    fn reachable(&mut self, from: Position, steps: usize) -> Result<u64, Overflow> {
        if let Some(&count) = self.counts.get(&(from, steps)) {
            return Ok(count);
        }

        let plots = &self.garden.plots;
        let mut distances = HashMap::from([(from, 0usize)]);
        let mut queue = VecDeque::from([from]);
        while let Some(position) = queue.pop_front() {
            let distance = distances[&position];
            if distance == steps {
                continue;
            }
            for (_, next) in plots.neighbours4(position) {
                if plots.get(next) == Some(&true) && !distances.contains_key(&next) {
                    distances.insert(next, distance + 1);
                    queue.push_back(next);
                }
            }
        }

        let count = distances
            .values()
            .filter(|&&distance| distance % 2 == steps % 2)
            .count();
        let count = u64::try_from(count).map_err(|_| Overflow("reachable plots"))?;
        self.counts.insert((from, steps), count);
        Ok(count)
    }

    /// Plots reachable in exactly `steps` steps on the garden repeated in every direction.
    ///
    /// Counted per copy of the garden: the centre one, four arms of copies straight out from the
    /// centre, and the four quadrants between the arms. Arm copies are entered at the middle of an
    /// edge and quadrant copies at a corner, so each copy's count is a single garden count with the
    /// steps left on entry. Copies the walk crosses completely only differ by parity.
    fn reachable_repeated(&mut self, steps: u64) -> DynamicResult<u64> {
        let garden = self.garden;
        let width = garden.plots.width();
        if garden.plots.height() != width || width % 2 == 0 || width < 3 {
            return Err(Day21Error::NotSquare.into());
        }
        let half = width / 2;
        if garden.start != Position::new(half, half) {
            return Err(Day21Error::StartOffCentre.into());
        }
        let unaligned = || Day21Error::UnalignedSteps { steps, half, width };
        let garden_width = u64::try_from(width)?;
        let beyond = steps
            .checked_sub(u64::try_from(half)?)
            .filter(|beyond| beyond % garden_width == 0)
            .ok_or_else(unaligned)?;
        // copies reached straight out from the centre in each direction
        let copies = beyond / garden_width;

        let centre = self.reachable(garden.start, usize::try_from(steps)?)?;
        if copies == 0 {
            return Ok(centre);
        }

        let last = width - 1;
        let overflow = || Overflow("reachable plots");
        let mut terms = vec![centre];

        let even_arms = copies / 2;
        let odd_arms = (copies - 1) / 2;
        for entry in [
            Position::new(0, half),
            Position::new(last, half),
            Position::new(half, 0),
            Position::new(half, last),
        ] {
            terms.push(self.reachable(entry, width - 1)?);
            terms.push(
                even_arms
                    .checked_mul(self.reachable(entry, 2 * width - 1)?)
                    .ok_or_else(overflow)?,
            );
            terms.push(
                odd_arms
                    .checked_mul(self.reachable(entry, 3 * width - 1)?)
                    .ok_or_else(overflow)?,
            );
        }

        // inner quadrant diagonals, split by the parity of their distance to the outermost one
        let (mut near, mut far) = (0u64, 0u64);
        for diagonal in 1..copies.saturating_sub(1) {
            let tally = if (copies - diagonal) % 2 == 0 {
                &mut near
            } else {
                &mut far
            };
            *tally = tally.checked_add(diagonal).ok_or_else(overflow)?;
        }
        for entry in [
            Position::new(0, 0),
            Position::new(0, last),
            Position::new(last, 0),
            Position::new(last, last),
        ] {
            for (count, remaining) in [
                (copies, half - 1),
                (copies - 1, width + half - 1),
                (near, 2 * width + half - 1),
                (far, 3 * width + half - 1),
            ] {
                terms.push(
                    count
                        .checked_mul(self.reachable(entry, remaining)?)
                        .ok_or_else(overflow)?,
                );
            }
        }

        Ok(terms.into_iter().checked_sum().ok_or_else(overflow)?)
    }
}

struct Day21;

impl Day21 {
    const STEPS_ONE: usize = 64;
    const STEPS_TWO: u64 = 26_501_365;
}

impl Solution<PartOne> for Day21 {
    type Input = Garden;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(ReachCounter::new(input).reachable(input.start, Self::STEPS_ONE)?)
    }
}

/*
For part 2 the garden repeats infinitely in every direction and the elf takes 26501365 steps. Real
inputs have a clear row and column through the start and a clear border, which the per-copy
counting relies on.
*/

impl Solution<PartTwo> for Day21 {
    type Input = Garden;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        ReachCounter::new(input).reachable_repeated(Self::STEPS_TWO)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "...........
.....###.#.
.###.##..#.
..#.#...#..
....#.#....
.##..S####.
.##..#...#.
.......##..
.##.#.####.
.##..##.##.
...........
";

    const ROCKY_INPUT: &str = "...........
.#...#...#.
...#...#...
.#.......#.
...#...#...
.....S.....
...#...#...
.#.......#.
...#...#...
.#...#...#.
...........
";

    /// Walk the repeated garden step by step.
    fn brute_force_repeated(garden: &Garden, steps: usize) -> u64 {
        let (height, width) = (garden.plots.height() as i64, garden.plots.width() as i64);
        let start = (garden.start.row as i64, garden.start.col as i64);
        let is_plot = |(row, col): (i64, i64)| {
            let position = Position::new(
                row.rem_euclid(height) as usize,
                col.rem_euclid(width) as usize,
            );
            garden.plots.get(position) == Some(&true)
        };

        let mut distances = HashMap::from([(start, 0usize)]);
        let mut queue = VecDeque::from([start]);
        while let Some((row, col)) = queue.pop_front() {
            let distance = distances[&(row, col)];
            if distance == steps {
                continue;
            }
            for next in [(row - 1, col), (row + 1, col), (row, col - 1), (row, col + 1)] {
                if is_plot(next) && !distances.contains_key(&next) {
                    distances.insert(next, distance + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
            .values()
            .filter(|&&distance| distance % 2 == steps % 2)
            .count() as u64
    }

    #[rstest]
    #[case(1, 2)]
    #[case(2, 4)]
    #[case(3, 6)]
    #[case(6, 16)]
    fn counts_example_steps(#[case] steps: usize, #[case] expected: u64) -> DynamicResult<()> {
        let garden = Garden::parse(EXAMPLE_INPUT)?;
        assert_eq!(ReachCounter::new(&garden).reachable(garden.start, steps)?, expected);
        Ok(())
    }

    #[test]
    fn counts_are_memoised() -> DynamicResult<()> {
        let garden = Garden::parse(EXAMPLE_INPUT)?;
        let mut counter = ReachCounter::new(&garden);
        assert_eq!(counter.reachable(garden.start, 6)?, 16);
        assert_eq!(counter.reachable(garden.start, 6)?, 16);
        assert_eq!(counter.counts.len(), 1);
        Ok(())
    }

    #[rstest]
    #[case(16, 237)]
    #[case(27, 654)]
    #[case(38, 1277)]
    fn repeated_rocky_garden(#[case] steps: u64, #[case] expected: u64) -> DynamicResult<()> {
        let garden = Garden::parse(ROCKY_INPUT)?;
        assert_eq!(ReachCounter::new(&garden).reachable_repeated(steps)?, expected);
        assert_eq!(brute_force_repeated(&garden, steps as usize), expected);
        Ok(())
    }

    #[rstest]
    #[case(5)]
    #[case(16)]
    #[case(49)]
    #[case(71)]
    fn repeated_open_garden_is_a_diamond(#[case] steps: u64) -> DynamicResult<()> {
        let open = "...........\n".repeat(5) + ".....S.....\n" + &"...........\n".repeat(5);
        let garden = Garden::parse(&open)?;
        assert_eq!(
            ReachCounter::new(&garden).reachable_repeated(steps)?,
            (steps + 1) * (steps + 1)
        );
        Ok(())
    }

    #[test]
    fn repeated_count_needs_aligned_steps() -> DynamicResult<()> {
        let garden = Garden::parse(ROCKY_INPUT)?;
        let error = ReachCounter::new(&garden).reachable_repeated(20).unwrap_err();
        assert_eq!(
            error.to_string(),
            "20 steps do not end on a garden edge, expected 5 plus a multiple of 11"
        );
        Ok(())
    }

    #[test]
    fn repeated_count_needs_centred_start() -> DynamicResult<()> {
        let garden = Garden::parse("S..\n...\n...\n")?;
        assert!(ReachCounter::new(&garden).reachable_repeated(4).is_err());
        let garden = Garden::parse("....\n.S..\n....\n....\n")?;
        assert!(ReachCounter::new(&garden).reachable_repeated(5).is_err());
        Ok(())
    }

    #[test]
    fn garden_needs_one_start() {
        assert!(Garden::parse("...\n...\n").is_err());
        assert!(Garden::parse("S.S\n...\n").is_err());
        assert!(Garden::parse("S.x\n...\n").is_err());
    }
}
