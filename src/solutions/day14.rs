use std::collections::HashMap;
use std::fmt::{self, Display};

use advent_framework::grid::{Direction, Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 14: Parabolic Reflector Dish",
    parsed = Platform,
    part_one = Day14,
    part_two = Day14
)]
impl super::AdventOfCode2023<14> {}

/*
The platform holds round rocks `O` that roll when tilted, cube rocks `#` that never move, and
empty space `.`. The load on the north beams is the sum over round rocks of their distance from
the south edge, counting the bottom row as 1.
*/

#[derive(Error, Debug)]
enum Day14Error {
    #[error("invalid platform tile {0:?}")]
    InvalidTile(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rock {
    Round,
    Cube,
    Empty,
}

impl Display for Rock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Round => 'O',
            Self::Cube => '#',
            Self::Empty => '.',
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Platform(Grid<Rock>);

impl ParseData for Platform {
    fn parse(input: &str) -> DynamicResult<Self> {
        let grid = Grid::parse(input, |tile| match tile {
            'O' => Ok(Rock::Round),
            '#' => Ok(Rock::Cube),
            '.' => Ok(Rock::Empty),
            other => Err(Day14Error::InvalidTile(other)),
        })?;
        Ok(Self(grid))
    }
}

impl Platform {
    /// Lines of positions that rocks roll along, each ordered from the edge they roll toward.
    fn lanes(&self, direction: Direction) -> Vec<Vec<Position>> {
        let (height, width) = (self.0.height(), self.0.width());
        let column = |col: usize| (0..height).map(move |row| Position::new(row, col));
        let row = |row: usize| (0..width).map(move |col| Position::new(row, col));
        match direction {
            Direction::Up => (0..width).map(|col| column(col).collect()).collect(),
            Direction::Down => (0..width).map(|col| column(col).rev().collect()).collect(),
            Direction::Left => (0..height).map(|r| row(r).collect()).collect(),
            Direction::Right => (0..height).map(|r| row(r).rev().collect()).collect(),
        }
    }

    fn tilt(&mut self, direction: Direction) {
        for lane in self.lanes(direction) {
            // where the next round rock comes to rest
            let mut resting = 0;
            for (index, &position) in lane.iter().enumerate() {
                match self.0.get(position) {
                    Some(Rock::Cube) => resting = index + 1,
                    Some(Rock::Round) => {
                        self.0.swap(lane[resting], position);
                        resting += 1;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Tilt north, west, south, then east.
    fn spin(&mut self) {
        for direction in [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ] {
            self.tilt(direction);
        }
    }

    fn north_load(&self) -> Result<usize, Overflow> {
        let height = self.0.height();
        self.0
            .iter()
            .filter(|&(_, &rock)| rock == Rock::Round)
            .map(|(position, _)| height - position.row)
            .checked_sum()
            .ok_or(Overflow("north load"))
    }

    /// Load after `spins` spin cycles, skipping ahead once the platform repeats a state.
    fn load_after_spins(&self, spins: usize) -> Result<usize, Overflow> {
        let mut platform = self.clone();
        let mut first_seen = HashMap::from([(platform.clone(), 0)]);
        let mut loads = vec![platform.north_load()?];

        for spin in 1..=spins {
            platform.spin();
            if let Some(&cycle_start) = first_seen.get(&platform) {
                let cycle_length = spin - cycle_start;
                return Ok(loads[cycle_start + (spins - cycle_start) % cycle_length]);
            }
            loads.push(platform.north_load()?);
            first_seen.insert(platform.clone(), spin);
        }
        Ok(loads[spins])
    }
}

struct Day14;

impl Solution<PartOne> for Day14 {
    type Input = Platform;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut platform = input.clone();
        platform.tilt(Direction::Up);
        Ok(platform.north_load()?)
    }
}

/*
For part 2 the platform goes through a billion spin cycles. The arrangement soon starts repeating,
so only the first repetition needs simulating.
*/

impl Solution<PartTwo> for Day14 {
    type Input = Platform;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        const SPIN_CYCLES: usize = 1_000_000_000;
        Ok(input.load_after_spins(SPIN_CYCLES)?)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "O....#....
O.OO#....#
.....##...
OO.#O....O
.O.....O#.
O.#..O.#.#
..O..#O..O
.......O..
#....###..
#OO..#....
";

    const TILTED_NORTH: &str = "OOOO.#.O..
OO..#....#
OO..O##..O
O..#.OO...
........#.
..#....#.#
..O..#.O.O
..O.......
#....###..
#....#....
";

    const ONE_SPIN: &str = ".....#....
....#...O#
...OO##...
.OO#......
.....OOO#.
.O#...O#.#
....O#....
......OOOO
#...O###..
#..OO#....
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let platform = Platform::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day14 as Solution<PartOne>>::solve(&platform)?, 136);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let platform = Platform::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day14 as Solution<PartTwo>>::solve(&platform)?, 64);
        Ok(())
    }

    #[test]
    fn tilts_north() -> DynamicResult<()> {
        let mut platform = Platform::parse(EXAMPLE_INPUT)?;
        platform.tilt(Direction::Up);
        assert_eq!(platform.0.to_string(), TILTED_NORTH);
        Ok(())
    }

    #[test]
    fn spins_once() -> DynamicResult<()> {
        let mut platform = Platform::parse(EXAMPLE_INPUT)?;
        platform.spin();
        assert_eq!(platform.0.to_string(), ONE_SPIN);
        Ok(())
    }

    #[rstest]
    #[case(1, 87)]
    #[case(2, 69)]
    #[case(5, 65)]
    #[case(6, 64)]
    #[case(10, 69)]
    fn load_after_few_spins(#[case] spins: usize, #[case] expected: usize) -> DynamicResult<()> {
        let platform = Platform::parse(EXAMPLE_INPUT)?;
        assert_eq!(platform.load_after_spins(spins)?, expected);
        Ok(())
    }
}
