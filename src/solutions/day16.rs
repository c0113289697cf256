use std::collections::{HashSet, VecDeque};

use advent_framework::grid::{Direction, Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use thiserror::Error;

#[solution_runner(
    name = "Day 16: The Floor Will Be Lava",
    parsed = Contraption,
    part_one = Day16,
    part_two = Day16
)]
impl super::AdventOfCode2023<16> {}

/*
The contraption is a grid of empty space `.`, mirrors `/` and `\`, and splitters `|` and `-`. A
beam turns 90 degrees at a mirror. At a splitter it passes through when travelling along the
splitter, otherwise it leaves through both of the splitter's ends. Every tile a beam passes through
is energized.
*/

#[derive(Error, Debug)]
enum Day16Error {
    #[error("invalid contraption tile {0:?}")]
    InvalidTile(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    /// `/`
    ForwardMirror,
    /// `\`
    BackwardMirror,
    /// `|`
    VerticalSplitter,
    /// `-`
    HorizontalSplitter,
}

impl Tile {
    /// Directions a beam leaves this tile in after entering it heading `heading`.
    fn deflect(self, heading: Direction) -> Vec<Direction> {
        match self {
            Self::Empty => vec![heading],
            Self::ForwardMirror => match heading {
                Direction::Up | Direction::Down => vec![heading.turn_right()],
                Direction::Left | Direction::Right => vec![heading.turn_left()],
            },
            Self::BackwardMirror => match heading {
                Direction::Up | Direction::Down => vec![heading.turn_left()],
                Direction::Left | Direction::Right => vec![heading.turn_right()],
            },
            Self::VerticalSplitter if !heading.is_vertical() => vec![Direction::Up, Direction::Down],
            Self::HorizontalSplitter if heading.is_vertical() => {
                vec![Direction::Left, Direction::Right]
            }
            Self::VerticalSplitter | Self::HorizontalSplitter => vec![heading],
        }
    }
}

#[derive(Debug)]
struct Contraption(Grid<Tile>);

impl ParseData for Contraption {
    fn parse(input: &str) -> DynamicResult<Self> {
        let grid = Grid::parse(input, |tile| match tile {
            '.' => Ok(Tile::Empty),
            '/' => Ok(Tile::ForwardMirror),
            '\\' => Ok(Tile::BackwardMirror),
            '|' => Ok(Tile::VerticalSplitter),
            '-' => Ok(Tile::HorizontalSplitter),
            other => Err(Day16Error::InvalidTile(other)),
        })?;
        Ok(Self(grid))
    }
}

impl Contraption {
    /// Number of energized tiles for a beam entering at `start` heading `heading`.
    fn energized(&self, start: Position, heading: Direction) -> usize {
        let mut seen = HashSet::new();
        let mut beams = VecDeque::from([(start, heading)]);

        while let Some((position, heading)) = beams.pop_front() {
            let Some(&tile) = self.0.get(position) else {
                continue;
            };
            if !seen.insert((position, heading)) {
                continue;
            }
            for direction in tile.deflect(heading) {
                if let Some(next) = self.0.step(position, direction) {
                    beams.push_back((next, direction));
                }
            }
        }

        seen.iter()
            .map(|&(position, _)| position)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Every way a beam can enter from the edge: position and heading.
    fn entries(&self) -> impl Iterator<Item = (Position, Direction)> {
        let (last_row, last_col) = (self.0.height() - 1, self.0.width() - 1);
        let vertical = (0..=last_col).flat_map(move |col| {
            [
                (Position::new(0, col), Direction::Down),
                (Position::new(last_row, col), Direction::Up),
            ]
        });
        let horizontal = (0..=last_row).flat_map(move |row| {
            [
                (Position::new(row, 0), Direction::Right),
                (Position::new(row, last_col), Direction::Left),
            ]
        });
        vertical.chain(horizontal)
    }
}

struct Day16;

impl Solution<PartOne> for Day16 {
    type Input = Contraption;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.energized(Position::new(0, 0), Direction::Right))
    }
}

/*
For part 2 the beam may enter from any edge tile, heading away from that edge. Find the entry that
energizes the most tiles.
*/

impl Solution<PartTwo> for Day16 {
    type Input = Contraption;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input
            .entries()
            .map(|(start, heading)| input.energized(start, heading))
            .max()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = r".|...\....
|.-.\.....
.....|-...
........|.
..........
.........\
..../.\\..
.-.-/..|..
.|....-|.\
..//.|....
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let contraption = Contraption::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day16 as Solution<PartOne>>::solve(&contraption)?, 46);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let contraption = Contraption::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day16 as Solution<PartTwo>>::solve(&contraption)?, 51);
        Ok(())
    }

    #[test]
    fn best_entry_is_from_the_top() -> DynamicResult<()> {
        let contraption = Contraption::parse(EXAMPLE_INPUT)?;
        assert_eq!(contraption.energized(Position::new(0, 3), Direction::Down), 51);
        Ok(())
    }

    #[rstest]
    #[case(Tile::ForwardMirror, Direction::Right, vec![Direction::Up])]
    #[case(Tile::ForwardMirror, Direction::Down, vec![Direction::Left])]
    #[case(Tile::BackwardMirror, Direction::Right, vec![Direction::Down])]
    #[case(Tile::BackwardMirror, Direction::Up, vec![Direction::Left])]
    #[case(Tile::VerticalSplitter, Direction::Left, vec![Direction::Up, Direction::Down])]
    #[case(Tile::VerticalSplitter, Direction::Up, vec![Direction::Up])]
    #[case(Tile::HorizontalSplitter, Direction::Down, vec![Direction::Left, Direction::Right])]
    #[case(Tile::HorizontalSplitter, Direction::Right, vec![Direction::Right])]
    fn deflects_beams(
        #[case] tile: Tile,
        #[case] heading: Direction,
        #[case] expected: Vec<Direction>,
    ) {
        assert_eq!(tile.deflect(heading), expected);
    }

    #[test]
    fn loops_terminate() -> DynamicResult<()> {
        let contraption = Contraption::parse("/-\\\n|.|\n\\-/\n")?;
        assert_eq!(contraption.energized(Position::new(0, 1), Direction::Right), 8);
        Ok(())
    }

    #[test]
    fn entries_cover_every_edge() -> DynamicResult<()> {
        let contraption = Contraption::parse("...\n...\n")?;
        assert_eq!(contraption.entries().count(), 2 * 3 + 2 * 2);
        Ok(())
    }
}
