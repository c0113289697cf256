use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::ops::RangeInclusive;

use advent_framework::grid::{Direction, Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 17: Clumsy Crucible",
    parsed = City,
    part_one = Day17,
    part_two = Day17
)]
impl super::AdventOfCode2023<17> {}

/*
The city is a grid of digits, each the heat lost when a crucible moves into that block. The crucible
starts in the top left block and must reach the bottom right one. It cannot reverse, and it can only
go so far in a straight line before it has to turn. The heat of the starting block is not lost.
*/

#[derive(Error, Debug)]
enum Day17Error {
    #[error("no path found from the top left to the bottom right block")]
    NoPathFound,
}

/// Movement rules of a crucible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crucible {
    /// At most 3 blocks in a straight line.
    Simple,
    /// At least 4 and at most 10 blocks in a straight line before turning or stopping.
    Ultra,
}

impl Crucible {
    /// How far a single move goes in a straight line.
    fn moves(self) -> RangeInclusive<u8> {
        match self {
            Self::Simple => 1..=1,
            Self::Ultra => 4..=10,
        }
    }

    fn max_run(self) -> u8 {
        match self {
            Self::Simple => 3,
            Self::Ultra => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct State {
    position: Position,
    /// Direction of the last move; `None` only at the start.
    heading: Option<Direction>,
    /// Blocks moved in a straight line along `heading`.
    run: u8,
}

#[derive(Debug)]
struct City(Grid<u8>);

impl ParseData for City {
    fn parse(input: &str) -> DynamicResult<Self> {
        Ok(Self(Grid::from_digits(input)?))
    }
}

impl City {
    /// Least heat lost getting a crucible from the top left to the bottom right block.
    ///
    /// Dijkstra's search over states of position, heading and run length, since the same block
    /// can be worth revisiting with a different run behind it.
    fn min_heat_loss(&self, crucible: Crucible) -> DynamicResult<u32> {
        let destination = Position::new(self.0.height() - 1, self.0.width() - 1);
        let start = State {
            position: Position::new(0, 0),
            heading: None,
            run: 0,
        };
        let moves = crucible.moves();

        let mut best = HashMap::from([(start, 0u32)]);
        let mut frontier = BinaryHeap::from([Reverse((0u32, start))]);

        while let Some(Reverse((heat_loss, state))) = frontier.pop() {
            if state.position == destination {
                return Ok(heat_loss);
            }
            if best.get(&state).is_some_and(|&known| heat_loss > known) {
                continue;
            }

            for direction in Direction::ALL {
                if state
                    .heading
                    .is_some_and(|heading| heading.is_opposite(direction))
                {
                    continue;
                }

                let mut position = state.position;
                let mut next_loss = heat_loss;
                for distance in 1..=*moves.end() {
                    let Some(next) = self.0.step(position, direction) else {
                        break;
                    };
                    position = next;
                    next_loss = next_loss
                        .checked_add(u32::from(*self.0.at(position)?))
                        .ok_or(Overflow("heat loss"))?;
                    if distance < *moves.start() {
                        continue;
                    }

                    let run = if state.heading == Some(direction) {
                        state.run + distance
                    } else {
                        distance
                    };
                    if run > crucible.max_run() {
                        break;
                    }

                    let next_state = State {
                        position,
                        heading: Some(direction),
                        run,
                    };
                    if best.get(&next_state).is_none_or(|&known| next_loss < known) {
                        best.insert(next_state, next_loss);
                        frontier.push(Reverse((next_loss, next_state)));
                    }
                }
            }
        }

        Err(Day17Error::NoPathFound.into())
    }
}

struct Day17;

impl Solution<PartOne> for Day17 {
    type Input = City;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.min_heat_loss(Crucible::Simple)
    }
}

/*
Part 2 uses ultra crucibles, which need to move at least 4 blocks straight before they can turn or
stop at the destination, and can go up to 10.
*/

impl Solution<PartTwo> for Day17 {
    type Input = City;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.min_heat_loss(Crucible::Ultra)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "2413432311323
3215453535623
3255245654254
3446585845452
4546657867536
1438598798454
4457876987766
3637877979653
4654967986887
4564679986453
1224686865563
2546548887735
4322674655533
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let city = City::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day17 as Solution<PartOne>>::solve(&city)?, 102);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let city = City::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day17 as Solution<PartTwo>>::solve(&city)?, 94);
        Ok(())
    }

    #[rstest]
    #[case("311111\n259251\n749221\n", Crucible::Simple, 10)]
    #[case(
        "111111111111\n999999999991\n999999999991\n999999999991\n999999999991\n",
        Crucible::Ultra,
        71
    )]
    #[case("7\n", Crucible::Simple, 0)]
    #[case("7\n", Crucible::Ultra, 0)]
    fn small_cities(
        #[case] input: &str,
        #[case] crucible: Crucible,
        #[case] expected: u32,
    ) -> DynamicResult<()> {
        let city = City::parse(input)?;
        assert_eq!(city.min_heat_loss(crucible)?, expected);
        Ok(())
    }

    #[rstest]
    #[case(Crucible::Simple)]
    #[case(Crucible::Ultra)]
    fn repeated_searches_agree(#[case] crucible: Crucible) -> DynamicResult<()> {
        let city = City::parse(EXAMPLE_INPUT)?;
        assert_eq!(city.min_heat_loss(crucible)?, city.min_heat_loss(crucible)?);
        Ok(())
    }

    #[test]
    fn crucible_never_reverses() -> DynamicResult<()> {
        // turning back after three blocks would reach the end through the cheap row for 15
        let city = City::parse("11111\n99999\n")?;
        assert_eq!(city.min_heat_loss(Crucible::Simple)?, 21);

        // a single row leaves no way to break a run of four without reversing
        let city = City::parse("11111\n")?;
        let error = city.min_heat_loss(Crucible::Simple).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Day17Error>(),
            Some(Day17Error::NoPathFound)
        ));
        Ok(())
    }

    #[test]
    fn ultra_cannot_cross_a_small_city() -> DynamicResult<()> {
        let city = City::parse("12\n34\n")?;
        let error = city.min_heat_loss(Crucible::Ultra).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Day17Error>(),
            Some(Day17Error::NoPathFound)
        ));
        assert_eq!(city.min_heat_loss(Crucible::Simple)?, 6);
        Ok(())
    }

    #[test]
    fn ragged_city_is_rejected() {
        assert!(City::parse("123\n45\n").is_err());
    }
}
