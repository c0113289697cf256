use std::str::FromStr;

use advent_framework::parsing::{parse_input_lines, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(name = "Day 2: Cube Conundrum", parsed = Games, part_one = Day02, part_two = Day02)]
impl super::AdventOfCode2023<2> {}

/*
Each line is a game: `Game 11: 3 blue, 4 red; 1 red, 2 green, 6 blue`. A game reveals handfuls of
cubes from a bag, handfuls separated by `;`.
*/

#[derive(Error, Debug)]
enum Day02Error {
    #[error("expected a line starting with \"Game <id>:\"")]
    MissingGameId,
    #[error("expected \"<count> <colour>\", found {0:?}")]
    MalformedCubeCount(String),
    #[error("unknown cube colour {0:?}")]
    UnknownColour(String),
}

/// Cube counts per colour.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CubeSet {
    red: u32,
    green: u32,
    blue: u32,
}

impl CubeSet {
    fn fits_within(self, bag: Self) -> bool {
        self.red <= bag.red && self.green <= bag.green && self.blue <= bag.blue
    }

    /// Colour-wise maximum of both sets.
    fn union(self, other: Self) -> Self {
        Self {
            red: self.red.max(other.red),
            green: self.green.max(other.green),
            blue: self.blue.max(other.blue),
        }
    }

    fn power(self) -> Option<u32> {
        self.red.checked_mul(self.green)?.checked_mul(self.blue)
    }
}

impl FromStr for CubeSet {
    type Err = DynamicError;

    /// Parse one handful such as `3 blue, 4 red`.
    fn from_str(handful: &str) -> Result<Self, Self::Err> {
        let mut set = Self::default();
        for cubes in handful.split(',').map(str::trim) {
            let (count, colour) = cubes
                .split_once(' ')
                .ok_or_else(|| Day02Error::MalformedCubeCount(cubes.to_owned()))?;
            let count: u32 = parse_with_context(count)?;
            let slot = match colour {
                "red" => &mut set.red,
                "green" => &mut set.green,
                "blue" => &mut set.blue,
                other => return Err(Day02Error::UnknownColour(other.to_owned()).into()),
            };
            *slot = slot.checked_add(count).ok_or(Overflow("cube count"))?;
        }
        Ok(set)
    }
}

#[derive(Debug)]
struct Game {
    id: u32,
    handfuls: Vec<CubeSet>,
}

impl Game {
    /// The fewest cubes of each colour that could have produced every handful.
    fn minimum_bag(&self) -> CubeSet {
        self.handfuls
            .iter()
            .fold(CubeSet::default(), |bag, &handful| bag.union(handful))
    }
}

impl FromStr for Game {
    type Err = DynamicError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (header, handfuls) = line.split_once(':').ok_or(Day02Error::MissingGameId)?;
        let id = header
            .strip_prefix("Game ")
            .ok_or(Day02Error::MissingGameId)?;
        Ok(Self {
            id: parse_with_context(id)?,
            handfuls: handfuls
                .split(';')
                .map(str::parse::<CubeSet>)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug)]
struct Games(Vec<Game>);

impl ParseData for Games {
    fn parse(input: &str) -> DynamicResult<Self> {
        let games = parse_input_lines(input, |_, line| line.parse::<Game>())
            .collect::<Result<_, _>>()?;
        Ok(Self(games))
    }
}

struct Day02;

impl Day02 {
    const BAG: CubeSet = CubeSet {
        red: 12,
        green: 13,
        blue: 14,
    };
}

impl Solution<PartOne> for Day02 {
    type Input = Games;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input
            .0
            .iter()
            .filter(|game| game.handfuls.iter().all(|handful| handful.fits_within(Self::BAG)))
            .map(|game| game.id)
            .checked_sum()
            .ok_or(Overflow("sum of possible game ids"))?)
    }
}

impl Solution<PartTwo> for Day02 {
    type Input = Games;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let powers = input
            .0
            .iter()
            .map(|game| game.minimum_bag().power())
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("cube set power"))?;
        Ok(powers
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("sum of powers"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = "Game 1: 3 blue, 4 red; 1 red, 2 green, 6 blue; 2 green
Game 2: 1 blue, 2 green; 3 green, 4 blue, 1 red; 1 green, 1 blue
Game 3: 8 green, 6 blue, 20 red; 5 blue, 4 red, 13 green; 5 green, 1 red
Game 4: 1 green, 3 red, 6 blue; 3 green, 6 red; 3 green, 15 blue, 14 red
Game 5: 6 red, 1 blue, 3 green; 2 blue, 1 red, 2 green
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let games = Games::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day02 as Solution<PartOne>>::solve(&games)?, 8);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let games = Games::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day02 as Solution<PartTwo>>::solve(&games)?, 2286);
        Ok(())
    }

    #[test]
    fn minimum_bag_of_first_game() -> DynamicResult<()> {
        let game: Game = "Game 1: 3 blue, 4 red; 1 red, 2 green, 6 blue; 2 green".parse()?;
        assert_eq!(
            game.minimum_bag(),
            CubeSet {
                red: 4,
                green: 2,
                blue: 6
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_colour_is_rejected() {
        assert!(Games::parse("Game 1: 3 purple").is_err());
        assert!(Games::parse("Round 1: 3 red").is_err());
    }
}
