use advent_framework::parsing::parse_with_context;
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use thiserror::Error;

use crate::arithmetic::{CheckedProduct, Overflow};

#[solution_runner(name = "Day 6: Wait For It", parsed = RaceSheet, part_one = Day06, part_two = Day06)]
impl super::AdventOfCode2023<6> {}

/*
Holding the boat's button for `h` milliseconds of a race lasting `t` gives a speed of `h`, so the
boat travels `h * (t - h)`. A hold time wins when that distance beats the record `d`.

The winning hold times are the integers strictly between the roots of `h^2 - t*h + d`.
*/

#[derive(Error, Debug)]
enum Day06Error {
    #[error("expected a line starting with {0:?}")]
    MissingLine(&'static str),
    #[error("found {times} times but {distances} distances")]
    MismatchedColumns { times: usize, distances: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Race {
    time: u64,
    record: u64,
}

impl Race {
    fn distance(self, hold: u64) -> u128 {
        u128::from(hold) * u128::from(self.time.saturating_sub(hold))
    }

    fn wins(self, hold: u64) -> bool {
        self.distance(hold) > u128::from(self.record)
    }

    /// Roots of `h^2 - t*h + d`, lower first. `None` when the record cannot be beaten.
    #[expect(clippy::cast_precision_loss, reason = "puzzle values fit well within f64")]
    fn hold_roots(self) -> Option<(f64, f64)> {
        let time = self.time as f64;
        let record = self.record as f64;
        let discriminant = time.mul_add(time, -4.0 * record);
        if discriminant <= 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        Some(((time - root) / 2.0, (time + root) / 2.0))
    }

    /// Number of integer hold times beating the record.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "roots lie within 0..=time"
    )]
    fn ways_to_win(self) -> u64 {
        let Some((low_root, high_root)) = self.hold_roots() else {
            return 0;
        };
        let mut low = (low_root.floor().max(0.0) as u64).saturating_add(1);
        let mut high = (high_root.ceil() as u64).min(self.time).saturating_sub(1);

        // settle float rounding with exact integer checks
        while low > 0 && self.wins(low - 1) {
            low -= 1;
        }
        while low <= high && !self.wins(low) {
            low += 1;
        }
        while high < self.time && self.wins(high + 1) {
            high += 1;
        }
        while high >= low && !self.wins(high) {
            high -= 1;
        }

        if high < low { 0 } else { high - low + 1 }
    }
}

#[derive(Debug)]
struct RaceSheet {
    races: Vec<Race>,
    /// The sheet read with its spaces removed.
    single_race: Race,
}

impl ParseData for RaceSheet {
    fn parse(input: &str) -> DynamicResult<Self> {
        fn columns<'a>(
            lines: &mut impl Iterator<Item = &'a str>,
            label: &'static str,
        ) -> Result<Vec<&'a str>, Day06Error> {
            lines
                .next()
                .and_then(|line| line.strip_prefix(label))
                .map(|numbers| numbers.split_whitespace().collect())
                .ok_or(Day06Error::MissingLine(label))
        }

        let mut lines = input.lines().filter(|line| !line.trim().is_empty());
        let times = columns(&mut lines, "Time:")?;
        let distances = columns(&mut lines, "Distance:")?;
        if times.len() != distances.len() {
            return Err(Day06Error::MismatchedColumns {
                times: times.len(),
                distances: distances.len(),
            }
            .into());
        }

        let races = times
            .iter()
            .zip(&distances)
            .map(|(time, record)| -> DynamicResult<Race> {
                Ok(Race {
                    time: parse_with_context(time)?,
                    record: parse_with_context(record)?,
                })
            })
            .collect::<DynamicResult<_>>()?;
        let single_race = Race {
            time: parse_with_context(&times.concat())?,
            record: parse_with_context(&distances.concat())?,
        };

        Ok(Self { races, single_race })
    }
}

struct Day06;

impl Solution<PartOne> for Day06 {
    type Input = RaceSheet;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input
            .races
            .iter()
            .map(|race| race.ways_to_win())
            .checked_product()
            .ok_or(Overflow("product of ways to win"))?)
    }
}

/*
For part 2 the spaces on the sheet were a mistake: it describes one long race.
*/

impl Solution<PartTwo> for Day06 {
    type Input = RaceSheet;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.single_race.ways_to_win())
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "Time:      7  15   30
Distance:  9  40  200
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let sheet = RaceSheet::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day06 as Solution<PartOne>>::solve(&sheet)?, 288);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let sheet = RaceSheet::parse(EXAMPLE_INPUT)?;
        assert_eq!(
            sheet.single_race,
            Race {
                time: 71530,
                record: 940_200
            }
        );
        assert_eq!(<Day06 as Solution<PartTwo>>::solve(&sheet)?, 71503);
        Ok(())
    }

    #[test]
    fn roots_of_first_race() {
        let race = Race { time: 7, record: 9 };
        let (low, high) = race.hold_roots().unwrap();
        assert_float_eq!(low, 1.697_224_362, abs <= 1e-9);
        assert_float_eq!(high, 5.302_775_638, abs <= 1e-9);
    }

    #[rstest]
    #[case(7, 9, 4)]
    #[case(15, 40, 8)]
    #[case(30, 200, 9)]
    // exact roots at 2 and 4 must not count
    #[case(6, 8, 1)]
    #[case(4, 4, 0)]
    #[case(3, 100, 0)]
    fn ways_to_win(#[case] time: u64, #[case] record: u64, #[case] expected: u64) {
        assert_eq!(Race { time, record }.ways_to_win(), expected);
    }

    #[test]
    fn missing_distance_line_is_rejected() {
        assert!(RaceSheet::parse("Time: 7 15\n").is_err());
        assert!(RaceSheet::parse("Time: 7 15\nDistance: 9\n").is_err());
    }
}
