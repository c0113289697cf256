//! Puzzle solutions for Advent of Code 2023, one submodule per day.
//!
//! Each submodule implements [`SolutionRunner`] for [`AdventOfCode2023<DAY>`] through
//! [`#[solution_runner]`][advent_framework::runner::solution_runner], and [`run_day`] dispatches
//! on the day number. Adding a day means declaring its module and adding its match arm.

#![warn(clippy::dbg_macro, clippy::print_stderr, clippy::print_stdout)]

use advent_framework::DynamicResult;
use advent_framework::runner::{OutputHandler, SolutionRunner};
use thiserror::Error;

mod day01;
mod day02;
mod day03;
mod day04;
mod day05;
mod day06;
mod day07;
mod day08;
mod day09;
mod day10;
mod day11;
mod day12;
mod day13;
mod day14;
mod day15;
mod day16;
mod day17;
mod day18;
mod day19;
mod day20;
mod day21;

/// Solutions collected by day number.
///
/// ```ignore
/// // in "day01.rs"
/// #[solution_runner(name = "Day 1: Trebuchet?!", parsed = Calibration, part_one = Day01)]
/// impl super::AdventOfCode2023<1> {}
/// ```
pub struct AdventOfCode2023<const DAY: u8>;

/// No solution exists for the requested day.
#[derive(Error, Debug)]
#[error("no solution available for day {0}")]
pub struct DayNotAvailable(pub u8);

/// Run the solution of `day` against `input`.
///
/// # Errors
///
/// [`DayNotAvailable`] outside of days 1 to 21; otherwise whatever the day's parse step or
/// solutions raise.
pub fn run_day(
    day: u8,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()> {
    match day {
        1 => AdventOfCode2023::<1>::run(input, handler, timed),
        2 => AdventOfCode2023::<2>::run(input, handler, timed),
        3 => AdventOfCode2023::<3>::run(input, handler, timed),
        4 => AdventOfCode2023::<4>::run(input, handler, timed),
        5 => AdventOfCode2023::<5>::run(input, handler, timed),
        6 => AdventOfCode2023::<6>::run(input, handler, timed),
        7 => AdventOfCode2023::<7>::run(input, handler, timed),
        8 => AdventOfCode2023::<8>::run(input, handler, timed),
        9 => AdventOfCode2023::<9>::run(input, handler, timed),
        10 => AdventOfCode2023::<10>::run(input, handler, timed),
        11 => AdventOfCode2023::<11>::run(input, handler, timed),
        12 => AdventOfCode2023::<12>::run(input, handler, timed),
        13 => AdventOfCode2023::<13>::run(input, handler, timed),
        14 => AdventOfCode2023::<14>::run(input, handler, timed),
        15 => AdventOfCode2023::<15>::run(input, handler, timed),
        16 => AdventOfCode2023::<16>::run(input, handler, timed),
        17 => AdventOfCode2023::<17>::run(input, handler, timed),
        18 => AdventOfCode2023::<18>::run(input, handler, timed),
        19 => AdventOfCode2023::<19>::run(input, handler, timed),
        20 => AdventOfCode2023::<20>::run(input, handler, timed),
        21 => AdventOfCode2023::<21>::run(input, handler, timed),
        _ => Err(DayNotAvailable(day).into()),
    }
}

#[cfg(test)]
mod tests {
    use advent_framework::PartKind;
    use advent_framework::runner::{RecordingHandler, RunEvent};

    use super::*;

    #[test]
    fn runs_a_day_through_the_handler() -> DynamicResult<()> {
        let mut handler = RecordingHandler::default();
        run_day(9, "0 3 6 9 12 15\n10 13 16 21 30 45\n", &mut handler, false)?;

        assert_eq!(
            handler.events.first(),
            Some(&RunEvent::Name("Day 9: Mirage Maintenance".to_owned()))
        );
        assert_eq!(handler.answer(PartKind::One), Some("86"));
        assert_eq!(handler.answer(PartKind::Two), Some("2"));
        Ok(())
    }

    #[test]
    fn unknown_day_is_not_available() {
        let mut handler = RecordingHandler::default();
        let error = run_day(22, "", &mut handler, false).unwrap_err();
        assert_eq!(error.to_string(), "no solution available for day 22");
        assert!(handler.events.is_empty());
    }

    #[test]
    fn parse_errors_propagate() {
        let mut handler = RecordingHandler::default();
        assert!(run_day(17, "12\n3x\n", &mut handler, false).is_err());
        assert_eq!(handler.answer(PartKind::One), None);
    }
}
