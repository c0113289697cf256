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
    clippy::suspicious_operation_groupings,
    clippy::trait_duplication_in_bounds,
    clippy::type_repetition_in_bounds,
    clippy::use_self,
    clippy::useless_let_if_seq
)]
#![deny(clippy::expect_used, clippy::unwrap_used)]

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use advent_framework::PartKind;
use advent_framework::runner::OutputHandler;
use anyhow::{Context, Error, Result};
use clap::{ArgAction, Parser};

mod arithmetic;
mod solutions;

/// Solve an Advent of Code 2023 puzzle.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Day of the puzzle to solve, 1 to 21.
    #[arg(value_parser = clap::value_parser!(u8).range(1..=25))]
    day: u8,

    /// Read the puzzle input from FILE instead of the inputs directory.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory holding default inputs named `dayNN.txt`.
    #[arg(long, value_name = "DIR", env = "ADVENT_INPUTS_DIR", default_value = "inputs")]
    inputs_dir: PathBuf,

    /// Time parsing and each part.
    #[arg(short, long, action = ArgAction::SetTrue)]
    timed: bool,

    /// Only print durations of at least this many milliseconds; 0 prints all.
    #[arg(long, value_name = "MILLISECONDS", default_value_t)]
    min_timing_ms: u64,
}

impl Cli {
    fn input_path(&self) -> PathBuf {
        self.input.clone().unwrap_or_else(|| {
            self.inputs_dir
                .join(format!("day{day:02}.txt", day = self.day))
        })
    }
}

fn read_input(path: &Path, is_default: bool) -> Result<String> {
    fs::read_to_string(path).with_context(|| {
        if is_default {
            format!(
                "default input file missing: {}\n\n\
                create it, set --inputs-dir, or pass --input",
                path.display()
            )
        } else {
            format!("could not read input file at: {}", path.display())
        }
    })
}

/// Prints runner events to stdout.
struct ConsoleHandler {
    min_duration: Duration,
}

impl ConsoleHandler {
    fn format_duration(duration: Duration) -> String {
        let nanos = duration.as_nanos();
        if duration >= Duration::from_secs(1) {
            format!("{:.3} s", duration.as_secs_f64())
        } else if duration >= Duration::from_millis(1) {
            format!("{:.3} ms", duration.as_secs_f64() * 1e3)
        } else if duration >= Duration::from_micros(1) {
            format!("{:.3} µs", duration.as_secs_f64() * 1e6)
        } else {
            format!("{nanos} ns")
        }
    }

    fn shown_duration(&self, duration_opt: Option<Duration>) -> Option<String> {
        duration_opt
            .filter(|duration| *duration >= self.min_duration)
            .map(Self::format_duration)
    }
}

impl OutputHandler for ConsoleHandler {
    fn solution_name(&mut self, name: &str) {
        println!("= {name} =");
    }

    fn parse_start(&mut self) {}

    fn parse_end(&mut self, duration_opt: Option<Duration>) {
        if let Some(duration) = self.shown_duration(duration_opt) {
            println!("parsed input in {duration}");
        }
    }

    fn part_start(&mut self, part: PartKind) {
        println!("-- {part} --");
    }

    fn part_output(&mut self, _part: PartKind, output: &dyn Display, duration_opt: Option<Duration>) {
        match self.shown_duration(duration_opt) {
            Some(duration) => println!("{output} ({duration})"),
            None => println!("{output}"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let input = read_input(&cli.input_path(), cli.input.is_none())?;

    let mut handler = ConsoleHandler {
        min_duration: Duration::from_millis(cli.min_timing_ms),
    };
    solutions::run_day(cli.day, &input, &mut handler, cli.timed)
        .map_err(|error| Error::from_boxed(error).context("failed to run solution"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_input_lives_in_inputs_dir() {
        let cli = Cli::parse_from(["advent", "7", "--inputs-dir", "puzzles"]);
        assert_eq!(cli.input_path(), PathBuf::from("puzzles").join("day07.txt"));
    }

    #[test]
    fn explicit_input_wins() {
        let cli = Cli::parse_from(["advent", "12", "-i", "sample.txt", "-t"]);
        assert_eq!(cli.input_path(), PathBuf::from("sample.txt"));
        assert!(cli.timed);
    }

    #[test]
    fn day_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["advent", "0"]).is_err());
        assert!(Cli::try_parse_from(["advent", "26"]).is_err());
    }

    #[test]
    fn durations_are_scaled() {
        assert_eq!(ConsoleHandler::format_duration(Duration::from_millis(1500)), "1.500 s");
        assert_eq!(ConsoleHandler::format_duration(Duration::from_micros(2500)), "2.500 ms");
        assert_eq!(ConsoleHandler::format_duration(Duration::from_nanos(40)), "40 ns");
    }
}
