use advent_framework::parsing::parse_input_lines;
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(name = "Day 1: Trebuchet?!", part_one = Day01, part_two = Day01)]
impl super::AdventOfCode2023<1> {}

/*
Each line of the calibration document hides a two digit value: its first digit followed by its
last digit. A line with a single digit uses it twice. The answer is the sum over all lines.

Part 2 also counts digits spelled out in english. Spellings may share letters, so `eightwo` holds
an 8 and then a 2.
*/

#[derive(Error, Debug)]
enum Day01Error {
    #[error("no digit found in line")]
    NoDigit,
}

const SPELLED_DIGITS: [&str; 9] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// The digit starting at byte `index` of `line`, if any.
fn digit_at(line: &str, index: usize, spelled: bool) -> Option<u32> {
    let rest = &line[index..];
    let first = rest.chars().next()?;
    if let Some(digit) = first.to_digit(10) {
        return Some(digit);
    }
    if !spelled {
        return None;
    }
    (1..)
        .zip(SPELLED_DIGITS)
        .find_map(|(value, word)| rest.starts_with(word).then_some(value))
}

fn calibration_value(line: &str, spelled: bool) -> Result<u32, Day01Error> {
    let mut digits = line
        .char_indices()
        .filter_map(|(index, _)| digit_at(line, index, spelled));
    let first = digits.next().ok_or(Day01Error::NoDigit)?;
    let last = digits.last().unwrap_or(first);
    Ok(first * 10 + last)
}

fn sum_calibration_values(input: &str, spelled: bool) -> DynamicResult<u32> {
    let values = parse_input_lines(input, |_, line| calibration_value(line, spelled))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values
        .into_iter()
        .checked_sum()
        .ok_or(Overflow("calibration sum"))?)
}

struct Day01;

impl Solution<PartOne> for Day01 {
    type Input = str;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        sum_calibration_values(input, false)
    }
}

impl Solution<PartTwo> for Day01 {
    type Input = str;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        sum_calibration_values(input, true)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_ONE: &str = "1abc2
pqr3stu8vwx
a1b2c3d4e5f
treb7uchet
";

    const EXAMPLE_TWO: &str = "two1nine
eightwothree
abcone2threexyz
xtwone3four
4nineeightseven2
zoneight234
7pqrstsixteen
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        assert_eq!(<Day01 as Solution<PartOne>>::solve(EXAMPLE_ONE)?, 142);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        assert_eq!(<Day01 as Solution<PartTwo>>::solve(EXAMPLE_TWO)?, 281);
        Ok(())
    }

    #[rstest]
    #[case("treb7uchet", 77)]
    #[case("eightwo", 82)]
    #[case("oneight", 18)]
    #[case("7pqrstsixteen", 76)]
    #[case("xtwone3four", 24)]
    fn spelled_values(#[case] line: &str, #[case] expected: u32) -> Result<(), Day01Error> {
        assert_eq!(calibration_value(line, true)?, expected);
        Ok(())
    }

    #[test]
    fn line_without_digit_is_an_error() {
        let error = <Day01 as Solution<PartOne>>::solve("12\nabc\n").unwrap_err();
        assert_eq!(error.to_string(), "invalid input on line 2");
    }
}
