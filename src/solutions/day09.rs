use advent_framework::parsing::{parse_input_lines, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 9: Mirage Maintenance",
    parsed = Report,
    part_one = Day09,
    part_two = Day09
)]
impl super::AdventOfCode2023<9> {}

/*
Every line of the report is the history of one reading, as signed integers separated by spaces.
Taking differences between neighbouring values repeatedly ends in a layer of zeros; extrapolating
back up that stack predicts values outside the history.
*/

#[derive(Error, Debug)]
enum Day09Error {
    #[error("history has no values")]
    EmptyHistory,
}

#[derive(Debug)]
struct History(Vec<i64>);

impl std::str::FromStr for History {
    type Err = DynamicError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let values: Vec<i64> = line
            .split_whitespace()
            .map(parse_with_context)
            .collect::<Result<_, _>>()?;
        if values.is_empty() {
            return Err(Day09Error::EmptyHistory.into());
        }
        Ok(Self(values))
    }
}

/// Layers of differences, starting with the values themselves and ending with an all zero layer
/// (or a single value, whose differences would be empty).
fn difference_stack(values: &[i64]) -> Result<Vec<Vec<i64>>, Overflow> {
    let mut stack = vec![values.to_vec()];
    while let Some(layer) = stack.last() {
        if layer.len() <= 1 || layer.iter().all(|&value| value == 0) {
            break;
        }
        let next = layer
            .windows(2)
            .map(|pair| pair[1].checked_sub(pair[0]))
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("difference layer"))?;
        stack.push(next);
    }
    Ok(stack)
}

impl History {
    fn predict_next(&self) -> Result<i64, Overflow> {
        difference_stack(&self.0)?
            .iter()
            .filter_map(|layer| layer.last().copied())
            .checked_sum()
            .ok_or(Overflow("next value"))
    }

    fn predict_previous(&self) -> Result<i64, Overflow> {
        difference_stack(&self.0)?
            .iter()
            .rev()
            .filter_map(|layer| layer.first().copied())
            .try_fold(0i64, |below, first| first.checked_sub(below))
            .ok_or(Overflow("previous value"))
    }
}

#[derive(Debug)]
struct Report(Vec<History>);

impl ParseData for Report {
    fn parse(input: &str) -> DynamicResult<Self> {
        let histories =
            parse_input_lines(input, |_, line| line.parse::<History>()).collect::<Result<_, _>>()?;
        Ok(Self(histories))
    }
}

impl Report {
    fn sum_predictions(
        &self,
        predict: impl Fn(&History) -> Result<i64, Overflow>,
    ) -> DynamicResult<i64> {
        let predictions = self
            .0
            .iter()
            .map(predict)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(predictions
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("sum of predictions"))?)
    }
}

struct Day09;

impl Solution<PartOne> for Day09 {
    type Input = Report;
    type Output = i64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.sum_predictions(History::predict_next)
    }
}

/*
Part 2 extrapolates backwards: each layer's predicted value is its first value minus the prediction
of the layer below.
*/

impl Solution<PartTwo> for Day09 {
    type Input = Report;
    type Output = i64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.sum_predictions(History::predict_previous)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "0 3 6 9 12 15
1 3 6 10 15 21
10 13 16 21 30 45
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let report = Report::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day09 as Solution<PartOne>>::solve(&report)?, 114);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let report = Report::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day09 as Solution<PartTwo>>::solve(&report)?, 2);
        Ok(())
    }

    #[rstest]
    #[case("0 3 6 9 12 15", 18, -3)]
    #[case("1 3 6 10 15 21", 28, 0)]
    #[case("10 13 16 21 30 45", 68, 5)]
    #[case("-2 -4 -6", -8, 0)]
    #[case("7", 7, 7)]
    fn predicts_both_ends(
        #[case] line: &str,
        #[case] next: i64,
        #[case] previous: i64,
    ) -> DynamicResult<()> {
        let history: History = line.parse()?;
        assert_eq!(history.predict_next()?, next);
        assert_eq!(history.predict_previous()?, previous);
        Ok(())
    }

    #[test]
    fn stack_ends_with_zeros() -> DynamicResult<()> {
        let stack = difference_stack(&[1, 3, 6, 10])?;
        assert_eq!(stack, vec![vec![1, 3, 6, 10], vec![2, 3, 4], vec![1, 1], vec![0]]);
        Ok(())
    }

    #[test]
    fn overflowing_difference_is_reported() {
        assert!(difference_stack(&[i64::MIN, i64::MAX]).is_err());
    }

    #[test]
    fn blank_line_is_rejected() {
        let error = Report::parse("1 2\n\n3 4\n").unwrap_err();
        assert_eq!(error.to_string(), "invalid input on line 2");
    }
}
