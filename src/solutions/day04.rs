use std::collections::HashSet;

use advent_framework::parsing::{parse_input_lines, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(name = "Day 4: Scratchcards", parsed = Cards, part_one = Day04, part_two = Day04)]
impl super::AdventOfCode2023<4> {}

#[derive(Error, Debug)]
enum Day04Error {
    #[error("expected \"Card <id>:\" before the numbers")]
    MissingCardHeader,
    #[error("expected '|' between winning and scratched numbers")]
    MissingSeparator,
}

/// Only the number of matches matters once a card is parsed.
#[derive(Debug)]
struct Cards(Vec<usize>);

fn parse_numbers(list: &str) -> DynamicResult<HashSet<u32>> {
    let mut numbers = HashSet::new();
    for number in list.split_whitespace() {
        numbers.insert(parse_with_context(number)?);
    }
    Ok(numbers)
}

impl ParseData for Cards {
    fn parse(input: &str) -> DynamicResult<Self> {
        let matches = parse_input_lines(input, |_, line| -> DynamicResult<usize> {
            let (_, numbers) = line.split_once(':').ok_or(Day04Error::MissingCardHeader)?;
            let (winning, scratched) =
                numbers.split_once('|').ok_or(Day04Error::MissingSeparator)?;
            let winning = parse_numbers(winning)?;
            Ok(parse_numbers(scratched)?.intersection(&winning).count())
        })
        .collect::<Result<_, _>>()?;
        Ok(Self(matches))
    }
}

struct Day04;

/*
Part 1 scores a card 1 point for its first match, doubling for each further match.
*/

impl Solution<PartOne> for Day04 {
    type Input = Cards;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let points = input
            .0
            .iter()
            .filter(|&&matches| matches > 0)
            .map(|&matches| {
                u32::try_from(matches - 1)
                    .ok()
                    .and_then(|exponent| 1u64.checked_shl(exponent))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("card points"))?;
        Ok(points
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("sum of points"))?)
    }
}

/*
For part 2, a card with `n` matches wins one copy of each of the next `n` cards, and every copy
wins the same way. Copies never extend past the last card. Count all cards held at the end.
*/

impl Solution<PartTwo> for Day04 {
    type Input = Cards;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut copies = vec![1u64; input.0.len()];
        for (index, &matches) in input.0.iter().enumerate() {
            let held = copies[index];
            let won = (index + 1)..(index + 1 + matches).min(copies.len());
            for count in &mut copies[won] {
                *count = count.checked_add(held).ok_or(Overflow("card copies"))?;
            }
        }
        Ok(copies
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("total cards"))?)
    }
}
