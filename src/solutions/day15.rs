use advent_framework::parsing::parse_with_context;
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 15: Lens Library",
    parsed = InitSequence,
    part_one = Day15,
    part_two = Day15
)]
impl super::AdventOfCode2023<15> {}

/*
The initialization sequence is a comma separated list of steps; newlines are ignored. Part 1 sums
the HASH of every step, where HASH folds each byte into `(current + byte) * 17 % 256`.
*/

#[derive(Error, Debug)]
enum Day15Error {
    #[error("step {0:?} is neither \"label=focal\" nor \"label-\"")]
    MalformedStep(String),
}

fn hash(text: &str) -> u8 {
    text.bytes()
        .fold(0u8, |current, byte| current.wrapping_add(byte).wrapping_mul(17))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    Insert(u8),
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    text: String,
    label: String,
    operation: Operation,
}

impl std::str::FromStr for Step {
    type Err = DynamicError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (label, operation) = if let Some(label) = text.strip_suffix('-') {
            (label, Operation::Remove)
        } else if let Some((label, focal)) = text.split_once('=') {
            (label, Operation::Insert(parse_with_context(focal)?))
        } else {
            return Err(Day15Error::MalformedStep(text.to_owned()).into());
        };
        Ok(Self {
            text: text.to_owned(),
            label: label.to_owned(),
            operation,
        })
    }
}

#[derive(Debug)]
struct InitSequence(Vec<Step>);

impl ParseData for InitSequence {
    fn parse(input: &str) -> DynamicResult<Self> {
        let joined: String = input.lines().collect();
        let steps = joined
            .split(',')
            .filter(|step| !step.is_empty())
            .map(str::parse::<Step>)
            .collect::<Result<_, _>>()?;
        Ok(Self(steps))
    }
}

struct Day15;

impl Solution<PartOne> for Day15 {
    type Input = InitSequence;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input
            .0
            .iter()
            .map(|step| u64::from(hash(&step.text)))
            .checked_sum()
            .ok_or(Overflow("sum of hashes"))?)
    }
}

/*
For part 2 there are 256 boxes of lenses, and the HASH of a step's label picks its box.
`label=f` replaces the focal length of a lens already in the box, or adds the lens at the back.
`label-` takes the lens out, if present, keeping the others in order.
*/

/// Lenses in insertion order, looked up by label.
#[derive(Debug, Default, Clone)]
struct LensBox(Vec<(String, u8)>);

impl LensBox {
    fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|(existing, _)| existing == label)
    }

    fn insert(&mut self, label: &str, focal: u8) {
        match self.position(label) {
            Some(index) => self.0[index].1 = focal,
            None => self.0.push((label.to_owned(), focal)),
        }
    }

    fn remove(&mut self, label: &str) {
        if let Some(index) = self.position(label) {
            self.0.remove(index);
        }
    }
}

fn arrange(steps: &[Step]) -> Vec<LensBox> {
    let mut boxes = vec![LensBox::default(); 256];
    for step in steps {
        let lens_box = &mut boxes[usize::from(hash(&step.label))];
        match step.operation {
            Operation::Insert(focal) => lens_box.insert(&step.label, focal),
            Operation::Remove => lens_box.remove(&step.label),
        }
    }
    boxes
}

fn focusing_power(boxes: &[LensBox]) -> Option<u64> {
    boxes
        .iter()
        .zip(1u64..)
        .flat_map(|(lens_box, box_number)| {
            lens_box
                .0
                .iter()
                .zip(1u64..)
                .map(move |((_, focal), slot)| box_number * slot * u64::from(*focal))
        })
        .checked_sum()
}

impl Solution<PartTwo> for Day15 {
    type Input = InitSequence;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let boxes = arrange(&input.0);
        Ok(focusing_power(&boxes).ok_or(Overflow("focusing power"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = "rn=1,cm-,qp=3,cm=2,qp-,pc=4,ot=9,ab=5,pc-,pc=6,ot=7\n";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let sequence = InitSequence::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day15 as Solution<PartOne>>::solve(&sequence)?, 1320);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let sequence = InitSequence::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day15 as Solution<PartTwo>>::solve(&sequence)?, 145);
        Ok(())
    }

    #[test]
    fn hashes_text() {
        assert_eq!(hash("HASH"), 52);
        assert_eq!(hash("rn"), 0);
        assert_eq!(hash("qp"), 1);
    }

    #[test]
    fn boxes_keep_insertion_order() -> DynamicResult<()> {
        let sequence = InitSequence::parse(EXAMPLE_INPUT)?;
        let boxes = arrange(&sequence.0);
        let labels = |index: usize| -> Vec<(&str, u8)> {
            boxes[index]
                .0
                .iter()
                .map(|(label, focal)| (label.as_str(), *focal))
                .collect()
        };
        assert_eq!(labels(0), vec![("rn", 1), ("cm", 2)]);
        assert!(labels(1).is_empty());
        assert_eq!(labels(3), vec![("ot", 7), ("ab", 5), ("pc", 6)]);
        Ok(())
    }

    #[test]
    fn newlines_are_ignored() -> DynamicResult<()> {
        let sequence = InitSequence::parse("rn=1,c\nm-\n")?;
        assert_eq!(sequence.0[1].label, "cm");
        Ok(())
    }

    #[test]
    fn malformed_step_is_rejected() {
        assert!(InitSequence::parse("rn=1,cm").is_err());
        assert!(InitSequence::parse("rn=x").is_err());
    }
}
