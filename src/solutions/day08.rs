use std::collections::HashMap;

use advent_framework::parsing::{InputScanner, parse_lines_with_offset};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use regex::Regex;
use thiserror::Error;

use crate::arithmetic::{Overflow, checked_lcm};

#[solution_runner(
    name = "Day 8: Haunted Wasteland",
    parsed = Network,
    part_one = Day08,
    part_two = Day08
)]
impl super::AdventOfCode2023<8> {}

/*
The input is a line of left/right instructions, a blank line, then the network: `AAA = (BBB, CCC)`
gives the nodes reached from `AAA` going left and right. Instructions repeat once exhausted.
*/

#[derive(Error, Debug)]
enum Day08Error {
    #[error("missing the instruction line")]
    MissingInstructions,
    #[error("invalid instruction {0:?}, expected 'L' or 'R'")]
    InvalidInstruction(char),
    #[error("expected a node like \"AAA = (BBB, CCC)\"")]
    MalformedNode,
    #[error("node {0:?} is referenced but never defined")]
    UnknownNode(String),
    #[error("no path from {0:?} reaches an end node")]
    Unreachable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
}

#[derive(Debug)]
struct Network {
    turns: Vec<Turn>,
    /// Left and right neighbour of each node.
    nodes: HashMap<String, (String, String)>,
}

impl ParseData for Network {
    fn parse(input: &str) -> DynamicResult<Self> {
        let mut scanner = InputScanner::new(input);
        let turns = scanner
            .next_item(|_, line| {
                line.trim()
                    .chars()
                    .map(|turn| match turn {
                        'L' => Ok(Turn::Left),
                        'R' => Ok(Turn::Right),
                        other => Err(Day08Error::InvalidInstruction(other)),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })?
            .filter(|turns| !turns.is_empty())
            .ok_or(Day08Error::MissingInstructions)?;

        let node_re = Regex::new(r"^(\w+) = \((\w+), (\w+)\)$")?;
        let mut nodes = HashMap::new();
        for (first_line, block) in scanner.remaining_blocks() {
            for node in parse_lines_with_offset(&block, first_line, |_, line| {
                node_re
                    .captures(line.trim())
                    .map(|captures| {
                        let [name, left, right] = captures.extract().1.map(str::to_owned);
                        (name, (left, right))
                    })
                    .ok_or(Day08Error::MalformedNode)
            }) {
                let (name, neighbours) = node?;
                nodes.insert(name, neighbours);
            }
        }

        let network = Self { turns, nodes };
        if let Some(missing) = network
            .nodes
            .values()
            .flat_map(|(left, right)| [left, right])
            .find(|name| !network.nodes.contains_key(*name))
        {
            return Err(Day08Error::UnknownNode(missing.clone()).into());
        }
        Ok(network)
    }
}

impl Network {
    fn next<'a>(&'a self, node: &str, turn: Turn) -> Result<&'a str, Day08Error> {
        let (left, right) = self
            .nodes
            .get(node)
            .ok_or_else(|| Day08Error::UnknownNode(node.to_owned()))?;
        Ok(match turn {
            Turn::Left => left.as_str(),
            Turn::Right => right.as_str(),
        })
    }

    /// Steps taken from `start` until the first node satisfying `is_end`.
    ///
    /// A walk that returns to the same node at the same instruction offset without meeting an end
    /// node never will.
    fn steps_until(&self, start: &str, is_end: impl Fn(&str) -> bool) -> DynamicResult<u64> {
        let cycle_bound = self.nodes.len().saturating_mul(self.turns.len()).saturating_add(1);
        let mut node = start;
        let mut steps = 0u64;
        for (index, &turn) in self.turns.iter().cycle().enumerate() {
            if is_end(node) && steps > 0 {
                return Ok(steps);
            }
            if index > cycle_bound {
                return Err(Day08Error::Unreachable(start.to_owned()).into());
            }
            node = self.next(node, turn)?;
            steps += 1;
        }
        Err(Day08Error::MissingInstructions.into())
    }
}

struct Day08;

impl Solution<PartOne> for Day08 {
    type Input = Network;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        if !input.nodes.contains_key("AAA") {
            return Err(Day08Error::UnknownNode("AAA".to_owned()).into());
        }
        input.steps_until("AAA", |node| node == "ZZZ")
    }
}

/*
For part 2, every node ending in `A` starts a walk at once, and all walks must stand on nodes
ending in `Z` at the same step. Each walk settles into a loop whose length is the step it first
reaches a `Z` node, so they line up at the lowest common multiple of those steps.
*/

impl Solution<PartTwo> for Day08 {
    type Input = Network;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let first_arrivals = input
            .nodes
            .keys()
            .filter(|node| node.ends_with('A'))
            .map(|start| input.steps_until(start, |node| node.ends_with('Z')))
            .collect::<Result<Vec<_>, DynamicError>>()?;
        Ok(checked_lcm(first_arrivals).ok_or(Overflow("step lcm"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_REPEAT: &str = "LLR

AAA = (BBB, BBB)
BBB = (AAA, ZZZ)
ZZZ = (ZZZ, ZZZ)
";

    const EXAMPLE_DIRECT: &str = "RL

AAA = (BBB, CCC)
BBB = (DDD, EEE)
CCC = (ZZZ, GGG)
DDD = (DDD, DDD)
EEE = (EEE, EEE)
GGG = (GGG, GGG)
ZZZ = (ZZZ, ZZZ)
";

    const EXAMPLE_GHOSTS: &str = "LR

11A = (11B, XXX)
11B = (XXX, 11Z)
11Z = (11B, XXX)
22A = (22B, XXX)
22B = (22C, 22C)
22C = (22Z, 22Z)
22Z = (22B, 22B)
XXX = (XXX, XXX)
";

    #[test]
    fn part_one_solves_examples() -> DynamicResult<()> {
        let network = Network::parse(EXAMPLE_DIRECT)?;
        assert_eq!(<Day08 as Solution<PartOne>>::solve(&network)?, 2);
        let network = Network::parse(EXAMPLE_REPEAT)?;
        assert_eq!(<Day08 as Solution<PartOne>>::solve(&network)?, 6);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let network = Network::parse(EXAMPLE_GHOSTS)?;
        assert_eq!(<Day08 as Solution<PartTwo>>::solve(&network)?, 6);
        Ok(())
    }

    #[test]
    fn unreachable_end_is_an_error() -> DynamicResult<()> {
        let network = Network::parse("L\n\nAAA = (AAA, ZZZ)\nZZZ = (ZZZ, ZZZ)\n")?;
        let error = <Day08 as Solution<PartOne>>::solve(&network).unwrap_err();
        assert_eq!(error.to_string(), "no path from \"AAA\" reaches an end node");
        Ok(())
    }

    #[test]
    fn undefined_node_is_rejected() {
        assert!(Network::parse("L\n\nAAA = (BBB, AAA)\n").is_err());
        assert!(Network::parse("LX\n\nAAA = (AAA, AAA)\n").is_err());
    }
}
