use std::collections::HashMap;

use advent_framework::parsing::{InputScanner, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use regex::Regex;
use thiserror::Error;

use crate::arithmetic::{CheckedProduct, Overflow};

#[solution_runner(name = "Day 19: Aplenty", parsed = System, part_one = Day19, part_two = Day19)]
impl super::AdventOfCode2023<19> {}

/*
The input lists workflows, a blank line, then machine parts. A workflow like
`px{a<2006:qkq,m>2090:A,rfg}` checks its rules in order and sends the part to the target of the
first matching rule, or to the last entry when none match. `A` accepts and `R` rejects. Parts are
rated in four categories, `{x=787,m=2655,a=1222,s=2876}`, and every part starts at workflow `in`.
*/

#[derive(Error, Debug)]
enum Day19Error {
    #[error("invalid workflow {0:?}")]
    InvalidWorkflow(String),
    #[error("invalid rule {0:?}")]
    InvalidRule(String),
    #[error("invalid part {0:?}")]
    InvalidPart(String),
    #[error("workflow {0:?} is not defined")]
    UnknownWorkflow(String),
    #[error("workflows send parts around in a cycle")]
    Cycle,
}

const START: &str = "in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    X,
    M,
    A,
    S,
}

impl Category {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::M => 1,
            Self::A => 2,
            Self::S => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Accept,
    Reject,
    Workflow(String),
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        match name {
            "A" => Self::Accept,
            "R" => Self::Reject,
            name => Self::Workflow(name.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Less,
    Greater,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    category: Category,
    comparison: Comparison,
    value: u64,
    target: Target,
}

/// Inclusive range of ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u64,
    end: u64,
}

impl Span {
    fn new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    fn len(self) -> u64 {
        self.end - self.start + 1
    }
}

impl Rule {
    fn matches(&self, part: &Part) -> bool {
        let rating = part.0[self.category.index()];
        match self.comparison {
            Comparison::Less => rating < self.value,
            Comparison::Greater => rating > self.value,
        }
    }

    /// The parts of `span` that match and that fail this rule.
    fn split(&self, span: Span) -> (Option<Span>, Option<Span>) {
        match self.comparison {
            Comparison::Less => (
                self.value
                    .checked_sub(1)
                    .and_then(|high| Span::new(span.start, span.end.min(high))),
                Span::new(span.start.max(self.value), span.end),
            ),
            Comparison::Greater => (
                self.value
                    .checked_add(1)
                    .and_then(|low| Span::new(span.start.max(low), span.end)),
                Span::new(span.start, span.end.min(self.value)),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Workflow {
    rules: Vec<Rule>,
    fallback: Target,
}

impl Workflow {
    fn target(&self, part: &Part) -> &Target {
        self.rules
            .iter()
            .find(|rule| rule.matches(part))
            .map_or(&self.fallback, |rule| &rule.target)
    }
}

/// Ratings of x, m, a and s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Part([u64; 4]);

impl Part {
    fn rating(&self) -> Option<u64> {
        self.0.iter().copied().checked_sum()
    }
}

#[derive(Debug)]
struct System {
    workflows: HashMap<String, Workflow>,
    parts: Vec<Part>,
}

struct Patterns {
    workflow: Regex,
    rule: Regex,
    part: Regex,
}

impl Patterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            workflow: Regex::new(r"^(\w+)\{(.*),(\w+)\}$")?,
            rule: Regex::new(r"^([xmas])([<>])(\d+):(\w+)$")?,
            part: Regex::new(r"^\{x=(\d+),m=(\d+),a=(\d+),s=(\d+)\}$")?,
        })
    }

    fn parse_rule(&self, text: &str) -> DynamicResult<Rule> {
        let captures = self
            .rule
            .captures(text)
            .ok_or_else(|| Day19Error::InvalidRule(text.to_owned()))?;
        let category = match &captures[1] {
            "x" => Category::X,
            "m" => Category::M,
            "a" => Category::A,
            _ => Category::S,
        };
        let comparison = if &captures[2] == "<" {
            Comparison::Less
        } else {
            Comparison::Greater
        };
        Ok(Rule {
            category,
            comparison,
            value: parse_with_context(&captures[3])?,
            target: Target::from(&captures[4]),
        })
    }

    fn parse_workflow(&self, line: &str) -> DynamicResult<(String, Workflow)> {
        let captures = self
            .workflow
            .captures(line)
            .ok_or_else(|| Day19Error::InvalidWorkflow(line.to_owned()))?;
        let rules = captures[2]
            .split(',')
            .map(|rule| self.parse_rule(rule))
            .collect::<DynamicResult<_>>()?;
        Ok((
            captures[1].to_owned(),
            Workflow {
                rules,
                fallback: Target::from(&captures[3]),
            },
        ))
    }

    fn parse_part(&self, line: &str) -> DynamicResult<Part> {
        let captures = self
            .part
            .captures(line)
            .ok_or_else(|| Day19Error::InvalidPart(line.to_owned()))?;
        let mut ratings = [0; 4];
        for (rating, text) in ratings.iter_mut().zip(captures.iter().skip(1).flatten()) {
            *rating = parse_with_context(text.as_str())?;
        }
        Ok(Part(ratings))
    }
}

impl ParseData for System {
    fn parse(input: &str) -> DynamicResult<Self> {
        let patterns = Patterns::new()?;
        let mut scanner = InputScanner::new(input);
        scanner.skip_empty();
        let workflows = scanner
            .collect_sequence(|_, line| patterns.parse_workflow(line.trim()))?
            .into_iter()
            .collect();
        scanner.skip_empty();
        let parts = scanner.collect_sequence(|_, line| patterns.parse_part(line.trim()))?;
        Ok(Self { workflows, parts })
    }
}

impl System {
    fn workflow(&self, name: &str) -> Result<&Workflow, Day19Error> {
        self.workflows
            .get(name)
            .ok_or_else(|| Day19Error::UnknownWorkflow(name.to_owned()))
    }

    fn is_accepted(&self, part: &Part) -> Result<bool, Day19Error> {
        let mut workflow = self.workflow(START)?;
        // a part that visits more workflows than exist must be going around in circles
        for _ in 0..=self.workflows.len() {
            match workflow.target(part) {
                Target::Accept => return Ok(true),
                Target::Reject => return Ok(false),
                Target::Workflow(name) => workflow = self.workflow(name)?,
            }
        }
        Err(Day19Error::Cycle)
    }

    /// How many rating combinations in `1..=4000` end up accepted.
    fn accepted_combinations(&self) -> DynamicResult<u64> {
        const FULL: Span = Span {
            start: 1,
            end: 4000,
        };

        let mut total = 0u64;
        let mut pending = vec![(Target::Workflow(START.to_owned()), [FULL; 4], 0)];
        while let Some((target, mut spans, depth)) = pending.pop() {
            let name = match target {
                Target::Reject => continue,
                Target::Accept => {
                    let combinations = spans
                        .iter()
                        .map(|span| span.len())
                        .checked_product()
                        .ok_or(Overflow("rating combinations"))?;
                    total = total
                        .checked_add(combinations)
                        .ok_or(Overflow("sum of combinations"))?;
                    continue;
                }
                Target::Workflow(name) => name,
            };
            if depth > self.workflows.len() {
                return Err(Day19Error::Cycle.into());
            }

            let workflow = self.workflow(&name)?;
            let mut remaining = true;
            for rule in &workflow.rules {
                let index = rule.category.index();
                let (matched, failed) = rule.split(spans[index]);
                if let Some(matched) = matched {
                    let mut branch = spans;
                    branch[index] = matched;
                    pending.push((rule.target.clone(), branch, depth + 1));
                }
                match failed {
                    Some(failed) => spans[index] = failed,
                    None => {
                        remaining = false;
                        break;
                    }
                }
            }
            if remaining {
                pending.push((workflow.fallback.clone(), spans, depth + 1));
            }
        }
        Ok(total)
    }
}

struct Day19;

impl Solution<PartOne> for Day19 {
    type Input = System;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut total = 0u64;
        for part in &input.parts {
            if input.is_accepted(part)? {
                total = part
                    .rating()
                    .and_then(|rating| total.checked_add(rating))
                    .ok_or(Overflow("sum of ratings"))?;
            }
        }
        Ok(total)
    }
}

/*
Part 2 ignores the listed parts and asks how many distinct parts, with every rating between 1 and
4000, the workflows would accept. Ranges of ratings are pushed through the workflows, splitting
wherever a rule cuts one in two.
*/

impl Solution<PartTwo> for Day19 {
    type Input = System;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.accepted_combinations()
    }
}
