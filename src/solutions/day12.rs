use std::collections::HashMap;

use advent_framework::parsing::{parse_input_lines, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 12: Hot Springs",
    parsed = ConditionRecords,
    part_one = Day12,
    part_two = Day12
)]
impl super::AdventOfCode2023<12> {}

/*
Each record lists springs as operational `.`, damaged `#` or unknown `?`, then the sizes of the
contiguous groups of damaged springs in order: `???.### 1,1,3`. An arrangement picks a condition
for every unknown spring so the groups match.
*/

#[derive(Error, Debug)]
enum Day12Error {
    #[error("invalid spring condition {0:?}")]
    InvalidCondition(char),
    #[error("expected springs and group sizes separated by a space")]
    MissingGroups,
    #[error("damaged group sizes must be positive")]
    EmptyGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spring {
    Operational,
    Damaged,
    Unknown,
}

impl Spring {
    fn symbol(self) -> char {
        match self {
            Self::Operational => '.',
            Self::Damaged => '#',
            Self::Unknown => '?',
        }
    }
}

impl TryFrom<char> for Spring {
    type Error = Day12Error;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            '.' => Ok(Self::Operational),
            '#' => Ok(Self::Damaged),
            '?' => Ok(Self::Unknown),
            other => Err(Day12Error::InvalidCondition(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    springs: Vec<Spring>,
    groups: Vec<usize>,
}

/// Whether a damaged group of `size` can start at the front of `springs`.
fn group_fits(springs: &[Spring], size: usize) -> bool {
    springs.len() >= size
        && springs[..size].iter().all(|&spring| spring != Spring::Operational)
        && springs.get(size) != Some(&Spring::Damaged)
}

impl Record {
    /// The record repeated five times, springs joined by an unknown spring.
    fn unfolded(&self) -> Self {
        const COPIES: usize = 5;
        let mut springs = Vec::with_capacity(self.springs.len() * COPIES + COPIES - 1);
        for copy in 0..COPIES {
            if copy > 0 {
                springs.push(Spring::Unknown);
            }
            springs.extend_from_slice(&self.springs);
        }
        Self {
            springs,
            groups: self.groups.repeat(COPIES),
        }
    }

    /// Every concrete arrangement, written with `.` and `#`.
    fn arrangements(&self) -> Vec<String> {
        fn extend(springs: &[Spring], groups: &[usize], row: &mut String, found: &mut Vec<String>) {
            let Some((&size, rest_groups)) = groups.split_first() else {
                if !springs.contains(&Spring::Damaged) {
                    let mut complete = row.clone();
                    complete.extend(std::iter::repeat_n('.', springs.len()));
                    found.push(complete);
                }
                return;
            };
            let Some(&first) = springs.first() else {
                return;
            };
            let mark = row.len();

            if first != Spring::Damaged {
                row.push('.');
                extend(&springs[1..], groups, row, found);
                row.truncate(mark);
            }
            if first != Spring::Operational && group_fits(springs, size) {
                row.extend(std::iter::repeat_n('#', size));
                let after = if springs.len() > size {
                    row.push('.');
                    &springs[size + 1..]
                } else {
                    &springs[size..]
                };
                extend(after, rest_groups, row, found);
                row.truncate(mark);
            }
        }

        let mut found = Vec::new();
        extend(&self.springs, &self.groups, &mut String::new(), &mut found);
        found
    }

    /// Number of arrangements, without building them.
    fn count_arrangements(&self) -> Option<u64> {
        ArrangementCounter::new(self).count(0, 0)
    }
}

/// Memoised arrangement count for one record, keyed by the next spring and group to place.
struct ArrangementCounter<'a> {
    record: &'a Record,
    cache: HashMap<(usize, usize), u64>,
}

impl<'a> ArrangementCounter<'a> {
    fn new(record: &'a Record) -> Self {
        Self {
            record,
            cache: HashMap::new(),
        }
    }

    fn count(&mut self, spring: usize, group: usize) -> Option<u64> {
        let record = self.record;
        let springs = record.springs.get(spring..).unwrap_or_default();
        let Some(&size) = record.groups.get(group) else {
            return Some(u64::from(!springs.contains(&Spring::Damaged)));
        };
        let Some(&first) = springs.first() else {
            return Some(0);
        };
        if let Some(&cached) = self.cache.get(&(spring, group)) {
            return Some(cached);
        }

        let mut total = 0u64;
        if first != Spring::Damaged {
            total = total.checked_add(self.count(spring + 1, group)?)?;
        }
        if first != Spring::Operational && group_fits(springs, size) {
            // the spring after a group is operational, so skip it too
            total = total.checked_add(self.count(spring + size + 1, group + 1)?)?;
        }
        self.cache.insert((spring, group), total);
        Some(total)
    }
}

impl std::str::FromStr for Record {
    type Err = DynamicError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (springs, groups) = line.split_once(' ').ok_or(Day12Error::MissingGroups)?;
        let springs = springs
            .chars()
            .map(Spring::try_from)
            .collect::<Result<_, _>>()?;
        let groups = groups
            .split(',')
            .map(|size| -> DynamicResult<usize> {
                let size = parse_with_context(size.trim())?;
                if size == 0 {
                    return Err(Day12Error::EmptyGroup.into());
                }
                Ok(size)
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { springs, groups })
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let springs: String = self.springs.iter().map(|spring| spring.symbol()).collect();
        let groups: Vec<String> = self.groups.iter().map(ToString::to_string).collect();
        write!(f, "{springs} {}", groups.join(","))
    }
}

#[derive(Debug)]
struct ConditionRecords(Vec<Record>);

impl ParseData for ConditionRecords {
    fn parse(input: &str) -> DynamicResult<Self> {
        let records = parse_input_lines(input, |_, line| line.parse::<Record>())
            .collect::<Result<_, _>>()?;
        Ok(Self(records))
    }
}

struct Day12;

impl Solution<PartOne> for Day12 {
    type Input = ConditionRecords;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input
            .0
            .iter()
            .map(|record| record.arrangements().len())
            .checked_sum()
            .ok_or(Overflow("sum of arrangements"))?)
    }
}

/*
For part 2 each record is unfolded five times, which makes listing arrangements far too slow.
*/

impl Solution<PartTwo> for Day12 {
    type Input = ConditionRecords;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let counts = input
            .0
            .iter()
            .map(|record| record.unfolded().count_arrangements())
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("arrangement count"))?;
        Ok(counts
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("sum of arrangements"))?)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "???.### 1,1,3
.??..??...?##. 1,1,3
?#?#?#?#?#?#?#? 1,3,1,6
????.#...#... 4,1,1
????.######..#####. 1,6,5
?###???????? 3,2,1
";

    fn record(line: &str) -> Record {
        line.parse().unwrap()
    }

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let records = ConditionRecords::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day12 as Solution<PartOne>>::solve(&records)?, 21);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let records = ConditionRecords::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day12 as Solution<PartTwo>>::solve(&records)?, 525_152);
        Ok(())
    }

    #[test]
    fn lists_concrete_arrangements() {
        assert_eq!(record("???.### 1,1,3").arrangements(), vec!["#.#.###"]);
        assert_eq!(record("....#.# 1,1").arrangements(), vec!["....#.#"]);
        assert!(record(".#..#.# 1,1,1,1").arrangements().is_empty());
        let mut found = record("????.######..#####. 1,6,5").arrangements();
        found.sort_unstable();
        assert_eq!(
            found,
            vec![
                "#....######..#####.",
                ".#...######..#####.",
                "..#..######..#####.",
                "...#.######..#####.",
            ]
        );
    }

    #[rstest]
    #[case("???.### 1,1,3", 1, 1)]
    #[case(".??..??...?##. 1,1,3", 4, 16_384)]
    #[case("?#?#?#?#?#?#?#? 1,3,1,6", 1, 1)]
    #[case("????.#...#... 4,1,1", 1, 16)]
    #[case("????.######..#####. 1,6,5", 4, 2500)]
    #[case("?###???????? 3,2,1", 10, 506_250)]
    fn counts_per_record(#[case] line: &str, #[case] folded: u64, #[case] unfolded: u64) {
        let record = record(line);
        assert_eq!(record.arrangements().len() as u64, folded);
        assert_eq!(record.count_arrangements(), Some(folded));
        assert_eq!(record.unfolded().count_arrangements(), Some(unfolded));
    }

    #[test]
    fn unfolding_joins_with_unknown() {
        assert_eq!(
            record(".# 1").unfolded().to_string(),
            ".#?.#?.#?.#?.# 1,1,1,1,1"
        );
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(ConditionRecords::parse("??x 1").is_err());
        assert!(ConditionRecords::parse("??? 1,0").is_err());
        assert!(ConditionRecords::parse("???").is_err());
    }
}
