use advent_framework::parsing::{InputScanner, parse_lines_with_offset, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 5: If You Give A Seed A Fertilizer",
    parsed = Almanac,
    part_one = Day05,
    part_two = Day05
)]
impl super::AdventOfCode2023<5> {}

/*
The almanac starts with `seeds: ...`, followed by blocks of maps. Each map converts numbers from
one category to the next, in order, through entries `destination source length`. A number outside
every entry of a map keeps its value.
*/

#[derive(Error, Debug)]
enum Day05Error {
    #[error("expected the almanac to start with \"seeds:\"")]
    MissingSeeds,
    #[error("map entry needs exactly three numbers")]
    MalformedEntry,
    #[error("seed ranges need an even amount of numbers, found {0}")]
    OddSeedRanges(usize),
    #[error("the almanac has no seeds")]
    NoSeeds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MapEntry {
    source: u64,
    destination: u64,
    length: u64,
}

impl MapEntry {
    /// Last source value covered, inclusive.
    fn source_end(&self) -> u64 {
        self.source + self.length - 1
    }

    fn translate(&self, value: u64) -> u64 {
        self.destination + (value - self.source)
    }
}

/// Inclusive range of values.
type ValueRange = (u64, u64);

/// Entries sorted by source start.
#[derive(Debug)]
struct AlmanacMap(Vec<MapEntry>);

impl AlmanacMap {
    /// Translate sorted `values` by walking values and entries side by side.
    fn translate_values(&self, values: &[u64]) -> Vec<u64> {
        let mut entries = self.0.iter().peekable();
        let mut translated = Vec::with_capacity(values.len());
        for &value in values {
            while entries
                .peek()
                .is_some_and(|entry| entry.source_end() < value)
            {
                entries.next();
            }
            match entries.peek() {
                Some(entry) if entry.source <= value => translated.push(entry.translate(value)),
                _ => translated.push(value),
            }
        }
        translated
    }

    /// Translate sorted, non-overlapping ranges, splitting any range that crosses an entry
    /// boundary.
    fn translate_ranges(&self, ranges: &[ValueRange]) -> Vec<ValueRange> {
        let mut entries = self.0.iter().peekable();
        let mut translated = Vec::new();
        for &(mut start, end) in ranges {
            loop {
                while entries
                    .peek()
                    .is_some_and(|entry| entry.source_end() < start)
                {
                    entries.next();
                }
                let Some(entry) = entries.peek() else {
                    translated.push((start, end));
                    break;
                };

                if start < entry.source {
                    // the part below the entry is not mapped
                    if end < entry.source {
                        translated.push((start, end));
                        break;
                    }
                    translated.push((start, entry.source - 1));
                    start = entry.source;
                } else if end <= entry.source_end() {
                    translated.push((entry.translate(start), entry.translate(end)));
                    break;
                } else {
                    translated.push((entry.translate(start), entry.translate(entry.source_end())));
                    start = entry.source_end() + 1;
                }
            }
        }
        translated
    }
}

#[derive(Debug)]
struct Almanac {
    seeds: Vec<u64>,
    maps: Vec<AlmanacMap>,
}

impl ParseData for Almanac {
    fn parse(input: &str) -> DynamicResult<Self> {
        let mut scanner = InputScanner::new(input);
        let seeds = scanner
            .next_item(|_, line| -> DynamicResult<Vec<u64>> {
                let numbers = line.strip_prefix("seeds:").ok_or(Day05Error::MissingSeeds)?;
                numbers
                    .split_whitespace()
                    .map(|number| parse_with_context::<u64>(number).map_err(DynamicError::from))
                    .collect()
            })?
            .ok_or(Day05Error::MissingSeeds)?;

        let mut maps = Vec::new();
        for (first_line, block) in scanner.remaining_blocks() {
            // the first line of a block names the map
            let entries_text = block.split_once('\n').map_or("", |(_, entries)| entries);
            let mut entries = parse_lines_with_offset(
                entries_text,
                first_line + 1,
                |_, line| -> DynamicResult<MapEntry> {
                    let numbers = line
                        .split_whitespace()
                        .map(parse_with_context::<u64>)
                        .collect::<Result<Vec<_>, _>>()?;
                    let &[destination, source, length] = numbers.as_slice() else {
                        return Err(Day05Error::MalformedEntry.into());
                    };
                    Ok(MapEntry {
                        source,
                        destination,
                        length,
                    })
                },
            )
            .collect::<Result<Vec<_>, _>>()?;
            entries.retain(|entry| entry.length > 0);
            entries.sort_unstable_by_key(|entry| entry.source);
            maps.push(AlmanacMap(entries));
        }

        Ok(Self { seeds, maps })
    }
}

impl Almanac {
    fn check_no_overflow(&self) -> Result<(), Overflow> {
        let fits = |start: u64, length: u64| start.checked_add(length).is_some();
        if self
            .maps
            .iter()
            .flat_map(|map| &map.0)
            .all(|entry| fits(entry.source, entry.length) && fits(entry.destination, entry.length))
        {
            Ok(())
        } else {
            Err(Overflow("almanac map entry"))
        }
    }
}

struct Day05;

impl Solution<PartOne> for Day05 {
    type Input = Almanac;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.check_no_overflow()?;
        let mut values = input.seeds.clone();
        for map in &input.maps {
            values.sort_unstable();
            values = map.translate_values(&values);
        }
        Ok(values.into_iter().min().ok_or(Day05Error::NoSeeds)?)
    }
}

/*
For part 2 the seed numbers come in pairs of range start and length.
*/

impl Solution<PartTwo> for Day05 {
    type Input = Almanac;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.check_no_overflow()?;
        if input.seeds.len() % 2 != 0 {
            return Err(Day05Error::OddSeedRanges(input.seeds.len()).into());
        }
        let mut ranges = input
            .seeds
            .chunks_exact(2)
            .filter(|pair| pair[1] > 0)
            .map(|pair| {
                pair[0]
                    .checked_add(pair[1] - 1)
                    .map(|end| (pair[0], end))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("seed range"))?;

        for map in &input.maps {
            ranges.sort_unstable();
            ranges = map.translate_ranges(&ranges);
        }
        Ok(ranges
            .into_iter()
            .map(|(start, _)| start)
            .min()
            .ok_or(Day05Error::NoSeeds)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = "seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let almanac = Almanac::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day05 as Solution<PartOne>>::solve(&almanac)?, 35);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let almanac = Almanac::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day05 as Solution<PartTwo>>::solve(&almanac)?, 46);
        Ok(())
    }

    #[test]
    fn seed_to_soil_values() -> DynamicResult<()> {
        let almanac = Almanac::parse(EXAMPLE_INPUT)?;
        assert_eq!(
            almanac.maps[0].translate_values(&[13, 14, 55, 79]),
            vec![13, 14, 57, 81]
        );
        Ok(())
    }

    #[test]
    fn ranges_split_on_entry_boundaries() {
        let map = AlmanacMap(vec![
            MapEntry {
                source: 10,
                destination: 100,
                length: 5,
            },
            MapEntry {
                source: 20,
                destination: 0,
                length: 3,
            },
        ]);
        assert_eq!(
            map.translate_ranges(&[(5, 21), (30, 31)]),
            vec![
                (5, 9),
                (100, 104),
                (15, 19),
                (0, 1),
                (30, 31)
            ]
        );
    }

    #[test]
    fn odd_seed_list_is_rejected_for_ranges() -> DynamicResult<()> {
        let almanac = Almanac::parse("seeds: 1 2 3\n\na-to-b map:\n5 1 1\n")?;
        assert_eq!(<Day05 as Solution<PartOne>>::solve(&almanac)?, 2);
        assert!(<Day05 as Solution<PartTwo>>::solve(&almanac).is_err());
        Ok(())
    }
}
