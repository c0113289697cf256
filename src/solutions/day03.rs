use std::collections::{BTreeSet, HashMap};

use advent_framework::grid::{Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;

use crate::arithmetic::{CheckedProduct, Overflow};

#[solution_runner(name = "Day 3: Gear Ratios", parsed = Schematic, part_one = Day03, part_two = Day03)]
impl super::AdventOfCode2023<3> {}

/*
The engine schematic is a grid of digits, `.` for empty space, and symbols. A number is a maximal
run of digits along a row; it is a part number when any of its cells touches a symbol, diagonals
included.
*/

const SYMBOLS: &[char] = &['#', '$', '%', '&', '*', '+', '-', '/', '=', '@'];
const GEAR: char = '*';

/// A number written in the schematic, identified by where it starts so that equal values at
/// different places stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SchematicNumber {
    start: Position,
    value: u32,
}

#[derive(Debug)]
struct Schematic {
    grid: Grid<char>,
    /// Each number with the symbol positions it touches.
    numbers: Vec<(SchematicNumber, BTreeSet<Position>)>,
}

impl Schematic {
    fn is_symbol(&self, position: Position) -> bool {
        self.grid
            .get(position)
            .is_some_and(|cell| SYMBOLS.contains(cell))
    }

    fn adjacent_symbols(&self, cells: &[Position]) -> BTreeSet<Position> {
        cells
            .iter()
            .flat_map(|&cell| self.grid.neighbours8(cell))
            .filter(|&neighbour| self.is_symbol(neighbour))
            .collect()
    }

    fn part_numbers(&self) -> impl Iterator<Item = &SchematicNumber> {
        self.numbers
            .iter()
            .filter(|(_, symbols)| !symbols.is_empty())
            .map(|(number, _)| number)
    }
}

impl ParseData for Schematic {
    fn parse(input: &str) -> DynamicResult<Self> {
        let grid = Grid::parse(input, Ok::<char, std::convert::Infallible>)?;
        let mut schematic = Self {
            grid,
            numbers: Vec::new(),
        };

        let mut numbers = Vec::new();
        for row in 0..schematic.grid.height() {
            let mut run: Vec<Position> = Vec::new();
            let mut value = 0u32;
            // one extra column flushes a run ending at the right edge
            for col in 0..=schematic.grid.width() {
                let position = Position::new(row, col);
                match schematic.grid.get(position).and_then(|cell| cell.to_digit(10)) {
                    Some(digit) => {
                        value = value
                            .checked_mul(10)
                            .and_then(|value| value.checked_add(digit))
                            .ok_or(Overflow("schematic number"))?;
                        run.push(position);
                    }
                    None if !run.is_empty() => {
                        let number = SchematicNumber {
                            start: run[0],
                            value,
                        };
                        numbers.push((number, schematic.adjacent_symbols(&run)));
                        run.clear();
                        value = 0;
                    }
                    None => {}
                }
            }
        }

        schematic.numbers = numbers;
        Ok(schematic)
    }
}

struct Day03;

impl Solution<PartOne> for Day03 {
    type Input = Schematic;
    type Output = u32;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input
            .part_numbers()
            .map(|number| number.value)
            .checked_sum()
            .ok_or(Overflow("sum of part numbers"))?)
    }
}

/*
For part 2, a gear is a `*` touching exactly two part numbers. Its ratio is the product of those
two numbers; the answer sums every gear ratio.
*/

impl Solution<PartTwo> for Day03 {
    type Input = Schematic;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut gear_numbers: HashMap<Position, Vec<u64>> = HashMap::new();
        for (number, symbols) in &input.numbers {
            for &symbol in symbols {
                if input.grid.get(symbol) == Some(&GEAR) {
                    gear_numbers
                        .entry(symbol)
                        .or_default()
                        .push(u64::from(number.value));
                }
            }
        }

        let ratios = gear_numbers
            .into_values()
            .filter(|numbers| numbers.len() == 2)
            .map(|numbers| numbers.into_iter().checked_product())
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("gear ratio"))?;
        Ok(ratios
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("sum of gear ratios"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_INPUT: &str = "467..114..
...*......
..35..633.
......#...
617*......
.....+.58.
..592.....
......755.
...$.*....
.664.598..
";

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let schematic = Schematic::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day03 as Solution<PartOne>>::solve(&schematic)?, 4361);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let schematic = Schematic::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day03 as Solution<PartTwo>>::solve(&schematic)?, 467_835);
        Ok(())
    }

    #[test]
    fn repeated_values_count_separately() -> DynamicResult<()> {
        let schematic = Schematic::parse("12.12\n..#..\n")?;
        assert_eq!(<Day03 as Solution<PartOne>>::solve(&schematic)?, 24);
        Ok(())
    }

    #[test]
    fn number_at_right_edge_is_found() -> DynamicResult<()> {
        let schematic = Schematic::parse("...*7\n.....\n")?;
        let values: Vec<u32> = schematic.part_numbers().map(|number| number.value).collect();
        assert_eq!(values, vec![7]);
        Ok(())
    }

    #[test]
    fn ragged_schematic_is_rejected() {
        assert!(Schematic::parse("...\n..\n").is_err());
    }
}
