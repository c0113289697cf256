use advent_framework::grid::Direction;
use advent_framework::parsing::{parse_input_lines, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use nalgebra::{Point2, Vector2};
use regex::Regex;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(
    name = "Day 18: Lavaduct Lagoon",
    parsed = DigPlan,
    part_one = Day18,
    part_two = Day18
)]
impl super::AdventOfCode2023<18> {}

/*
Each line of the dig plan moves the digger some metres in a direction, digging a trench of one cubic
metre holes, like `R 6 (#70c710)`. The trench forms a closed loop, and the interior gets dug out
too. The answer is the lagoon volume: trench plus interior.

The hex code hides the plan for part 2: the first five hex digits are the distance and the last
digit the direction.
*/

#[derive(Error, Debug)]
enum Day18Error {
    #[error("expected an instruction like \"R 6 (#70c710)\", found {0:?}")]
    InvalidInstruction(String),
    #[error("instruction digs a trench of length zero")]
    ZeroLength,
    #[error("trench does not end where it started")]
    NotClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Instruction {
    direction: Direction,
    metres: i64,
}

impl Instruction {
    fn new(direction: Direction, metres: i64) -> Result<Self, Day18Error> {
        if metres == 0 {
            return Err(Day18Error::ZeroLength);
        }
        Ok(Self { direction, metres })
    }
}

#[derive(Debug)]
struct DigPlan {
    /// The plan as written.
    written: Vec<Instruction>,
    /// The plan decoded from the hex codes.
    decoded: Vec<Instruction>,
}

fn instruction_pattern() -> Result<Regex, regex::Error> {
    Regex::new(r"^([RDLU]) (\d+) \(#([0-9a-fA-F]{5})([0-3])\)$")
}

/// The written and the decoded instruction of one line.
fn parse_line(pattern: &Regex, line: &str) -> DynamicResult<(Instruction, Instruction)> {
    let captures = pattern
        .captures(line)
        .ok_or_else(|| Day18Error::InvalidInstruction(line.to_owned()))?;
    let direction = match &captures[1] {
        "R" => Direction::Right,
        "D" => Direction::Down,
        "L" => Direction::Left,
        _ => Direction::Up,
    };
    let written = Instruction::new(direction, parse_with_context(&captures[2])?)?;

    let metres = i64::from_str_radix(&captures[3], 16)?;
    let direction = match &captures[4] {
        "0" => Direction::Right,
        "1" => Direction::Down,
        "2" => Direction::Left,
        _ => Direction::Up,
    };
    let decoded = Instruction::new(direction, metres)?;
    Ok((written, decoded))
}

impl ParseData for DigPlan {
    fn parse(input: &str) -> DynamicResult<Self> {
        let pattern = instruction_pattern()?;
        let (written, decoded): (Vec<_>, Vec<_>) =
            parse_input_lines(input, |_, line| parse_line(&pattern, line))
                .collect::<Result<_, _>>()?;
        Ok(Self { written, decoded })
    }
}

/// Unit offset of a direction as `(row, column)`.
fn unit(direction: Direction) -> Vector2<i64> {
    match direction {
        Direction::Up => Vector2::new(-1, 0),
        Direction::Down => Vector2::new(1, 0),
        Direction::Left => Vector2::new(0, -1),
        Direction::Right => Vector2::new(0, 1),
    }
}

fn advance(corner: Point2<i64>, instruction: &Instruction) -> Option<Point2<i64>> {
    let offset = unit(instruction.direction);
    Some(Point2::new(
        corner.x.checked_add(offset.x.checked_mul(instruction.metres)?)?,
        corner.y.checked_add(offset.y.checked_mul(instruction.metres)?)?,
    ))
}

/// Corners of the trench loop as `(row, column)` points, starting at the origin.
fn corners(plan: &[Instruction]) -> DynamicResult<Vec<Point2<i64>>> {
    let mut corners = vec![Point2::origin()];
    let mut corner = Point2::origin();
    for instruction in plan {
        corner = advance(corner, instruction).ok_or(Overflow("trench corner"))?;
        corners.push(corner);
    }
    if corner != Point2::origin() {
        return Err(Day18Error::NotClosed.into());
    }
    Ok(corners)
}

/// Inclusive column interval.
type Span = (i64, i64);

fn width(spans: &[Span]) -> Option<i64> {
    spans.iter().try_fold(0i64, |total, &(start, end)| {
        total.checked_add(end.checked_sub(start)?.checked_add(1)?)
    })
}

/// Interior spans below a row of horizontal trench segments, given the spans open above it.
///
/// A segment matching an open span's edge either extends, shrinks, splits or closes that span.
fn toggle(open: &[Span], segments: &[Span]) -> Vec<Span> {
    let mut all: Vec<Span> = open.iter().chain(segments).copied().collect();
    all.sort_unstable();

    let mut result = Vec::new();
    let mut pending = all.into_iter();
    let mut current = pending.next();
    while let Some(span) = current {
        let Some(follow) = pending.next() else {
            result.push(span);
            break;
        };
        if follow.0 > span.1 {
            result.push(span);
            current = Some(follow);
            continue;
        }

        let (low_start, high_start) = (span.0.min(follow.0), span.0.max(follow.0));
        let (low_end, high_end) = (span.1.min(follow.1), span.1.max(follow.1));
        if high_start == low_end {
            current = Some((low_start, high_end));
            continue;
        }
        current = match (low_start < high_start, low_end < high_end) {
            (false, false) => pending.next(),
            (true, false) => Some((low_start, high_start)),
            (false, true) => Some((low_end, high_end)),
            (true, true) => {
                result.push((low_start, high_start));
                Some((low_end, high_end))
            }
        };
    }
    result
}

/// Overlapping spans merged together.
fn union(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut all: Vec<Span> = a.iter().chain(b).copied().collect();
    all.sort_unstable();

    let mut merged: Vec<Span> = Vec::with_capacity(all.len());
    for (start, end) in all {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Lagoon volume, sweeping down the rows that have horizontal trench segments.
///
/// Between two such rows the interior is the spans left open by the previous one. A row with
/// segments counts every tile covered either above or below it.
fn lagoon_volume(plan: &[Instruction]) -> DynamicResult<i64> {
    let corners = corners(plan)?;
    let mut segments: Vec<(i64, Span)> = corners
        .windows(2)
        .filter(|pair| pair[0].x == pair[1].x)
        .map(|pair| (pair[0].x, (pair[0].y.min(pair[1].y), pair[0].y.max(pair[1].y))))
        .collect();
    segments.sort_unstable();

    let sweep = || -> Option<i64> {
        let mut open: Vec<Span> = Vec::new();
        let mut last_row = None;
        let mut volume = 0i64;
        for row_segments in segments.chunk_by(|a, b| a.0 == b.0) {
            let row = row_segments[0].0;
            let spans: Vec<Span> = row_segments.iter().map(|&(_, span)| span).collect();
            let next = toggle(&open, &spans);
            if let Some(last_row) = last_row {
                let rows_between = row.checked_sub(last_row)?.checked_sub(1)?;
                volume = volume.checked_add(rows_between.checked_mul(width(&open)?)?)?;
            }
            volume = volume.checked_add(width(&union(&open, &next))?)?;
            open = next;
            last_row = Some(row);
        }
        Some(volume)
    };
    Ok(sweep().ok_or(Overflow("lagoon volume"))?)
}

struct Day18;

impl Solution<PartOne> for Day18 {
    type Input = DigPlan;
    type Output = i64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        lagoon_volume(&input.written)
    }
}

impl Solution<PartTwo> for Day18 {
    type Input = DigPlan;
    type Output = i64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        lagoon_volume(&input.decoded)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "R 6 (#70c710)
D 5 (#0dc571)
L 2 (#5713f0)
D 2 (#d2c081)
R 2 (#59c680)
D 2 (#411b91)
L 5 (#8ceee2)
U 2 (#caa173)
L 1 (#1b58a2)
U 2 (#caa171)
R 2 (#7807d2)
U 3 (#a77fa3)
L 2 (#015232)
U 2 (#7a21e3)
";

    /// Shoelace area plus the half of the trench outside the polygon, as a cross-check.
    fn shoelace_volume(plan: &[Instruction]) -> i64 {
        let corners = corners(plan).unwrap();
        let twice_area: i64 = corners
            .windows(2)
            .map(|pair| pair[0].y * pair[1].x - pair[1].y * pair[0].x)
            .sum();
        let perimeter: i64 = plan.iter().map(|instruction| instruction.metres).sum();
        twice_area.abs() / 2 + perimeter / 2 + 1
    }

    fn plan(steps: &[(Direction, i64)]) -> Vec<Instruction> {
        steps
            .iter()
            .map(|&(direction, metres)| Instruction::new(direction, metres).unwrap())
            .collect()
    }

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let plan = DigPlan::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day18 as Solution<PartOne>>::solve(&plan)?, 62);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let plan = DigPlan::parse(EXAMPLE_INPUT)?;
        assert_eq!(
            <Day18 as Solution<PartTwo>>::solve(&plan)?,
            952_408_144_115
        );
        Ok(())
    }

    #[test]
    fn decodes_hex_instructions() -> DynamicResult<()> {
        let (written, decoded) = parse_line(&instruction_pattern()?, "L 5 (#8ceee2)")?;
        assert_eq!(written, Instruction::new(Direction::Left, 5)?);
        assert_eq!(decoded, Instruction::new(Direction::Left, 577_262)?);
        Ok(())
    }

    #[rstest]
    #[case(
        &[(Direction::Right, 2), (Direction::Down, 2), (Direction::Left, 2), (Direction::Up, 2)],
        9
    )]
    #[case(
        &[
            (Direction::Right, 4),
            (Direction::Down, 3),
            (Direction::Left, 1),
            (Direction::Up, 2),
            (Direction::Left, 2),
            (Direction::Down, 2),
            (Direction::Left, 1),
            (Direction::Up, 3),
        ],
        18
    )]
    fn sweep_matches_shoelace(
        #[case] steps: &[(Direction, i64)],
        #[case] expected: i64,
    ) -> DynamicResult<()> {
        let plan = plan(steps);
        assert_eq!(lagoon_volume(&plan)?, expected);
        assert_eq!(shoelace_volume(&plan), expected);
        Ok(())
    }

    #[test]
    fn example_matches_shoelace() -> DynamicResult<()> {
        let plan = DigPlan::parse(EXAMPLE_INPUT)?;
        assert_eq!(lagoon_volume(&plan.decoded)?, shoelace_volume(&plan.decoded));
        Ok(())
    }

    #[rstest]
    #[case(&[(0, 3)], &[(0, 3)], &[])]
    #[case(&[(0, 6)], &[(0, 2)], &[(2, 6)])]
    #[case(&[(0, 6)], &[(2, 4)], &[(0, 2), (4, 6)])]
    #[case(&[(2, 6)], &[(0, 2)], &[(0, 6)])]
    #[case(&[], &[(1, 5)], &[(1, 5)])]
    fn toggles_spans(#[case] open: &[Span], #[case] segments: &[Span], #[case] expected: &[Span]) {
        assert_eq!(toggle(open, segments), expected);
    }

    #[test]
    fn open_trench_is_rejected() {
        let error = DigPlan::parse("R 2 (#000020)\nD 2 (#000021)\n")
            .and_then(|plan| lagoon_volume(&plan.written))
            .unwrap_err();
        assert_eq!(error.to_string(), "trench does not end where it started");
    }

    #[test]
    fn malformed_instructions_are_rejected() {
        assert!(DigPlan::parse("X 2 (#000020)").is_err());
        assert!(DigPlan::parse("R 0 (#000020)").is_err());
        assert!(DigPlan::parse("R 2 (#000024)").is_err());
    }
}
