use advent_framework::grid::{Direction, Grid, Position};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use thiserror::Error;

#[solution_runner(name = "Day 10: Pipe Maze", parsed = PipeMaze, part_one = Day10, part_two = Day10)]
impl super::AdventOfCode2023<10> {}

/*
The sketch is a grid of pipes. `|` and `-` run straight, `L J 7 F` bend between two directions,
`.` is ground and `S` is the start, sitting on a pipe whose shape is not drawn. The start belongs
to a single closed loop of pipes.
*/

#[derive(Error, Debug)]
enum Day10Error {
    #[error("invalid tile {0:?}")]
    InvalidTile(char),
    #[error("no start tile 'S' in the sketch")]
    MissingStart,
    #[error("start tile connects to {0} pipes, expected 2")]
    AmbiguousStart(usize),
    #[error("loop breaks at {0}")]
    BrokenLoop(Position),
}

const START: char = 'S';

/// The two directions a pipe connects, `None` for ground and unknown tiles.
fn connections(tile: char) -> Option<[Direction; 2]> {
    use Direction::{Down, Left, Right, Up};
    match tile {
        '|' => Some([Up, Down]),
        '-' => Some([Left, Right]),
        'L' => Some([Up, Right]),
        'J' => Some([Up, Left]),
        '7' => Some([Down, Left]),
        'F' => Some([Down, Right]),
        _ => None,
    }
}

fn pipe_between(a: Direction, b: Direction) -> Option<char> {
    ['|', '-', 'L', 'J', '7', 'F'].into_iter().find(|&pipe| {
        connections(pipe).is_some_and(|ends| ends.contains(&a) && ends.contains(&b))
    })
}

#[derive(Debug)]
struct PipeMaze {
    /// The sketch with the start replaced by its actual pipe.
    tiles: Grid<char>,
    on_loop: Grid<bool>,
    loop_length: usize,
}

impl ParseData for PipeMaze {
    fn parse(input: &str) -> DynamicResult<Self> {
        let mut tiles = Grid::parse(input, |tile| match tile {
            '|' | '-' | 'L' | 'J' | '7' | 'F' | '.' | START => Ok(tile),
            other => Err(Day10Error::InvalidTile(other)),
        })?;
        let start = tiles.find(|&tile| tile == START).ok_or(Day10Error::MissingStart)?;

        let start_ends: Vec<Direction> = tiles
            .neighbours4(start)
            .filter(|&(direction, neighbour)| {
                tiles
                    .get(neighbour)
                    .and_then(|&tile| connections(tile))
                    .is_some_and(|ends| ends.contains(&direction.opposite()))
            })
            .map(|(direction, _)| direction)
            .collect();
        let &[first_end, second_end] = start_ends.as_slice() else {
            return Err(Day10Error::AmbiguousStart(start_ends.len()).into());
        };
        let start_pipe =
            pipe_between(first_end, second_end).ok_or(Day10Error::AmbiguousStart(2))?;
        if let Some(tile) = tiles.get_mut(start) {
            *tile = start_pipe;
        }

        let mut on_loop = Grid::filled(tiles.height(), tiles.width(), false);
        let mut position = start;
        let mut heading = first_end;
        let mut loop_length = 0;
        loop {
            if let Some(visited) = on_loop.get_mut(position) {
                *visited = true;
            }
            position = tiles
                .step(position, heading)
                .ok_or(Day10Error::BrokenLoop(position))?;
            loop_length += 1;
            if position == start {
                break;
            }
            let ends = tiles
                .get(position)
                .and_then(|&tile| connections(tile))
                .filter(|ends| ends.contains(&heading.opposite()))
                .ok_or(Day10Error::BrokenLoop(position))?;
            heading = if ends[0] == heading.opposite() {
                ends[1]
            } else {
                ends[0]
            };
        }

        Ok(Self {
            tiles,
            on_loop,
            loop_length,
        })
    }
}

struct Day10;

impl Solution<PartOne> for Day10 {
    type Input = PipeMaze;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        Ok(input.loop_length / 2)
    }
}

/*
For part 2, count tiles enclosed by the loop. Scanning a row from the left, a ray crosses the loop
every time it passes a loop pipe connecting upwards; tiles off the loop after an odd number of
crossings are inside.
*/

impl Solution<PartTwo> for Day10 {
    type Input = PipeMaze;
    type Output = usize;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut enclosed = 0;
        for row in 0..input.tiles.height() {
            let mut inside = false;
            for (&tile, &on_loop) in input.tiles.row(row).zip(input.on_loop.row(row)) {
                if on_loop {
                    if connections(tile).is_some_and(|ends| ends.contains(&Direction::Up)) {
                        inside = !inside;
                    }
                } else if inside {
                    enclosed += 1;
                }
            }
        }
        Ok(enclosed)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SQUARE_LOOP: &str = "-L|F7
7S-7|
L|7||
-L-J|
L|-JF
";

    const COMPLEX_LOOP: &str = "..F7.
.FJ|.
SJ.L7
|F--J
LJ...
";

    const ENCLOSED: &str = "...........
.S-------7.
.|F-----7|.
.||.....||.
.||.....||.
.|L-7.F-J|.
.|..|.|..|.
.L--J.L--J.
...........
";

    const SQUEEZED: &str = "..........
.S------7.
.|F----7|.
.||....||.
.||....||.
.|L-7F-J|.
.|..||..|.
.L--JL--J.
..........
";

    const LARGER: &str = "FF7FSF7F7F7F7F7F---7
L|LJ||||||||||||F--J
FL-7LJLJ||||||LJL-77
F--JF--7||LJLJ.F7FJ-
L---JF-JLJ....FJLJJ7
|F|F-JF---7...L7L|7|
|FFJF7L7F-JF7..L---7
7-L-JL7||F7|L7F-7F7|
L.L7LFJ|||||FJL7||LJ
L7JLJL-JLJLJL--JLJ.L
";

    #[rstest]
    #[case(SQUARE_LOOP, 4)]
    #[case(COMPLEX_LOOP, 8)]
    fn part_one_solves_examples(#[case] input: &str, #[case] expected: usize) -> DynamicResult<()> {
        let maze = PipeMaze::parse(input)?;
        assert_eq!(<Day10 as Solution<PartOne>>::solve(&maze)?, expected);
        Ok(())
    }

    #[rstest]
    #[case(COMPLEX_LOOP, 1)]
    #[case(ENCLOSED, 4)]
    #[case(SQUEEZED, 4)]
    #[case(LARGER, 10)]
    fn part_two_solves_examples(#[case] input: &str, #[case] expected: usize) -> DynamicResult<()> {
        let maze = PipeMaze::parse(input)?;
        assert_eq!(<Day10 as Solution<PartTwo>>::solve(&maze)?, expected);
        Ok(())
    }

    #[test]
    fn start_pipe_is_inferred() -> DynamicResult<()> {
        let maze = PipeMaze::parse(COMPLEX_LOOP)?;
        assert_eq!(maze.tiles.get(Position::new(2, 0)), Some(&'F'));
        Ok(())
    }

    #[test]
    fn start_without_two_connections_is_rejected() {
        assert!(PipeMaze::parse("...\n.S.\n...\n").is_err());
        assert!(PipeMaze::parse("...\n...\n").is_err());
    }
}
