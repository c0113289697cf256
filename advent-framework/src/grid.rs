//! Rectangular grids of cells addressed by `(row, column)`.
//!
//! [`Grid`] stores its cells in a [`DMatrix`], so cells must satisfy nalgebra's [`Scalar`] bound
//! (`Clone + PartialEq + Debug + 'static`), which plain data enums get by deriving.

use std::fmt::{self, Display};

use nalgebra::{DMatrix, Scalar};
use thiserror::Error;

use crate::DynamicResult;
use crate::parsing::parse_input_lines;

/// A cell coordinate; `(0, 0)` is the top left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The position one step away, or `None` when it would go below zero.
    ///
    /// No upper bound is checked; see [`Grid::step`] for a bounded move.
    #[must_use]
    pub fn checked_step(self, direction: Direction) -> Option<Self> {
        self.checked_step_by(direction, 1)
    }

    /// The position `distance` steps away, or `None` on `usize` under/overflow.
    #[must_use]
    pub fn checked_step_by(self, direction: Direction, distance: usize) -> Option<Self> {
        let Self { row, col } = self;
        match direction {
            Direction::Up => row.checked_sub(distance).map(|row| Self { row, col }),
            Direction::Down => row.checked_add(distance).map(|row| Self { row, col }),
            Direction::Left => col.checked_sub(distance).map(|col| Self { row, col }),
            Direction::Right => col.checked_add(distance).map(|col| Self { row, col }),
        }
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four axis-aligned directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `{Up, Down}` and `{Left, Right}` are the only opposite pairs.
    #[must_use]
    pub fn is_opposite(self, other: Self) -> bool {
        self.opposite() == other
    }

    /// Counter-clockwise quarter turn.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Clockwise quarter turn.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    UnequalRowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("position {position} is outside of the {height}x{width} grid")]
    OutOfRange {
        position: Position,
        height: usize,
        width: usize,
    },

    #[error("invalid digit character: {0:?}")]
    InvalidDigit(char),
}

/// An immutable-size rectangle of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T: Scalar>(DMatrix<T>);

impl<T: Scalar> Grid<T> {
    /// Build from rows of cells.
    ///
    /// # Errors
    ///
    /// [`GridError::Empty`] without any cell, [`GridError::UnequalRowWidth`] for ragged rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(GridError::UnequalRowWidth {
                row,
                expected: width,
                found,
            });
        }

        Ok(Self(DMatrix::from_row_iterator(
            height,
            width,
            rows.into_iter().flatten(),
        )))
    }

    /// Parse one cell per character, one row per line.
    ///
    /// # Errors
    ///
    /// Cell errors are reported with their line; shape errors as in [`Grid::from_rows`].
    pub fn parse<E, F>(input: &str, mut cell: F) -> DynamicResult<Self>
    where
        E: Into<crate::DynamicError>,
        F: FnMut(char) -> Result<T, E>,
    {
        let rows = parse_input_lines(input, |_, line| {
            line.chars().map(&mut cell).collect::<Result<Vec<_>, E>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(rows)?)
    }

    /// A grid of `height` x `width` copies of `value`.
    #[must_use]
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self(DMatrix::from_element(height, width, value))
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.0.nrows()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.0.ncols()
    }

    #[must_use]
    pub fn is_valid(&self, position: Position) -> bool {
        position.row < self.height() && position.col < self.width()
    }

    /// The cell at `position`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfRange`] if the position is not inside the grid.
    pub fn at(&self, position: Position) -> Result<&T, GridError> {
        self.get(position).ok_or(GridError::OutOfRange {
            position,
            height: self.height(),
            width: self.width(),
        })
    }

    #[must_use]
    pub fn get(&self, position: Position) -> Option<&T> {
        self.0.get((position.row, position.col))
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.0.get_mut((position.row, position.col))
    }

    /// Swap the values of two cells. Out of range positions are ignored.
    pub fn swap(&mut self, a: Position, b: Position) {
        if self.is_valid(a) && self.is_valid(b) {
            self.0.swap((a.row, a.col), (b.row, b.col));
        }
    }

    /// The neighbouring position in `direction`, if it is inside the grid.
    #[must_use]
    pub fn step(&self, position: Position, direction: Direction) -> Option<Position> {
        self.step_by(position, direction, 1)
    }

    /// The position `distance` cells away in a straight line, if it is inside the grid.
    #[must_use]
    pub fn step_by(
        &self,
        position: Position,
        direction: Direction,
        distance: usize,
    ) -> Option<Position> {
        position
            .checked_step_by(direction, distance)
            .filter(|&next| self.is_valid(next))
    }

    /// Every position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let width = self.width();
        (0..self.height()).flat_map(move |row| (0..width).map(move |col| Position { row, col }))
    }

    /// Positions paired with their cells, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.positions().map(|position| (position, &self.0[(position.row, position.col)]))
    }

    /// In-bounds orthogonal neighbours with the direction taken to reach them.
    pub fn neighbours4(&self, position: Position) -> impl Iterator<Item = (Direction, Position)> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| Some((direction, self.step(position, direction)?)))
    }

    /// In-bounds neighbours including diagonals.
    pub fn neighbours8(&self, position: Position) -> impl Iterator<Item = Position> {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        OFFSETS.into_iter().filter_map(move |(d_row, d_col)| {
            let next = Position {
                row: position.row.checked_add_signed(d_row)?,
                col: position.col.checked_add_signed(d_col)?,
            };
            self.is_valid(next).then_some(next)
        })
    }

    /// Find the first position whose cell matches.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Position> {
        self.iter()
            .find_map(|(position, cell)| predicate(cell).then_some(position))
    }

    /// Cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &T> {
        (0..self.width()).map(move |col| &self.0[(row, col)])
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> {
        (0..self.height()).map(move |row| &self.0[(row, col)])
    }
}

impl Grid<u8> {
    /// Parse a block of single decimal digits.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidDigit`] on anything but `0`-`9`, plus the shape errors of
    /// [`Grid::from_rows`].
    pub fn from_digits(input: &str) -> DynamicResult<Self> {
        Self::parse(input, |ch| {
            ch.to_digit(10)
                .and_then(|digit| u8::try_from(digit).ok())
                .ok_or(GridError::InvalidDigit(ch))
        })
    }
}

impl<T: Scalar + Display> Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height() {
            for cell in self.row(row) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digits_reads_rows() -> DynamicResult<()> {
        let grid = Grid::from_digits("123\n456\n")?;
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.at(Position::new(1, 2))?, &6);
        assert_eq!(grid.at(Position::new(0, 0))?, &1);
        Ok(())
    }

    #[test]
    fn from_digits_rejects_ragged_rows() {
        let error = Grid::from_digits("123\n45\n").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<GridError>(),
            Some(GridError::UnequalRowWidth {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn from_digits_rejects_non_digit() {
        let error = Grid::from_digits("12\n3x\n").unwrap_err();
        assert_eq!(error.to_string(), "invalid input on line 2");
    }

    #[test]
    fn from_rows_rejects_empty() {
        assert_eq!(Grid::<u8>::from_rows(vec![]), Err(GridError::Empty));
        assert_eq!(Grid::<u8>::from_rows(vec![vec![]]), Err(GridError::Empty));
    }

    #[test]
    fn at_fails_out_of_range() -> DynamicResult<()> {
        let grid = Grid::from_digits("12\n34")?;
        assert!(grid.is_valid(Position::new(1, 1)));
        assert!(!grid.is_valid(Position::new(2, 0)));
        assert_eq!(
            grid.at(Position::new(0, 2)),
            Err(GridError::OutOfRange {
                position: Position::new(0, 2),
                height: 2,
                width: 2
            })
        );
        Ok(())
    }

    #[test]
    fn steps_stay_in_bounds() -> DynamicResult<()> {
        let grid = Grid::from_digits("123\n456\n789")?;
        let corner = Position::new(0, 0);
        assert_eq!(grid.step(corner, Direction::Up), None);
        assert_eq!(grid.step(corner, Direction::Right), Some(Position::new(0, 1)));
        assert_eq!(grid.step_by(corner, Direction::Down, 2), Some(Position::new(2, 0)));
        assert_eq!(grid.step_by(corner, Direction::Down, 3), None);

        let centre = Position::new(1, 1);
        assert_eq!(grid.neighbours4(centre).count(), 4);
        assert_eq!(grid.neighbours8(centre).count(), 8);
        assert_eq!(grid.neighbours8(corner).count(), 3);
        Ok(())
    }

    #[test]
    fn rows_and_columns() -> DynamicResult<()> {
        let grid = Grid::from_digits("12\n34")?;
        assert_eq!(grid.row(1).copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(grid.column(1).copied().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(grid.to_string(), "12\n34\n");
        assert_eq!(grid.find(|&cell| cell == 3), Some(Position::new(1, 0)));
        Ok(())
    }

    #[test]
    fn directions_turn_and_oppose() {
        for direction in Direction::ALL {
            assert!(direction.is_opposite(direction.opposite()));
            assert!(!direction.is_opposite(direction));
            assert_eq!(direction.turn_left().turn_right(), direction);
            assert_eq!(direction.turn_right().turn_right(), direction.opposite());
        }
    }
}
