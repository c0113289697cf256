//! Helpers for turning puzzle text into values with useful error context.

use std::str::FromStr;

use thiserror::Error;

use crate::DynamicError;

/// Parsing a piece of text failed; keeps the text around for the message.
#[derive(Error, Debug)]
#[error("failed to parse {text:?}")]
pub struct ParseContextError<E>
where
    E: std::error::Error,
{
    text: String,
    source: E,
}

/// [`str::parse`] that remembers which text could not be parsed.
///
/// # Errors
///
/// Returns a [`ParseContextError`] wrapping [`F::Err`][FromStr::Err].
pub fn parse_with_context<F>(text: &str) -> Result<F, ParseContextError<F::Err>>
where
    F: FromStr,
    F::Err: std::error::Error,
{
    text.parse::<F>().map_err(|source| ParseContextError {
        text: text.to_owned(),
        source,
    })
}

/// A line of input could not be parsed.
#[derive(Error, Debug)]
#[error("invalid input on line {}", .line_index.saturating_add(1))]
pub struct InvalidLine {
    /// Zero based, displayed one based.
    line_index: usize,
    source: DynamicError,
}

impl InvalidLine {
    /// Zero based index of the offending line.
    #[must_use]
    pub fn line_index(&self) -> usize {
        self.line_index
    }
}

/// Parse each line with `parser`, reporting failures with the line index shifted by `offset`.
///
/// The offset is useful when `input` is a slice taken further down the original text.
pub fn parse_lines_with_offset<T, E, F>(
    input: &str,
    offset: usize,
    mut parser: F,
) -> impl Iterator<Item = Result<T, InvalidLine>>
where
    E: Into<DynamicError>,
    F: FnMut(usize, &str) -> Result<T, E>,
{
    input.lines().enumerate().map(move |(index, line)| {
        let line_index = index.saturating_add(offset);
        parser(line_index, line).map_err(|source| InvalidLine {
            line_index,
            source: source.into(),
        })
    })
}

/// Parse every line of the input; the closure receives `(line_index, line)`.
pub fn parse_input_lines<T, E, F>(
    input: &str,
    parser: F,
) -> impl Iterator<Item = Result<T, InvalidLine>>
where
    E: Into<DynamicError>,
    F: FnMut(usize, &str) -> Result<T, E>,
{
    parse_lines_with_offset(input, 0, parser)
}

/// Cursor over input made of blocks of lines separated by blank lines.
///
/// Lines containing only whitespace count as blank.
#[derive(Debug, Clone)]
pub struct InputScanner<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> InputScanner<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.position).copied()
    }

    fn is_blank(line: &str) -> bool {
        line.trim().is_empty()
    }

    /// Skip blank lines. Returns `None` if nothing is left afterwards.
    pub fn skip_empty(&mut self) -> Option<()> {
        while let Some(line) = self.peek() {
            if !Self::is_blank(line) {
                return Some(());
            }
            self.position += 1;
        }
        None
    }

    /// Whether every remaining line is blank.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.lines[self.position.min(self.lines.len())..]
            .iter()
            .all(|line| Self::is_blank(line))
    }

    /// Parse the next line of the current block.
    ///
    /// Returns `Ok(None)` without consuming anything when the block has ended (blank line or end
    /// of input).
    ///
    /// # Errors
    ///
    /// Parser failures are wrapped in [`InvalidLine`].
    pub fn next_in_sequence<T, E, F>(&mut self, parser: F) -> Result<Option<T>, InvalidLine>
    where
        E: Into<DynamicError>,
        F: FnOnce(usize, &str) -> Result<T, E>,
    {
        match self.peek() {
            Some(line) if !Self::is_blank(line) => {
                let line_index = self.position;
                self.position += 1;
                parser(line_index, line)
                    .map(Some)
                    .map_err(|source| InvalidLine {
                        line_index,
                        source: source.into(),
                    })
            }
            _ => Ok(None),
        }
    }

    /// Skip blank lines, then parse the next line.
    ///
    /// # Errors
    ///
    /// Parser failures are wrapped in [`InvalidLine`].
    pub fn next_item<T, E, F>(&mut self, parser: F) -> Result<Option<T>, InvalidLine>
    where
        E: Into<DynamicError>,
        F: FnOnce(usize, &str) -> Result<T, E>,
    {
        if self.skip_empty().is_none() {
            return Ok(None);
        }
        self.next_in_sequence(parser)
    }

    /// Parse every line up to the end of the current block.
    ///
    /// # Errors
    ///
    /// The first parser failure is returned, wrapped in [`InvalidLine`].
    pub fn collect_sequence<T, E, F>(&mut self, mut parser: F) -> Result<Vec<T>, InvalidLine>
    where
        E: Into<DynamicError>,
        F: FnMut(usize, &str) -> Result<T, E>,
    {
        let mut items = Vec::new();
        while let Some(item) = self.next_in_sequence(&mut parser)? {
            items.push(item);
        }
        Ok(items)
    }

    /// Split what is left into blocks, each block joined back with newlines.
    ///
    /// Returns the index of the first line of each block alongside its text.
    pub fn remaining_blocks(&mut self) -> Vec<(usize, String)> {
        let mut blocks = Vec::new();
        while self.skip_empty().is_some() {
            let first_line = self.position;
            let mut block = Vec::new();
            while let Some(line) = self.peek().filter(|line| !Self::is_blank(line)) {
                block.push(line);
                self.position += 1;
            }
            blocks.push((first_line, block.join("\n")));
        }
        blocks
    }
}
