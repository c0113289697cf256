//! Running a day: parse the input once, solve each part, report what happened.
//!
//! Progress is reported as events to an [`OutputHandler`]; the binary prints them, tests record
//! them with [`RecordingHandler`].
//!
//! ```
//! use advent_framework::runner::{RecordingHandler, RunEvent, SolutionRunner, solution_runner};
//! use advent_framework::{DynamicResult, PartKind, PartOne, Solution};
//!
//! struct LineCount;
//!
//! impl Solution<PartOne> for LineCount {
//!     type Input = str;
//!     type Output = usize;
//!
//!     fn solve(input: &str) -> DynamicResult<usize> {
//!         Ok(input.lines().count())
//!     }
//! }
//!
//! #[solution_runner(name = "Line count", part_one = LineCount)]
//! struct LineCountRunner;
//!
//! let mut handler = RecordingHandler::default();
//! LineCountRunner::run("a\nb\n", &mut handler, false)?;
//! assert_eq!(handler.answer(PartKind::One), Some("2"));
//! # Ok::<(), advent_framework::DynamicError>(())
//! ```

use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::{DynamicResult, ParseData, Part, PartKind, PartOne, PartTwo, Solution};

pub use advent_framework_macros::solution_runner;

/// Receives progress events while a day runs.
pub trait OutputHandler {
    /// The day is starting; `name` is its display title.
    fn solution_name(&mut self, name: &str);

    /// The parse step is starting.
    fn parse_start(&mut self);

    /// The parse step finished, taking `duration_opt` when timing was requested.
    fn parse_end(&mut self, duration_opt: Option<Duration>);

    /// Solving `part` is starting.
    fn part_start(&mut self, part: PartKind);

    /// `part` produced `output`, taking `duration_opt` when timing was requested.
    fn part_output(&mut self, part: PartKind, output: &dyn Display, duration_opt: Option<Duration>);
}

/// Evaluate `work`, measuring how long it took when `timed` is set.
fn run_timed<T>(timed: bool, work: impl FnOnce() -> T) -> (T, Option<Duration>) {
    if timed {
        let start = Instant::now();
        let result = work();
        (result, Some(start.elapsed()))
    } else {
        (work(), None)
    }
}

/// Solve a single part and report it.
fn run_part<S, P>(
    input: &S::Input,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    P: Part,
    S: Solution<P>,
{
    let part = P::kind();
    handler.part_start(part);
    let (result, duration_opt) = run_timed(timed, || S::solve(input));
    handler.part_output(part, &result?, duration_opt);
    Ok(())
}

/// Parse the input and report it.
fn run_parse<D: ParseData>(
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<D> {
    handler.parse_start();
    let (result, duration_opt) = run_timed(timed, || D::parse(input));
    let parsed = result?;
    handler.parse_end(duration_opt);
    Ok(parsed)
}

/// Run a day with only a first part, solving straight from the text.
///
/// # Errors
///
/// Propagates the solution's error.
pub fn solve_half_solution<S1>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    S1: Solution<PartOne, Input = str>,
{
    handler.solution_name(name);
    run_part::<S1, PartOne>(input, handler, timed)
}

/// Run both parts of a day, solving straight from the text.
///
/// # Errors
///
/// Propagates the first error; the second part does not run if the first fails.
pub fn solve_full_solution<S1, S2>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    S1: Solution<PartOne, Input = str>,
    S2: Solution<PartTwo, Input = str>,
{
    handler.solution_name(name);
    run_part::<S1, PartOne>(input, handler, timed)?;
    run_part::<S2, PartTwo>(input, handler, timed)
}

/// Run a day with only a first part, parsing the text into `D` first.
///
/// # Errors
///
/// Propagates parse or solution errors.
pub fn solve_parsed_half_solution<D, S1>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    D: ParseData,
    S1: Solution<PartOne, Input = D>,
{
    handler.solution_name(name);
    let parsed = run_parse::<D>(input, handler, timed)?;
    run_part::<S1, PartOne>(&parsed, handler, timed)
}

/// Run both parts of a day against the same parsed `D`.
///
/// # Errors
///
/// Propagates parse or solution errors; later steps do not run after a failure.
pub fn solve_parsed_full_solution<D, S1, S2>(
    name: &str,
    input: &str,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()>
where
    D: ParseData,
    S1: Solution<PartOne, Input = D>,
    S2: Solution<PartTwo, Input = D>,
{
    handler.solution_name(name);
    let parsed = run_parse::<D>(input, handler, timed)?;
    run_part::<S1, PartOne>(&parsed, handler, timed)?;
    run_part::<S2, PartTwo>(&parsed, handler, timed)
}

/// A runnable day. Usually implemented through [`solution_runner`].
pub trait SolutionRunner {
    /// Run every step of the day against `input`.
    ///
    /// # Errors
    ///
    /// Propagates parse or solution errors.
    fn run(input: &str, handler: &mut dyn OutputHandler, timed: bool) -> DynamicResult<()>;
}

/// An event seen by [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Name(String),
    ParseStart,
    ParseEnd { timed: bool },
    PartStart(PartKind),
    PartOutput { part: PartKind, output: String, timed: bool },
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingHandler {
    pub events: Vec<RunEvent>,
}

impl RecordingHandler {
    /// The displayed answer of a part, if it was produced.
    #[must_use]
    pub fn answer(&self, part: PartKind) -> Option<&str> {
        self.events.iter().find_map(|event| match event {
            RunEvent::PartOutput {
                part: output_part,
                output,
                ..
            } if *output_part == part => Some(output.as_str()),
            _ => None,
        })
    }
}

impl OutputHandler for RecordingHandler {
    fn solution_name(&mut self, name: &str) {
        self.events.push(RunEvent::Name(name.to_owned()));
    }

    fn parse_start(&mut self) {
        self.events.push(RunEvent::ParseStart);
    }

    fn parse_end(&mut self, duration_opt: Option<Duration>) {
        self.events.push(RunEvent::ParseEnd {
            timed: duration_opt.is_some(),
        });
    }

    fn part_start(&mut self, part: PartKind) {
        self.events.push(RunEvent::PartStart(part));
    }

    fn part_output(&mut self, part: PartKind, output: &dyn Display, duration_opt: Option<Duration>) {
        self.events.push(RunEvent::PartOutput {
            part,
            output: output.to_string(),
            timed: duration_opt.is_some(),
        });
    }
}
