use std::collections::{HashMap, VecDeque};

use advent_framework::parsing::parse_input_lines;
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicResult, ParseData, PartOne, PartTwo, Solution};
use petgraph::Direction::{Incoming, Outgoing};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use thiserror::Error;

use crate::arithmetic::{Overflow, checked_lcm};

#[solution_runner(
    name = "Day 20: Pulse Propagation",
    parsed = Circuit,
    part_one = Day20,
    part_two = Day20
)]
impl super::AdventOfCode2023<20> {}

/*
Modules are wired together and send low or high pulses to their outputs, like `%a -> b, c`. Pulses
are handled in the order they are sent.

- The broadcaster repeats what it receives. Pushing the button sends it a low pulse.
- A flip-flop `%` ignores high pulses. A low pulse toggles it, and it sends high when turned on and
  low when turned off.
- A conjunction `&` remembers the last pulse from each input, starting at low, and sends low only
  when it remembers high from all of them.
*/

#[derive(Error, Debug)]
enum Day20Error {
    #[error("expected a module like \"%name -> a, b\", found {0:?}")]
    InvalidModule(String),
    #[error("module {0:?} is defined more than once")]
    DuplicateModule(String),
    #[error("no broadcaster module")]
    MissingBroadcaster,
    #[error("no module named \"rx\"")]
    MissingRx,
    #[error("\"rx\" is not fed by exactly one conjunction module")]
    MissingFeeder,
    #[error("module {0:?} never sent a high pulse to the conjunction feeding \"rx\"")]
    NeverHigh(String),
}

const BROADCASTER: &str = "broadcaster";
const RX: &str = "rx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pulse {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Module {
    Button,
    Broadcaster,
    FlipFlop { on: bool },
    Conjunction { memory: HashMap<NodeIndex, Pulse> },
    /// Only named as an output; receives pulses without reacting.
    Untyped,
}

impl Module {
    /// The pulse sent to every output after receiving `pulse` from `from`, if any.
    fn receive(&mut self, from: NodeIndex, pulse: Pulse) -> Option<Pulse> {
        match self {
            Self::Button | Self::Untyped => None,
            Self::Broadcaster => Some(pulse),
            Self::FlipFlop { on } => match pulse {
                Pulse::High => None,
                Pulse::Low => {
                    *on = !*on;
                    Some(if *on { Pulse::High } else { Pulse::Low })
                }
            },
            Self::Conjunction { memory } => {
                memory.insert(from, pulse);
                if memory.values().all(|&last| last == Pulse::High) {
                    Some(Pulse::Low)
                } else {
                    Some(Pulse::High)
                }
            }
        }
    }
}

#[derive(Debug)]
struct Node {
    name: String,
    module: Module,
}

/// Module wiring with every module in its initial state. Edges are weighted by where the output
/// appears in its module's list.
#[derive(Debug)]
struct Circuit {
    graph: DiGraph<Node, usize>,
    button: NodeIndex,
    broadcaster: NodeIndex,
    /// Outputs of each module in listed order, indexed by node.
    outputs: Vec<Vec<NodeIndex>>,
}

/// Module name, initial state and output names of one line.
type Declaration = (String, Module, Vec<String>);

fn parse_declaration(line: &str) -> Result<Declaration, Day20Error> {
    let invalid = || Day20Error::InvalidModule(line.to_owned());
    let (module, outputs) = line.split_once(" -> ").ok_or_else(invalid)?;
    let (name, module) = if module == BROADCASTER {
        (module, Module::Broadcaster)
    } else if let Some(name) = module.strip_prefix('%') {
        (name, Module::FlipFlop { on: false })
    } else if let Some(name) = module.strip_prefix('&') {
        (
            name,
            Module::Conjunction {
                memory: HashMap::new(),
            },
        )
    } else {
        return Err(invalid());
    };

    let outputs: Vec<&str> = outputs.split(',').map(str::trim).collect();
    let is_name = |name: &str| !name.is_empty() && name.chars().all(char::is_alphanumeric);
    if !is_name(name) || !outputs.iter().all(|output| is_name(output)) {
        return Err(invalid());
    }
    Ok((
        name.to_owned(),
        module,
        outputs.into_iter().map(str::to_owned).collect(),
    ))
}

impl ParseData for Circuit {
    fn parse(input: &str) -> DynamicResult<Self> {
        let declarations = parse_input_lines(input, |_, line| parse_declaration(line.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut graph = DiGraph::new();
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();
        let button = graph.add_node(Node {
            name: "button".to_owned(),
            module: Module::Button,
        });
        let mut sources = Vec::with_capacity(declarations.len());
        for (name, module, _) in &declarations {
            if indices.contains_key(name) {
                return Err(Day20Error::DuplicateModule(name.clone()).into());
            }
            let index = graph.add_node(Node {
                name: name.clone(),
                module: module.clone(),
            });
            indices.insert(name.clone(), index);
            sources.push(index);
        }

        let broadcaster = *indices
            .get(BROADCASTER)
            .ok_or(Day20Error::MissingBroadcaster)?;
        graph.add_edge(button, broadcaster, 0);
        for (&from, (_, _, outputs)) in sources.iter().zip(&declarations) {
            for (order, output) in outputs.iter().enumerate() {
                let to = *indices.entry(output.clone()).or_insert_with(|| {
                    graph.add_node(Node {
                        name: output.clone(),
                        module: Module::Untyped,
                    })
                });
                graph.add_edge(from, to, order);
            }
        }

        for node in graph.node_indices() {
            let inputs: Vec<NodeIndex> = graph.neighbors_directed(node, Incoming).collect();
            if let Module::Conjunction { memory } = &mut graph[node].module {
                memory.extend(inputs.into_iter().map(|input| (input, Pulse::Low)));
            }
        }

        let outputs = graph
            .node_indices()
            .map(|node| {
                let mut edges: Vec<(usize, NodeIndex)> = graph
                    .edges_directed(node, Outgoing)
                    .map(|edge| (*edge.weight(), edge.target()))
                    .collect();
                edges.sort_unstable();
                edges.into_iter().map(|(_, target)| target).collect()
            })
            .collect();

        Ok(Self {
            graph,
            button,
            broadcaster,
            outputs,
        })
    }
}

impl Circuit {
    fn find(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&node| self.graph[node].name == name)
    }

    fn inputs(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut inputs: Vec<NodeIndex> = self.graph.neighbors_directed(node, Incoming).collect();
        inputs.sort_unstable();
        inputs.dedup();
        inputs
    }
}

/// Module states while pushing the button, leaving the circuit itself untouched.
struct Simulation<'a> {
    circuit: &'a Circuit,
    modules: Vec<Module>,
    presses: u64,
    low: u64,
    high: u64,
}

impl<'a> Simulation<'a> {
    fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            modules: circuit
                .graph
                .node_indices()
                .map(|node| circuit.graph[node].module.clone())
                .collect(),
            presses: 0,
            low: 0,
            high: 0,
        }
    }

    /// Push the button once and deliver every pulse, calling `watch` with `(from, to, pulse)`.
    fn press(&mut self, mut watch: impl FnMut(NodeIndex, NodeIndex, Pulse)) -> Result<(), Overflow> {
        self.presses = self.presses.checked_add(1).ok_or(Overflow("button presses"))?;
        let mut queue = VecDeque::from([(self.circuit.button, self.circuit.broadcaster, Pulse::Low)]);
        while let Some((from, to, pulse)) = queue.pop_front() {
            watch(from, to, pulse);
            let count = match pulse {
                Pulse::Low => &mut self.low,
                Pulse::High => &mut self.high,
            };
            *count = count.checked_add(1).ok_or(Overflow("pulse count"))?;

            let Some(sent) = self.modules[to.index()].receive(from, pulse) else {
                continue;
            };
            queue.extend(
                self.circuit.outputs[to.index()]
                    .iter()
                    .map(|&output| (to, output, sent)),
            );
        }
        Ok(())
    }
}

struct Day20;

impl Day20 {
    const PRESSES: usize = 1000;
    const PRESS_LIMIT: u64 = 1_000_000;
}

impl Solution<PartOne> for Day20 {
    type Input = Circuit;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let mut simulation = Simulation::new(input);
        for _ in 0..Self::PRESSES {
            simulation.press(|_, _, _| {})?;
        }
        Ok(simulation
            .low
            .checked_mul(simulation.high)
            .ok_or(Overflow("pulse product"))?)
    }
}

/*
Part 2 wants the fewest button presses until a single low pulse reaches `rx`. Simulating that takes
far too long. `rx` is fed by one conjunction, which only sends low once all of its inputs last sent
high. Each input sends high periodically, so the answer is the lowest common multiple of the press
on which each input first sends high.
*/

impl Solution<PartTwo> for Day20 {
    type Input = Circuit;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        let rx = input.find(RX).ok_or(Day20Error::MissingRx)?;
        let feeders = input.inputs(rx);
        let &[feeder] = feeders.as_slice() else {
            return Err(Day20Error::MissingFeeder.into());
        };
        if !matches!(input.graph[feeder].module, Module::Conjunction { .. }) {
            return Err(Day20Error::MissingFeeder.into());
        }
        let inputs = input.inputs(feeder);

        let mut first_high: HashMap<NodeIndex, u64> = HashMap::new();
        let mut simulation = Simulation::new(input);
        while first_high.len() < inputs.len() {
            if simulation.presses >= Self::PRESS_LIMIT {
                let silent = inputs
                    .iter()
                    .find(|node| !first_high.contains_key(*node))
                    .map(|&node| input.graph[node].name.clone())
                    .unwrap_or_default();
                return Err(Day20Error::NeverHigh(silent).into());
            }
            let press = simulation.presses + 1;
            simulation.press(|from, to, pulse| {
                if to == feeder && pulse == Pulse::High {
                    first_high.entry(from).or_insert(press);
                }
            })?;
        }
        Ok(checked_lcm(first_high.into_values()).ok_or(Overflow("presses until rx"))?)
    }
}
