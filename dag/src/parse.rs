use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::{Graph, NodeRef, Op};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "parse error on line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

struct Context {
    graph: Option<Graph>,
    labels: HashMap<String, NodeRef>,
}

impl Context {
    fn graph(&mut self) -> Result<&mut Graph, String> {
        self.graph.as_mut().ok_or_else(|| "the first node must be the input operand `x`".to_string())
    }

    fn lookup(&self, label: &str) -> Result<NodeRef, String> {
        let label = label.trim();
        if !label.starts_with('%') {
            return Err(format!("expected a node reference, found {label:?}"));
        }
        self.labels.get(label).copied().ok_or_else(|| format!("undefined node {label}"))
    }

    fn parse_line(&mut self, line: &str) -> Result<(), String> {
        if let Some(rest) = line.strip_prefix("result") {
            let result = self.lookup(rest)?;
            self.graph()?.set_result(result);
            return Ok(());
        }
        let Some((lhs, rhs)) = line.split_once('=') else {
            return Err("expected `%N:W = ...`".into());
        };
        let (label, width) = lhs.trim().split_once(':').ok_or_else(|| "expected `%N:W` before `=`".to_string())?;
        if !label.starts_with('%') || label.len() < 2 {
            return Err(format!("invalid node label {label:?}"));
        }
        if self.labels.contains_key(label) {
            return Err(format!("node {label} is defined twice"));
        }
        let width = parse_number(width)?;
        let rhs = rhs.trim();
        let (op_name, args) = rhs.split_once(char::is_whitespace).unwrap_or((rhs, ""));
        let op = Op::from_name(op_name).ok_or_else(|| format!("unknown operation {op_name:?}"))?;
        let node = if op == Op::Identity {
            if self.graph.is_some() {
                return Err("the input operand is defined twice".into());
            }
            if !args.trim().is_empty() {
                return Err("`x` takes no operands".into());
            }
            let graph = Graph::new(width).map_err(|error| error.to_string())?;
            let identity = graph.identity();
            self.graph = Some(graph);
            identity
        } else {
            let (shifted, right) = match args.split_once(',') {
                Some((shifted, right)) => (shifted, Some(self.lookup(right)?)),
                None => (args, None),
            };
            let (left, shift) = match shifted.split_once("<<") {
                Some((left, shift)) => (self.lookup(left)?, parse_number(shift)?),
                None => (self.lookup(shifted)?, 0),
            };
            let graph = self.graph()?;
            let node = graph.provide(op, Some(left), shift, right).map_err(|error| error.to_string())?;
            let existing = &graph[node];
            if (existing.op(), existing.left(), existing.shift(), existing.right()) != (op, Some(left), shift, right) {
                return Err(format!("{label} has the same value as {}", graph.display_node(node)));
            }
            node
        };
        self.labels.insert(label.to_string(), node);
        Ok(())
    }
}

fn parse_number(text: &str) -> Result<u32, String> {
    let text = text.trim();
    text.parse().map_err(|_| format!("expected a number, found {text:?}"))
}

impl FromStr for Graph {
    type Err = ParseError;

    /// Parses the form produced by the `Display` implementation of [`Graph`].
    ///
    /// Node labels are arbitrary; widths are only used on the `x` line, where they set the input
    /// width. Everything after a `;` is a comment.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut context = Context { graph: None, labels: HashMap::new() };
        for (index, line) in source.lines().enumerate() {
            let line = line.split(';').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            context.parse_line(line).map_err(|message| ParseError { line: index + 1, message })?;
        }
        context.graph.ok_or(ParseError { line: 0, message: "no input operand defined".into() })
    }
}
