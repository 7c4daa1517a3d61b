use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::io;

use shiftadd_constmult::Schedule;
use shiftadd_dag::{Graph, NodeRef, Op};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    from_node: NodeRef,
    to_arg: usize,
}

struct Record {
    node: NodeRef,
    label: String,
    args: Vec<String>,
    inputs: BTreeSet<Edge>,
    is_result: bool,
}

impl Record {
    fn new(graph: &Graph, node: NodeRef) -> Self {
        let data = &graph[node];
        let label = format!("{node}:{} = {}", data.bit_width(), data.op());
        Self { node, label, args: Vec::new(), inputs: BTreeSet::new(), is_result: graph.result() == Some(node) }
    }

    fn arg(mut self, input: impl ToString) -> Self {
        self.args.push(input.to_string());
        self
    }

    fn operand(mut self, input: NodeRef, shift: Option<u32>) -> Self {
        self.inputs.insert(Edge { from_node: input, to_arg: self.args.len() });
        match shift {
            Some(shift) => self.arg(format!("{input} << {shift}")),
            None => self.arg(input),
        }
    }
}

struct Context<'a> {
    schedule: Option<&'a Schedule>,
    fanout: BTreeMap<NodeRef, BTreeSet<NodeRef>>,
    records: Vec<Record>,
}

impl<'a> Context<'a> {
    fn add_record(&mut self, record: Record) {
        for input in &record.inputs {
            self.fanout.entry(input.from_node).or_default().insert(record.node);
        }

        self.records.push(record);
    }

    fn high_fanout(&self, node: NodeRef) -> Option<usize> {
        let fanout = self.fanout.get(&node).map(BTreeSet::len).unwrap_or(0);
        if fanout >= 10 { Some(fanout) } else { None }
    }

    fn print(&self, writer: &mut impl io::Write) -> io::Result<()> {
        writeln!(writer, "digraph {{")?;
        writeln!(writer, "  rankdir=LR;")?;
        writeln!(writer, "  node [fontname=\"monospace\"];")?;
        match self.schedule {
            Some(schedule) => {
                let mut stages: BTreeMap<u32, Vec<&Record>> = BTreeMap::new();
                for record in &self.records {
                    let stage = schedule.stage(record.node).unwrap_or(0);
                    stages.entry(stage).or_default().push(record);
                }
                for (stage, records) in stages {
                    writeln!(writer, "  subgraph cluster_stage_{stage} {{")?;
                    writeln!(writer, "    label=\"stage {stage}\";")?;
                    for record in records {
                        self.print_record(writer, record, "    ")?;
                    }
                    writeln!(writer, "  }}")?;
                }
            }
            None => {
                for record in &self.records {
                    self.print_record(writer, record, "  ")?;
                }
            }
        }
        for record in &self.records {
            self.print_edges(writer, record)?;
        }
        writeln!(writer, "}}")
    }

    fn print_record(&self, writer: &mut impl io::Write, record: &Record, indent: &str) -> io::Result<()> {
        // angle brackets delimit ports in record labels
        let escape = |text: &str| text.escape_default().to_string().replace('<', "\\<").replace('>', "\\>");
        let mut label = format!("<out> {}\\l", escape(&record.label));
        for (i, arg) in record.args.iter().enumerate() {
            write!(&mut label, " | <arg{i}> {}\\l", escape(arg)).unwrap();
        }

        let index = record.node.index();
        let style = if record.is_result { " penwidth=3" } else { "" };
        writeln!(writer, "{indent}node_{index} [shape=record label=\"{label}\"{style}];")
    }

    fn print_edges(&self, writer: &mut impl io::Write, record: &Record) -> io::Result<()> {
        let index = record.node.index();
        for input in &record.inputs {
            if self.high_fanout(input.from_node).is_some() {
                continue;
            }

            let input_index = input.from_node.index();
            writeln!(writer, "  node_{input_index}:out -> node_{index}:arg{};", input.to_arg)?;
        }

        if let Some(fanout) = self.high_fanout(record.node) {
            writeln!(writer, "  stub_{index} [label=\"{fanout} uses\"];")?;
            writeln!(writer, "  node_{index}:out -> stub_{index};")?;
        }

        if record.is_result {
            writeln!(writer, "  result [shape=plaintext label=\"result\"];")?;
            writeln!(writer, "  node_{index}:out -> result;")?;
        }

        Ok(())
    }
}

/// Renders the nodes contributing to the result of `graph` as a Graphviz digraph.
///
/// With a schedule, nodes are grouped into one cluster per pipeline stage.
pub fn describe(writer: &mut impl io::Write, graph: &Graph, schedule: Option<&Schedule>) -> io::Result<()> {
    let nodes: Vec<NodeRef> = match graph.result() {
        Some(result) => graph.reachable(result),
        None => graph.iter().map(|(node, _)| node).collect(),
    };

    let mut ctx = Context { schedule, fanout: BTreeMap::new(), records: vec![] };

    for node in nodes {
        let data = &graph[node];
        let mut record = Record::new(graph, node);
        record = match (data.op(), data.left(), data.right()) {
            (Op::Identity, _, _) => record,
            (Op::Neg, Some(left), _) => record.operand(left, None),
            (_, Some(left), None) => record.operand(left, Some(data.shift())),
            (_, Some(left), Some(right)) => record.operand(left, Some(data.shift())).operand(right, None),
            (_, None, _) => record,
        };
        record = record.arg(format!("value = {}", data.value())).arg(format!("cost = {}", data.cost()));

        if let Some(op) = schedule.and_then(|schedule| schedule.get(node)) {
            record = record.arg(format!("stage {}, {:.3} ns", op.stage, op.delay * 1e9));
            if let Some(adder) = op.adder {
                record = record.arg(format!("pipelined adder, {} chunks of {} bits", adder.latency + 1, adder.chunk));
            }
        }

        ctx.add_record(record);
    }

    ctx.print(writer)
}
