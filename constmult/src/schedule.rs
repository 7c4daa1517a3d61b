use std::collections::HashMap;

use shiftadd_dag::{Graph, NodeRef, Op};

use crate::{Error, PipelinedAdder, TimingModel};

/// A node of the graph placed in a pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledOp {
    pub node: NodeRef,
    pub op: Op,
    pub left: Option<NodeRef>,
    pub right: Option<NodeRef>,
    pub shift: u32,
    pub stage: u32,
    /// Combinatorial delay accumulated since the last register, in seconds.
    pub delay: f64,
    pub adder: Option<PipelinedAdder>,
}

impl ScheduledOp {
    pub fn uses_dedicated_adder(&self) -> bool {
        self.adder.is_some()
    }
}

/// Receives scheduled operations in dependency order, e.g. to emit hardware for them.
pub trait OperationSink {
    fn emit(&mut self, graph: &Graph, op: &ScheduledOp);
}

impl OperationSink for Vec<ScheduledOp> {
    fn emit(&mut self, _graph: &Graph, op: &ScheduledOp) {
        self.push(op.clone());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    entries: Vec<ScheduledOp>,
    by_node: HashMap<NodeRef, usize>,
    result: NodeRef,
}

impl Schedule {
    /// Operations reachable from the result, each exactly once, operands first.
    pub fn entries(&self) -> &[ScheduledOp] {
        &self.entries
    }

    pub fn get(&self, node: NodeRef) -> Option<&ScheduledOp> {
        self.by_node.get(&node).map(|&index| &self.entries[index])
    }

    pub fn stage(&self, node: NodeRef) -> Option<u32> {
        self.get(node).map(|op| op.stage)
    }

    pub fn result(&self) -> NodeRef {
        self.result
    }

    pub fn result_stage(&self) -> u32 {
        self.entries[self.by_node[&self.result]].stage
    }

    pub fn result_delay(&self) -> f64 {
        self.entries[self.by_node[&self.result]].delay
    }

    pub fn stages(&self) -> u32 {
        self.entries.iter().map(|op| op.stage).max().unwrap_or(0) + 1
    }

    pub fn replay(&self, graph: &Graph, sink: &mut dyn OperationSink) {
        for op in &self.entries {
            sink.emit(graph, op);
        }
    }
}

struct Scheduler<'a> {
    graph: &'a Graph,
    timing: &'a dyn TimingModel,
    period: f64,
    placed: HashMap<NodeRef, (u32, f64)>,
}

impl Scheduler<'_> {
    fn operand(&self, node: Option<NodeRef>) -> Result<(u32, f64), Error> {
        node.and_then(|node| self.placed.get(&node).copied())
            .ok_or_else(|| Error::Graph(shiftadd_dag::Error::MalformedNodeRequest("operand scheduled late".into())))
    }

    /// Places a carry-chain operation whose operands are ready at `stage` after `operand_delay`.
    ///
    /// The operation stays in `stage` if it fits, moves one stage later behind registered
    /// operands otherwise, and becomes a pipelined adder if it does not fit even then.
    fn fit(
        &self,
        node_ref: NodeRef,
        stage: u32,
        operand_delay: f64,
        bits: u32,
        local: f64,
    ) -> (u32, f64, Option<PipelinedAdder>) {
        let wire = self.timing.wire_delay();
        let registered = self.timing.ff_delay() + wire + local;
        let tentative = operand_delay + wire + local;
        if tentative <= self.period {
            (stage, tentative, None)
        } else if registered <= self.period {
            (stage + 1, registered, None)
        } else {
            let adder = self.timing.pipelined_adder(bits);
            tracing::debug!("{node_ref} needs a pipelined adder of {bits} bits in chunks of {}", adder.chunk);
            (stage + 1 + adder.latency, adder.output_delay, Some(adder))
        }
    }

    fn place(&mut self, node_ref: NodeRef) -> Result<ScheduledOp, Error> {
        let graph = self.graph;
        let node = &graph[node_ref];
        let bits = node.cost() + 1;
        let (stage, delay, adder) = match node.op() {
            Op::Identity => (0, 0.0, None),
            Op::Shift => {
                let (stage, delay) = self.operand(node.left())?;
                (stage, delay, None)
            }
            Op::Neg => {
                let (stage, delay) = self.operand(node.left())?;
                let local = self.timing.negate_delay(bits);
                if node.left() == Some(graph.identity()) {
                    // the input itself is never registered
                    (stage, delay + self.timing.wire_delay() + local, None)
                } else {
                    self.fit(node_ref, stage, delay, bits, local)
                }
            }
            Op::Add | Op::Sub | Op::RSub => {
                let (left_stage, left_delay) = self.operand(node.left())?;
                let (right_stage, right_delay) = self.operand(node.right())?;
                let local = self.timing.adder_delay(bits);
                self.fit(node_ref, left_stage.max(right_stage), left_delay.max(right_delay), bits, local)
            }
        };
        self.placed.insert(node_ref, (stage, delay));
        tracing::debug!("{} stage {stage} delay {delay:e}", graph.display_node(node_ref));
        Ok(ScheduledOp {
            node: node_ref,
            op: node.op(),
            left: node.left(),
            right: node.right(),
            shift: node.shift(),
            stage,
            delay,
            adder,
        })
    }
}

/// Places every node reachable from the result in a pipeline stage.
///
/// An operation stays in the stage of its latest operand while the accumulated delay fits in
/// the clock period. Otherwise its operands are registered, and an adder that still does not fit
/// is replaced by a pipelined one. Shifts are free and never advance the stage.
pub fn schedule(graph: &Graph, timing: &dyn TimingModel) -> Result<Schedule, Error> {
    let result = graph.result().ok_or(Error::MissingResult)?;
    let mut scheduler = Scheduler { graph, timing, period: timing.clock_period(), placed: HashMap::new() };
    let mut entries = Vec::new();
    let mut by_node = HashMap::new();
    for node in graph.reachable(result) {
        by_node.insert(node, entries.len());
        entries.push(scheduler.place(node)?);
    }
    Ok(Schedule { entries, by_node, result })
}

pub fn schedule_into(
    graph: &Graph,
    timing: &dyn TimingModel,
    sink: &mut dyn OperationSink,
) -> Result<Schedule, Error> {
    let schedule = schedule(graph, timing)?;
    schedule.replay(graph, sink);
    Ok(schedule)
}
