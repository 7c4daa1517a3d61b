use std::io;

use jzon::JsonValue;
use shiftadd_constmult::{ConstMult, OperationSink, ScheduledOp};
use shiftadd_dag::Graph;

#[derive(Default)]
struct JsonSink {
    operations: Vec<JsonValue>,
}

impl OperationSink for JsonSink {
    fn emit(&mut self, graph: &Graph, op: &ScheduledOp) {
        let node = &graph[op.node];
        let mut operation = JsonValue::new_object();
        operation["id"] = op.node.index().into();
        operation["op"] = op.op.name().into();
        // constants may not fit in a double
        operation["value"] = node.value().to_string().into();
        operation["width"] = node.bit_width().into();
        operation["cost"] = node.cost().into();
        operation["left"] = op.left.map(|node| node.index()).into();
        operation["right"] = op.right.map(|node| node.index()).into();
        operation["shift"] = op.shift.into();
        operation["stage"] = op.stage.into();
        operation["delay"] = op.delay.into();
        operation["dedicated_adder"] = op.uses_dedicated_adder().into();
        operation["latency"] = op.adder.map(|adder| adder.latency).into();
        self.operations.push(operation);
    }
}

pub fn to_json(mult: &ConstMult) -> JsonValue {
    let mut sink = JsonSink::default();
    mult.emit(&mut sink);

    let schedule = mult.schedule();
    let mut value = JsonValue::new_object();
    value["name"] = mult.name().into();
    value["constant"] = mult.constant().to_string().into();
    value["input_width"] = mult.input_width().into();
    value["result_width"] = mult.result_width().into();
    value["total_cost"] = mult.total_cost().into();
    value["dag_depth"] = mult.dag_depth().into();
    value["stages"] = mult.stages().into();
    value["result_delay"] = schedule.result_delay().into();
    value["result"] = schedule.result().index().into();
    value["operations"] = sink.operations.into();
    value
}

/// Writes the multiplier, its schedule, and its cost report as a single JSON object.
pub fn export(writer: &mut impl io::Write, mult: &ConstMult) -> io::Result<()> {
    to_json(mult).write_pretty(writer, 2)?;
    writeln!(writer)
}
