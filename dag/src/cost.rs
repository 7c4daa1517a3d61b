use crate::{Node, Op};

/// Full-adder cost of a new node with the given operands and result width.
///
/// The carry out of the most significant bit is free. An addition whose operands do not overlap
/// is a concatenation and costs nothing.
pub(crate) fn node_cost(op: Op, left: &Node, shift: u32, right: Option<&Node>, bit_width: u32) -> u32 {
    let disjoint = right.is_some_and(|right| shift >= right.bit_width);
    match op {
        Op::Identity | Op::Shift => 0,
        Op::Add if disjoint => 0,
        Op::Add => bit_width.saturating_sub(shift + 1),
        Op::Sub => bit_width.saturating_sub(1),
        // only the shifted operand has to be negated
        Op::RSub if disjoint => left.bit_width.saturating_sub(1),
        Op::RSub => bit_width.saturating_sub(shift + 1),
        Op::Neg => bit_width.saturating_sub(1),
    }
}
