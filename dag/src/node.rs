use std::fmt::{Debug, Display};

use num_bigint::{BigInt, Sign};

/// The operation performed by a [`Node`].
///
/// The left operand is always the one that gets shifted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Op {
    /// The input operand itself.
    Identity,
    /// `(left << shift) + right`
    Add,
    /// `(left << shift) - right`
    Sub,
    /// `right - (left << shift)`
    RSub,
    /// `left << shift`
    Shift,
    /// `-left`
    Neg,
}

impl Op {
    pub const ALL: [Op; 6] = [Op::Identity, Op::Add, Op::Sub, Op::RSub, Op::Shift, Op::Neg];

    pub fn is_binary(self) -> bool {
        matches!(self, Op::Add | Op::Sub | Op::RSub)
    }

    /// Returns true if the operation needs a carry chain in hardware.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Op::Add | Op::Sub | Op::RSub | Op::Neg)
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Identity => "x",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::RSub => "rsub",
            Op::Shift => "shift",
            Op::Neg => "neg",
        }
    }

    pub fn from_name(name: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Computes the output of this operation given the outputs of its operands.
    ///
    /// For [`Op::Identity`], `left` is the input operand.
    pub(crate) fn apply(self, left: &BigInt, shift: u32, right: Option<&BigInt>) -> BigInt {
        match (self, right) {
            (Op::Identity, None) => left.clone(),
            (Op::Add, Some(right)) => (left << shift) + right,
            (Op::Sub, Some(right)) => (left << shift) - right,
            (Op::RSub, Some(right)) => right - (left << shift),
            (Op::Shift, None) => left << shift,
            (Op::Neg, None) => -left,
            (op, _) => unreachable!("operands of {op:?} were not validated"),
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A reference to a node within its owning [`Graph`].
///
/// [`Graph`]: crate::Graph
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef {
    pub(crate) index: u32,
}

impl NodeRef {
    pub(crate) fn from_index(index: usize) -> NodeRef {
        assert!(index < u32::MAX as usize);
        NodeRef { index: index as u32 }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "NodeRef({})", self.index)
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "%{}", self.index)
    }
}

/// A single operation of a shift-add graph.
///
/// Nodes are only created by [`Graph::provide`], which keeps `value`, `bit_width` and `cost`
/// consistent with the operands.
///
/// [`Graph::provide`]: crate::Graph::provide
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(crate) op: Op,
    pub(crate) left: Option<NodeRef>,
    pub(crate) right: Option<NodeRef>,
    pub(crate) shift: u32,
    pub(crate) value: BigInt,
    pub(crate) bit_width: u32,
    pub(crate) cost: u32,
}

impl Node {
    pub fn op(&self) -> Op {
        self.op
    }

    pub fn left(&self) -> Option<NodeRef> {
        self.left
    }

    pub fn right(&self) -> Option<NodeRef> {
        self.right
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// The constant this node multiplies the input operand by.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Cost in full adders.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn is_negative(&self) -> bool {
        self.value.sign() == Sign::Minus
    }

    pub fn operands(&self) -> impl Iterator<Item = NodeRef> {
        self.left.into_iter().chain(self.right)
    }

    /// A name derived from the value only, used for emission and debugging.
    pub fn display_name(&self) -> String {
        match self.op {
            Op::Identity => "X".to_string(),
            _ if self.is_negative() => format!("M{}X", self.value.magnitude()),
            _ => format!("P{}X", self.value),
        }
    }
}
