use std::collections::HashMap;
use std::ops::Index;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::{cost, Error, Node, NodeRef, Op};

/// An arena of shift-add operations computing multiples of an input operand.
///
/// The node at index 0 is the input operand itself. Nodes are never removed or modified once
/// created, and each node only refers to nodes created before it.
#[derive(Clone, Debug)]
pub struct Graph {
    input_width: u32,
    max_input: BigUint,
    nodes: Vec<Node>,
    index: HashMap<BigInt, NodeRef>,
    result: Option<NodeRef>,
}

impl Graph {
    pub fn new(input_width: u32) -> Result<Graph, Error> {
        if input_width == 0 {
            return Err(Error::ZeroInputWidth);
        }
        let identity = Node {
            op: Op::Identity,
            left: None,
            right: None,
            shift: 0,
            value: BigInt::one(),
            bit_width: input_width,
            cost: 0,
        };
        let identity_ref = NodeRef::from_index(0);
        Ok(Graph {
            input_width,
            max_input: (BigUint::one() << input_width) - 1u32,
            nodes: vec![identity],
            index: HashMap::from([(BigInt::one(), identity_ref)]),
            result: None,
        })
    }

    pub fn input_width(&self) -> u32 {
        self.input_width
    }

    pub fn identity(&self) -> NodeRef {
        NodeRef::from_index(0)
    }

    pub fn result(&self) -> Option<NodeRef> {
        self.result
    }

    pub fn set_result(&mut self, node: NodeRef) {
        assert!(node.index() < self.nodes.len(), "{node} does not belong to this graph");
        self.result = Some(node);
    }

    /// Width of the output of the result node, or `None` if no result was declared.
    pub fn result_width(&self) -> Option<u32> {
        self.result.map(|node| self[node].bit_width)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, node: NodeRef) -> Option<&Node> {
        self.nodes.get(node.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &Node)> {
        self.nodes.iter().enumerate().map(|(index, node)| (NodeRef::from_index(index), node))
    }

    /// Finds the node computing `value` times the input, if there is one.
    pub fn find(&self, value: &BigInt) -> Option<NodeRef> {
        self.index.get(value).copied()
    }

    /// Returns the node computing the result of the requested operation.
    ///
    /// If a node with the same value already exists it is returned as is, even if it was built
    /// from different operands; otherwise a new node is appended.
    pub fn provide(
        &mut self,
        op: Op,
        left: Option<NodeRef>,
        shift: u32,
        right: Option<NodeRef>,
    ) -> Result<NodeRef, Error> {
        self.check_request(op, left, shift, right)?;
        let (Some(left), right) = (left, right) else { unreachable!() };
        let value = op.apply(&self[left].value, shift, right.map(|node| &self[node].value));
        if let Some(&existing) = self.index.get(&value) {
            if cfg!(feature = "trace") {
                eprintln!(">reuse {existing} for {op} {left} << {shift}");
            }
            tracing::trace!("reusing {existing} for value {value}");
            return Ok(existing);
        }
        let bit_width = self.width_for(&value);
        let cost = cost::node_cost(op, &self[left], shift, right.map(|node| &self[node]), bit_width);
        let node_ref = NodeRef::from_index(self.nodes.len());
        tracing::trace!("{node_ref}:{bit_width} = {op} {left} << {shift} (value {value}, cost {cost})");
        self.nodes.push(Node { op, left: Some(left), right, shift, value: value.clone(), bit_width, cost });
        self.index.insert(value, node_ref);
        Ok(node_ref)
    }

    pub fn add(&mut self, left: NodeRef, shift: u32, right: NodeRef) -> Result<NodeRef, Error> {
        self.provide(Op::Add, Some(left), shift, Some(right))
    }

    pub fn sub(&mut self, left: NodeRef, shift: u32, right: NodeRef) -> Result<NodeRef, Error> {
        self.provide(Op::Sub, Some(left), shift, Some(right))
    }

    pub fn rsub(&mut self, left: NodeRef, shift: u32, right: NodeRef) -> Result<NodeRef, Error> {
        self.provide(Op::RSub, Some(left), shift, Some(right))
    }

    pub fn shift(&mut self, node: NodeRef, shift: u32) -> Result<NodeRef, Error> {
        self.provide(Op::Shift, Some(node), shift, None)
    }

    pub fn neg(&mut self, node: NodeRef) -> Result<NodeRef, Error> {
        self.provide(Op::Neg, Some(node), 0, None)
    }

    fn check_request(&self, op: Op, left: Option<NodeRef>, shift: u32, right: Option<NodeRef>) -> Result<(), Error> {
        let malformed = |message: String| Err(Error::MalformedNodeRequest(message));
        for operand in left.into_iter().chain(right) {
            if operand.index() >= self.nodes.len() {
                return malformed(format!("{op} refers to {operand}, which does not belong to this graph"));
            }
        }
        if op == Op::Identity {
            return malformed("the identity node is created with the graph".into());
        }
        if op.is_binary() {
            if left.is_none() || right.is_none() {
                return malformed(format!("{op} requires two operands"));
            }
            if shift == 0 && op != Op::Add {
                return Err(Error::UnsupportedZeroShiftSubtraction(op));
            }
            return Ok(());
        }
        if left.is_none() || right.is_some() {
            return malformed(format!("{op} requires exactly one operand"));
        }
        if op == Op::Neg && shift != 0 {
            return malformed("neg does not take a shift amount".into());
        }
        Ok(())
    }

    /// Number of bits needed to hold `value` times any input, including a sign bit for negative
    /// values.
    fn width_for(&self, value: &BigInt) -> u32 {
        if value.is_zero() {
            return 1;
        }
        let magnitude = value.magnitude() * &self.max_input;
        let sign = if value.sign() == Sign::Minus { 1 } else { 0 };
        magnitude.bits() as u32 + sign
    }
}

impl Index<NodeRef> for Graph {
    type Output = Node;

    fn index(&self, node: NodeRef) -> &Node {
        &self.nodes[node.index()]
    }
}
