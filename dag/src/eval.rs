use num_bigint::BigInt;

use crate::{Graph, NodeRef};

impl Graph {
    /// Computes the output of every node when the input operand is `input`.
    ///
    /// This follows the structure of the graph and does not use the cached node values.
    pub fn evaluate(&self, input: &BigInt) -> Vec<BigInt> {
        let mut outputs: Vec<BigInt> = Vec::with_capacity(self.len());
        for (_, node) in self.iter() {
            let output = match node.left() {
                None => input.clone(),
                Some(left) => {
                    let right = node.right().map(|right| &outputs[right.index()]);
                    node.op().apply(&outputs[left.index()], node.shift(), right)
                }
            };
            outputs.push(output);
        }
        outputs
    }

    pub fn evaluate_node(&self, node: NodeRef, input: &BigInt) -> BigInt {
        let mut outputs = self.evaluate(input);
        outputs.swap_remove(node.index())
    }

    pub fn evaluate_result(&self, input: &BigInt) -> Option<BigInt> {
        self.result().map(|result| self.evaluate_node(result, input))
    }
}
