use bitvec::vec::BitVec;

use crate::{Graph, NodeRef};

/// The set of nodes already seen by one walk over a [`Graph`].
///
/// Each walk acquires its own set, so that walks never observe each other's state.
pub struct Visited {
    bits: BitVec,
}

impl Visited {
    /// Marks `node` as visited; returns `false` if it already was.
    pub fn visit(&mut self, node: NodeRef) -> bool {
        !self.bits.replace(node.index(), true)
    }
}

impl Graph {
    pub fn visited(&self) -> Visited {
        Visited { bits: BitVec::repeat(false, self.len()) }
    }

    /// Returns the nodes reachable from `root`, each once, with operands before their users.
    pub fn reachable(&self, root: NodeRef) -> Vec<NodeRef> {
        let mut visited = self.visited();
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
                continue;
            }
            if !visited.visit(node) {
                continue;
            }
            stack.push((node, true));
            // pushed in reverse, so the left operand is visited first
            let operands: Vec<NodeRef> = self[node].operands().collect();
            stack.extend(operands.into_iter().rev().map(|operand| (operand, false)));
        }
        order
    }

    /// Sum of the costs of the nodes reachable from `root`. Shared nodes are counted once.
    pub fn total_cost(&self, root: NodeRef) -> u64 {
        self.reachable(root).into_iter().map(|node| u64::from(self[node].cost())).sum()
    }

    /// Number of adders on the longest path from the input to `root`.
    pub fn depth(&self, root: NodeRef) -> u32 {
        let mut depths = vec![0u32; self.len()];
        for node in self.reachable(root) {
            let node_data = &self[node];
            let operand_depth = node_data.operands().map(|operand| depths[operand.index()]).max().unwrap_or(0);
            depths[node.index()] = operand_depth + u32::from(node_data.op().is_arithmetic());
        }
        depths[root.index()]
    }
}
