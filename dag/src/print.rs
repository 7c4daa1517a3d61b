use std::fmt::Display;

use crate::{Graph, Node, NodeRef, Op};

impl Graph {
    pub(crate) fn write_node(f: &mut std::fmt::Formatter, node_ref: NodeRef, node: &Node) -> std::fmt::Result {
        write!(f, "{node_ref}:{} = {}", node.bit_width(), node.op())?;
        match (node.op(), node.left(), node.right()) {
            (Op::Identity, _, _) => (),
            (Op::Neg, Some(left), None) => write!(f, " {left}")?,
            (_, Some(left), right) => {
                write!(f, " {left} << {}", node.shift())?;
                if let Some(right) = right {
                    write!(f, ", {right}")?;
                }
            }
            (_, None, _) => unreachable!(),
        }
        Ok(())
    }

    pub fn display_node(&self, node: NodeRef) -> impl Display + '_ {
        struct DisplayNode<'a>(NodeRef, &'a Node);

        impl Display for DisplayNode<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                Graph::write_node(f, self.0, self.1)
            }
        }

        DisplayNode(node, &self[node])
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (node_ref, node) in self.iter() {
            Graph::write_node(f, node_ref, node)?;
            writeln!(f)?;
        }
        if let Some(result) = self.result() {
            writeln!(f, "result {result}")?;
        }
        Ok(())
    }
}
