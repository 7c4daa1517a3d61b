use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use crate::{Graph, NodeRef};

#[derive(Debug)]
pub enum NotIsomorphic {
    InputWidth(u32, u32),
    NoResult,
    ResultMismatch,
    NodeMismatch(NodeRef, NodeRef),
}

impl Display for NotIsomorphic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NotIsomorphic::InputWidth(lft, rgt) => write!(f, "input width mismatch: {lft} != {rgt}"),
            NotIsomorphic::NoResult => write!(f, "one of the graphs has no result"),
            NotIsomorphic::ResultMismatch => write!(f, "results compute different constants"),
            NotIsomorphic::NodeMismatch(lft, rgt) => write!(f, "node mismatch: {lft} != {rgt}"),
        }
    }
}

impl std::error::Error for NotIsomorphic {}

/// Checks that the parts of both graphs reachable from their results have the same structure.
///
/// Nodes that do not contribute to the result are ignored.
pub fn isomorphic(lft: &Graph, rgt: &Graph) -> Result<(), NotIsomorphic> {
    if lft.input_width() != rgt.input_width() {
        return Err(NotIsomorphic::InputWidth(lft.input_width(), rgt.input_width()));
    }
    let (Some(lft_result), Some(rgt_result)) = (lft.result(), rgt.result()) else {
        if lft.result().is_none() && rgt.result().is_none() {
            return Ok(());
        }
        return Err(NotIsomorphic::NoResult);
    };
    if lft[lft_result].value() != rgt[rgt_result].value() {
        return Err(NotIsomorphic::ResultMismatch);
    }
    let mut map_lft_rgt: HashMap<NodeRef, NodeRef> = HashMap::new();
    let mut map_rgt_lft: HashSet<NodeRef> = HashSet::new();
    let mut queue = vec![(lft_result, rgt_result)];
    while let Some((lft_node, rgt_node)) = queue.pop() {
        if let Some(&mapped) = map_lft_rgt.get(&lft_node) {
            if mapped != rgt_node {
                return Err(NotIsomorphic::NodeMismatch(lft_node, rgt_node));
            }
            continue;
        }
        if !map_rgt_lft.insert(rgt_node) {
            return Err(NotIsomorphic::NodeMismatch(lft_node, rgt_node));
        }
        map_lft_rgt.insert(lft_node, rgt_node);
        let (lft_data, rgt_data) = (&lft[lft_node], &rgt[rgt_node]);
        if lft_data.op() != rgt_data.op() || lft_data.shift() != rgt_data.shift() {
            return Err(NotIsomorphic::NodeMismatch(lft_node, rgt_node));
        }
        match ((lft_data.left(), rgt_data.left()), (lft_data.right(), rgt_data.right())) {
            ((None, None), (None, None)) => (),
            ((Some(lft_left), Some(rgt_left)), (None, None)) => queue.push((lft_left, rgt_left)),
            ((Some(lft_left), Some(rgt_left)), (Some(lft_right), Some(rgt_right))) => {
                queue.push((lft_left, rgt_left));
                queue.push((lft_right, rgt_right));
            }
            _ => return Err(NotIsomorphic::NodeMismatch(lft_node, rgt_node)),
        }
    }
    Ok(())
}

#[macro_export]
macro_rules! assert_isomorphic {
    ( $lft:expr, $rgt:expr ) => {{
        let lft = &$lft;
        let rgt = &$rgt;
        if let Err(error) = $crate::isomorphic(lft, rgt) {
            panic!("{}\nleft graph:\n{}\nright graph:\n{}", error, lft, rgt);
        }
    }};
}
