use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

use shiftadd_dag::{Graph, NodeRef};

use crate::{booth, Error};

fn is_power_of_two(n: &BigUint) -> bool {
    ((n - 1u32) & n).is_zero()
}

/// Builds a balanced adder tree computing `n * x` from the Booth recoding of `n`.
///
/// Terms are combined pairwise, level by level; an odd term out is carried to the next level.
/// Existing nodes computing the same multiples are reused.
pub fn build_tree(graph: &mut Graph, n: &BigUint) -> Result<NodeRef, Error> {
    if n.is_zero() {
        return Err(Error::ZeroConstant);
    }
    let x = graph.identity();
    if is_power_of_two(n) {
        let position = n.bits() - 1;
        return Ok(graph.shift(x, position as u32)?);
    }

    let recoding = booth::recode(n);
    let global_shift = recoding.global_shift();
    let mut minus_x = None;
    // each term is a node together with its weight relative to the global shift
    let mut level: Vec<(NodeRef, u32)> = Vec::with_capacity(recoding.nonzero);
    for (position, &digit) in recoding.digits.iter().enumerate() {
        let operand = match digit {
            0 => continue,
            1 => x,
            _ => match minus_x {
                Some(node) => node,
                None => {
                    let node = graph.neg(x)?;
                    minus_x = Some(node);
                    node
                }
            },
        };
        level.push((operand, (position - global_shift) as u32));
    }

    while level.len() > 1 {
        let mut next_level = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            match *pair {
                [(low, low_shift), (high, high_shift)] => {
                    let sum = graph.add(high, high_shift - low_shift, low)?;
                    next_level.push((sum, low_shift));
                }
                [single] => next_level.push(single),
                _ => unreachable!(),
            }
        }
        tracing::trace!("tree level reduced from {} to {} terms", level.len(), next_level.len());
        level = next_level;
    }
    let [(root, _)] = level[..] else { unreachable!() };

    if global_shift > 0 {
        Ok(graph.shift(root, global_shift as u32)?)
    } else {
        Ok(root)
    }
}

/// Builds `n * x` for a signed constant; negative constants negate the tree for `|n|`.
pub fn build_constant(graph: &mut Graph, n: &BigInt) -> Result<NodeRef, Error> {
    let root = build_tree(graph, n.magnitude())?;
    match n.sign() {
        Sign::Minus => Ok(graph.neg(root)?),
        _ => Ok(root),
    }
}
