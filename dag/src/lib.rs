//! This library provides the in-memory form of a shift-add graph.
//!
//! A [`Graph`] is an arena of [`Node`]s identified by a contiguous range of indices. Each node
//! computes the input operand multiplied by a constant, using only shifts, additions, subtractions
//! and negations of nodes with a smaller index. The graph never holds two nodes computing the same
//! constant: every request goes through a lookup by value, which turns the arena into a DAG with
//! shared subexpressions rather than a tree.

mod node;
mod graph;
mod cost;
mod traverse;
mod eval;
mod error;
mod print;
mod parse;
mod isomorphic;

pub use node::{Op, NodeRef, Node};
pub use graph::Graph;
pub use traverse::Visited;
pub use error::Error;
pub use parse::ParseError;
pub use isomorphic::{isomorphic, NotIsomorphic};
