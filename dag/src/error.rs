use std::fmt::Display;

use crate::Op;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ZeroInputWidth,
    MalformedNodeRequest(String),
    /// Subtractions of unshifted operands are not implemented by the emitter.
    UnsupportedZeroShiftSubtraction(Op),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroInputWidth => write!(f, "input operand must be at least one bit wide"),
            Error::MalformedNodeRequest(message) => write!(f, "malformed node request: {message}"),
            Error::UnsupportedZeroShiftSubtraction(op) => {
                write!(f, "{op} with zero shift is currently unimplemented")
            }
        }
    }
}

impl std::error::Error for Error {}
