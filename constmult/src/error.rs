use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Graph(shiftadd_dag::Error),
    /// Multiplication by zero has no shift-add implementation; the caller must handle it.
    ZeroConstant,
    ZeroDenominator,
    /// The fraction is a dyadic rational and has no repeating pattern.
    FiniteExpansion,
    InvalidPeriodicConstant(&'static str),
    MissingResult,
}

impl From<shiftadd_dag::Error> for Error {
    fn from(error: shiftadd_dag::Error) -> Self {
        Error::Graph(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Graph(error) => write!(f, "{error}"),
            Error::ZeroConstant => write!(f, "cannot build a multiplier by zero"),
            Error::ZeroDenominator => write!(f, "denominator must be strictly positive"),
            Error::FiniteExpansion => {
                write!(f, "this fraction does not have an infinite binary representation")
            }
            Error::InvalidPeriodicConstant(reason) => write!(f, "invalid periodic constant: {reason}"),
            Error::MissingResult => write!(f, "graph has no result"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Graph(error) => Some(error),
            _ => None,
        }
    }
}
