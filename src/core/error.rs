/*!
# Unified Error Type

This module provides the unified error enum used across the library.
Three kinds of failures surface to callers: `Invariant` for caller-visible
precondition violations, `Infeasible` when a flow problem has no solution,
and `NegativeCycle` where an algorithm requires acyclic negativity.
The remaining variants cover the heap primitive and the I/O adaptors.

Note that the generalized Dijkstra never reports a negative cycle through
this type; the cycle is a normal result carried by `cycle_found` on
[`ShortestPathTree`](crate::core::paths::ShortestPathTree).
*/

use std::error::Error as StdError;
use std::fmt;

/// Convenient alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all arista operations.
#[derive(Debug)]
pub enum Error {
    /// A caller-visible precondition was violated (missing vertex, odd
    /// degree, parallel arc, negative capacity, ...).
    Invariant(String),

    /// The flow problem has no feasible solution.
    Infeasible(String),

    /// A negative cycle was detected where the algorithm requires none.
    NegativeCycle(String),

    /// `top`/`delete_top` was called on an empty heap.
    EmptyHeap,

    /// I/O error while reading or writing files.
    Io(String),

    /// Malformed input document.
    Serialization(String),

    /// Invalid driver argument.
    InvalidArgument(String),
}

impl Error {
    /// Creates an invariant-violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::Invariant(message.into())
    }

    /// Creates an infeasibility error.
    pub fn infeasible(message: impl Into<String>) -> Self {
        Error::Infeasible(message.into())
    }

    /// Creates a negative-cycle error.
    pub fn negative_cycle(message: impl Into<String>) -> Self {
        Error::NegativeCycle(message.into())
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Invariant(msg) => write!(f, "Invariant violated: {}", msg),
            Error::Infeasible(msg) => write!(f, "No feasible solution: {}", msg),
            Error::NegativeCycle(msg) => write!(f, "Negative cycle: {}", msg),
            Error::EmptyHeap => write!(f, "The heap is empty"),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl StdError for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invariant("vertex b has odd degree");
        assert_eq!(
            format!("{}", err),
            "Invariant violated: vertex b has odd degree"
        );

        let err = Error::infeasible("arc restrictions cannot be satisfied");
        assert_eq!(
            format!("{}", err),
            "No feasible solution: arc restrictions cannot be satisfied"
        );

        assert_eq!(format!("{}", Error::EmptyHeap), "The heap is empty");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
