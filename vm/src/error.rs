use diagnostics::{Located, Location};
use memory::MemoryError;
use thiserror::Error;

/// Fatal VM errors. Execution stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Attempt to perform arithmetic on non-numbers")]
    NonNumericOperand { row: usize, col: usize },

    #[error("Attempt to divide with 0")]
    DivideByZero { row: usize, col: usize },

    #[error("Call stack underflow")]
    StackUnderflow { row: usize, col: usize },

    #[error("{error}")]
    Memory {
        error: MemoryError,
        row: usize,
        col: usize,
    },

    #[error("Function {0} does not exist")]
    FunctionNotFound(usize),

    #[error("Address {address} is past the end of function {function}")]
    AddressOutOfRange { function: usize, address: usize },
}

impl Located for RuntimeError {
    fn location(&self) -> Location {
        match *self {
            RuntimeError::NonNumericOperand { row, col }
            | RuntimeError::DivideByZero { row, col }
            | RuntimeError::StackUnderflow { row, col }
            | RuntimeError::Memory { row, col, .. } => Location::at(row, col),
            RuntimeError::FunctionNotFound(_) | RuntimeError::AddressOutOfRange { .. } => {
                Location::Compiler
            }
        }
    }
}
