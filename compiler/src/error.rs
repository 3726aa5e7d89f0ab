use diagnostics::{Located, Location};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Too many nested function scopes.
    #[error("Stack overflowed")]
    StackOverflow,

    #[error("No instruction at address {0}")]
    PatchOutOfRange(usize),
}

impl Located for CompileError {
    fn location(&self) -> Location {
        Location::Compiler
    }
}
