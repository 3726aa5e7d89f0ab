pub mod ast;
pub mod check;
pub mod tokens;

use std::fs;

use anyhow::{Context, Result};
use diagnostics::{Diagnostic, Located};
use thiserror::Error;

/// A lex or parse failure tied to the file it came from. `main` renders it
/// through [`diagnostics::abort`].
#[derive(Debug, Error)]
#[error("{}", diagnostic.render(file))]
pub struct SourceError {
    pub file: String,
    pub diagnostic: Diagnostic,
}

impl SourceError {
    pub fn new(file: &str, err: &impl Located) -> Self {
        Self {
            file: file.to_string(),
            diagnostic: err.to_diagnostic(),
        }
    }
}

pub(crate) fn read_source(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read source file {path}"))
}
