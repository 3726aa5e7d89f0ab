use std::io::Write;

use anyhow::Result;
use tracing::info;
use vv_parser::{parse_program_with, LexerConfig};

use super::{read_source, SourceError};

/// Lex and parse `path`, printing a one-line summary.
pub fn check_file(path: &str, config: &LexerConfig, out: &mut dyn Write) -> Result<()> {
    let source = read_source(path)?;
    let (program, interner) =
        parse_program_with(&source, config).map_err(|e| SourceError::new(path, &e))?;

    info!(
        path,
        statements = program.stmts.len(),
        interned = interner.len(),
        policy = ?interner.policy(),
        "parsed"
    );
    writeln!(
        out,
        "{path}: ok ({} statements, {} interned)",
        program.stmts.len(),
        interner.len()
    )?;
    Ok(())
}
