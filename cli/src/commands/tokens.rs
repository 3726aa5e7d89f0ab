use std::io::Write;

use anyhow::Result;
use vv_parser::{Lexer, LexerConfig};

use super::{read_source, SourceError};

/// Print one token per line as `row:col KIND text`. Tokens without text
/// print only their kind.
pub fn tokens_file(path: &str, config: &LexerConfig, out: &mut dyn Write) -> Result<()> {
    let source = read_source(path)?;
    let mut interner = config.interner();
    let tokens = Lexer::with_config(&source, &mut interner, config)
        .tokenize()
        .map_err(|e| SourceError::new(path, &e))?;

    for token in tokens {
        let position = format!("{}:{}", token.row, token.col);
        match token.value {
            Some(symbol) => writeln!(
                out,
                "{position:<8}{:<12}{}",
                token.kind,
                interner.lookup(symbol)
            )?,
            None => writeln!(out, "{position:<8}{}", token.kind)?,
        }
    }
    Ok(())
}
