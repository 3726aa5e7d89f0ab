use std::io::Write;

use anyhow::Result;
use serde_json::json;
use vv_parser::{parse_program_with, LexerConfig};

use super::{read_source, SourceError};

/// Print the parsed program. With `json`, the tree is emitted together with
/// the interned strings so symbol handles can be resolved by index.
pub fn ast_file(path: &str, config: &LexerConfig, json: bool, out: &mut dyn Write) -> Result<()> {
    let source = read_source(path)?;
    let (program, interner) =
        parse_program_with(&source, config).map_err(|e| SourceError::new(path, &e))?;

    if json {
        let strings: Vec<&str> = interner.iter().map(|(_, text)| text).collect();
        let doc = json!({
            "program": program,
            "strings": strings,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    } else {
        writeln!(out, "{program:#?}")?;
    }
    Ok(())
}
