pub mod ast;
pub mod error;
pub mod interner;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{LexError, ParseError};
pub use interner::{CollisionPolicy, Interner, Symbol};
pub use lexer::{Lexer, LexerConfig};
pub use parser::{parse_block, parse_expr, parse_program, parse_program_with, Parser};
pub use token::{Token, TokenKind};
