use clap::{ArgAction, Parser, Subcommand};
use vv_parser::lexer::CHAR_BUFFER_DEFAULT_LEN;
use vv_parser::{CollisionPolicy, LexerConfig};

#[derive(Parser, Debug)]
#[command(name = "vv")]
#[command(about = "vv language front end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Longest accepted lexeme, in bytes
    #[arg(long, global = true, default_value_t = CHAR_BUFFER_DEFAULT_LEN)]
    pub buffer_len: usize,

    /// Compare text on hash matches so colliding names stay distinct
    #[arg(long, global = true)]
    pub strict_interning: bool,

    /// More logging (-v debug, -vv trace). `VV_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn lexer_config(&self) -> LexerConfig {
        LexerConfig {
            buffer_len: self.buffer_len,
            collision: if self.strict_interning {
                CollisionPolicy::Verified
            } else {
                CollisionPolicy::HashOnly
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lex and parse a source file
    Check {
        /// Path to the source file
        path: String,
    },
    /// Print the token stream
    Tokens {
        /// Path to the source file
        path: String,
    },
    /// Print the syntax tree
    Ast {
        /// Path to the source file
        path: String,
        /// Emit JSON instead of the debug tree
        #[arg(long)]
        json: bool,
    },
}
