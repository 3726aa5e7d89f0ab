/// Token types for the vv lexer.
use std::fmt;

use serde::Serialize;

use crate::ast::Span;
use crate::interner::Symbol;

/// A single token produced by the lexer.
///
/// Identifier, number and string tokens carry the interned handle of their
/// text; every other kind has `value == None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<Symbol>,
    pub row: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, row: usize, col: usize) -> Self {
        debug_assert!(!kind.has_value(), "{kind} token without a value");
        Self {
            kind,
            value: None,
            row,
            col,
        }
    }

    pub fn with_value(kind: TokenKind, value: Symbol, row: usize, col: usize) -> Self {
        debug_assert!(kind.has_value(), "{kind} token cannot carry a value");
        Self {
            kind,
            value: Some(value),
            row,
            col,
        }
    }

    pub fn span(&self) -> Span {
        Span {
            row: self.row,
            col: self.col,
        }
    }
}

/// All token variants recognized by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Eof,

    // Literals and names
    Identifier,
    Number,
    Str,

    // Operators
    Is,
    Colon,
    Semicolon,
    Eq,
    Neq,
    Ge,
    Gt,
    Le,
    Lt,
    Add,
    Minus,
    Mul,
    Div,
    And,
    Or,
    Not,

    // Delimiters
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Money,

    // Keywords
    Def,
    When,
    While,
    Partial,
    Return,
    True,
    False,
    Nil,
}

/// Reserved words, in the order they are matched.
pub const KEYWORDS: [(&str, TokenKind); 8] = [
    ("def", TokenKind::Def),
    ("when", TokenKind::When),
    ("while", TokenKind::While),
    ("partial", TokenKind::Partial),
    ("return", TokenKind::Return),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("nil", TokenKind::Nil),
];

impl TokenKind {
    pub fn keyword(text: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == text)
            .map(|&(_, kind)| kind)
    }

    /// Kinds whose token carries an interned handle.
    pub fn has_value(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::Number | TokenKind::Str)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Str => "STRING",
            TokenKind::Is => ":=",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::Ge => ">=",
            TokenKind::Gt => ">",
            TokenKind::Le => "<=",
            TokenKind::Lt => "<",
            TokenKind::Add => "+",
            TokenKind::Minus => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Money => "$",
            TokenKind::Def => "def",
            TokenKind::When => "when",
            TokenKind::While => "while",
            TokenKind::Partial => "partial",
            TokenKind::Return => "return",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
