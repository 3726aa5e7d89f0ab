/// Single-pass lazy lexer for vv source code.
///
/// Identifier, number and string lexemes are interned as they are produced;
/// string literals are stored with a leading `$` so they never share an entry
/// with an identifier of the same spelling.
use tracing::trace;

use crate::error::LexError;
use crate::interner::{CollisionPolicy, Interner};
use crate::token::{Token, TokenKind};

/// Default capacity of the token-text buffer, in bytes.
pub const CHAR_BUFFER_DEFAULT_LEN: usize = 31;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerConfig {
    /// Longest lexeme accepted, including the `$` prefix of strings.
    pub buffer_len: usize,
    /// Policy for the interner created by [`LexerConfig::interner`].
    pub collision: CollisionPolicy,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            buffer_len: CHAR_BUFFER_DEFAULT_LEN,
            collision: CollisionPolicy::default(),
        }
    }
}

impl LexerConfig {
    pub fn interner(&self) -> Interner {
        Interner::with_policy(self.collision)
    }
}

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    row: usize,
    col: usize,
    buffer: Vec<u8>,
    buffer_len: usize,
    interner: &'a mut Interner,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Self::with_config(source, interner, &LexerConfig::default())
    }

    pub fn with_config(source: &'a str, interner: &'a mut Interner, config: &LexerConfig) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            row: 1,
            col: 1,
            buffer: Vec::with_capacity(config.buffer_len),
            buffer_len: config.buffer_len,
            interner,
            finished: false,
        }
    }

    /// Lex the whole input, including the trailing `Eof` token.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    pub fn interner(&self) -> &Interner {
        self.interner
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.source.get(self.pos + 1).copied()
    }

    /// Consume one character. A CR LF or LF CR pair is one newline.
    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        if ch == b'\r' || ch == b'\n' {
            self.row += 1;
            self.col = 1;
            if matches!(self.peek2(), Some(next @ (b'\r' | b'\n')) if next != ch) {
                self.pos += 1;
            }
        } else {
            self.col += 1;
        }
        self.pos += 1;
        Some(ch)
    }

    fn write(&mut self, ch: u8) -> Result<(), LexError> {
        if self.buffer.len() >= self.buffer_len {
            return Err(LexError::TooLong {
                row: self.row,
                col: self.col,
            });
        }
        self.buffer.push(ch);
        Ok(())
    }

    fn take_buffer(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        text
    }

    fn save(&mut self, kind: TokenKind, row: usize, col: usize) -> Token {
        let text = self.take_buffer();
        let symbol = self.interner.intern(text);
        Token::with_value(kind, symbol, row, col)
    }

    fn single(&mut self, kind: TokenKind, row: usize, col: usize) -> Token {
        self.advance();
        Token::new(kind, row, col)
    }

    /// `first` alone, or `second` when followed by `=`.
    fn single_or_eq(&mut self, first: TokenKind, second: TokenKind, row: usize, col: usize) -> Token {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            return Token::new(second, row, col);
        }
        Token::new(first, row, col)
    }

    /// Both characters are mandatory.
    fn pair(&mut self, ch: u8, kind: TokenKind, row: usize, col: usize) -> Result<Token, LexError> {
        if self.peek2() != Some(ch) {
            return Err(LexError::ExpectedCharacter {
                expected: ch as char,
                row,
                col: col + 1,
            });
        }
        self.advance();
        self.advance();
        Ok(Token::new(kind, row, col))
    }

    fn skip_comment(&mut self) -> Result<(), LexError> {
        self.advance();
        if self.peek() == Some(b'#') {
            self.advance();
            loop {
                match self.peek() {
                    None => return Err(LexError::UnterminatedComment),
                    Some(b'#') if self.peek2() == Some(b'#') => {
                        self.advance();
                        self.advance();
                        return Ok(());
                    }
                    Some(_) => {
                        self.advance();
                    }
                }
            }
        }
        while let Some(ch) = self.peek() {
            if ch == b'\r' || ch == b'\n' {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let token = self.scan()?;
        trace!(kind = %token.kind, row = token.row, col = token.col, "token");
        Ok(token)
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        loop {
            let (row, col) = (self.row, self.col);

            let Some(ch) = self.peek() else {
                return Ok(Token::new(TokenKind::Eof, row, col));
            };

            return match ch {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.advance();
                    continue;
                }
                b'#' => {
                    self.skip_comment()?;
                    continue;
                }
                b'\'' | b'"' => self.lex_string(),
                b'0'..=b'9' => self.lex_number(),
                b'$' => Ok(self.single(TokenKind::Money, row, col)),
                b'+' => Ok(self.single(TokenKind::Add, row, col)),
                b'-' => Ok(self.single(TokenKind::Minus, row, col)),
                b'*' => Ok(self.single(TokenKind::Mul, row, col)),
                b'/' => Ok(self.single(TokenKind::Div, row, col)),
                b';' => Ok(self.single(TokenKind::Semicolon, row, col)),
                b',' => Ok(self.single(TokenKind::Comma, row, col)),
                b'(' => Ok(self.single(TokenKind::LParen, row, col)),
                b')' => Ok(self.single(TokenKind::RParen, row, col)),
                b'[' => Ok(self.single(TokenKind::LBracket, row, col)),
                b']' => Ok(self.single(TokenKind::RBracket, row, col)),
                b'{' => Ok(self.single(TokenKind::LBrace, row, col)),
                b'}' => Ok(self.single(TokenKind::RBrace, row, col)),
                b':' => Ok(self.single_or_eq(TokenKind::Colon, TokenKind::Is, row, col)),
                b'!' => Ok(self.single_or_eq(TokenKind::Not, TokenKind::Neq, row, col)),
                b'>' => Ok(self.single_or_eq(TokenKind::Gt, TokenKind::Ge, row, col)),
                b'<' => Ok(self.single_or_eq(TokenKind::Lt, TokenKind::Le, row, col)),
                b'=' => {
                    if self.peek2() == Some(b'=') {
                        self.advance();
                        self.advance();
                        Ok(Token::new(TokenKind::Eq, row, col))
                    } else {
                        Err(LexError::UnexpectedCharacter { ch: '=', row, col })
                    }
                }
                b'&' => self.pair(b'&', TokenKind::And, row, col),
                b'|' => self.pair(b'|', TokenKind::Or, row, col),
                _ => self.lex_alpha(),
            };
        }
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        let (row, col) = (self.row, self.col);
        let quote = self.advance().unwrap_or(b'"');
        self.write(b'$')?;

        loop {
            match self.peek() {
                None => {
                    self.buffer.clear();
                    return Err(LexError::UnterminatedString {
                        quote: quote as char,
                    });
                }
                Some(ch) if ch == quote => break,
                Some(b'\r' | b'\n') => {
                    return Err(LexError::NewlineInString {
                        row: self.row,
                        col: self.col.saturating_sub(1),
                    });
                }
                Some(ch) => {
                    self.write(ch)?;
                    self.advance();
                }
            }
        }

        self.advance();
        Ok(self.save(TokenKind::Str, row, col))
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let (row, col) = (self.row, self.col);
        let mut seen_point = false;

        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphanumeric() || ch == b'.' || ch == b'_') {
                break;
            }
            if ch == b'.' {
                if seen_point {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '.',
                        row: self.row,
                        col: self.col,
                    });
                }
                seen_point = true;
            }
            if ch != b'_' {
                self.write(ch)?;
            }
            self.advance();
        }

        Ok(self.save(TokenKind::Number, row, col))
    }

    fn lex_alpha(&mut self) -> Result<Token, LexError> {
        let (row, col) = (self.row, self.col);
        match self.peek() {
            Some(ch) if ch.is_ascii_alphabetic() => {}
            other => {
                let ch = self.current_char(other);
                return Err(LexError::UnexpectedCharacter { ch, row, col });
            }
        }

        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphabetic() || ch == b'_') {
                break;
            }
            self.write(ch)?;
            self.advance();
        }

        // Keywords are matched before interning and never enter the table.
        let keyword = std::str::from_utf8(&self.buffer)
            .ok()
            .and_then(TokenKind::keyword);
        if let Some(kind) = keyword {
            self.buffer.clear();
            return Ok(Token::new(kind, row, col));
        }
        Ok(self.save(TokenKind::Identifier, row, col))
    }

    /// Full character at the cursor, for error messages.
    fn current_char(&self, byte: Option<u8>) -> char {
        let rest = &self.source[self.pos.min(self.source.len())..];
        std::str::from_utf8(rest)
            .ok()
            .and_then(|s| s.chars().next())
            .or_else(|| byte.map(char::from))
            .unwrap_or('\0')
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    /// Yields every token up to and including `Eof`, or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_token();
        self.finished = !matches!(&item, Ok(t) if t.kind != TokenKind::Eof);
        Some(item)
    }
}
