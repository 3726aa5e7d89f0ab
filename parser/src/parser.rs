/// Recursive descent parser for vv with operator-stack expression parsing.
///
/// Tokens are pulled lazily from the [`Lexer`] one at a time; `current` holds
/// the single token of lookahead.
use tracing::debug;

use crate::ast::*;
use crate::error::ParseError;
use crate::interner::Interner;
use crate::lexer::{Lexer, LexerConfig};
use crate::token::{Token, TokenKind};

/// Capacity of the deferred-operator stack used by [`Parser::parse_expr`].
pub const OPERATOR_STACK_LEN: usize = 10;

/// Parse a complete source string into a [`Program`].
///
/// ```
/// use vv_parser::parse_program;
///
/// let (prog, table) = parse_program("x := 1 + 2").unwrap();
/// assert_eq!(prog.stmts.len(), 1);
/// assert_eq!(table.len(), 3);
/// ```
pub fn parse_program(source: &str) -> Result<(Program, Interner), ParseError> {
    parse_program_with(source, &LexerConfig::default())
}

pub fn parse_program_with(
    source: &str,
    config: &LexerConfig,
) -> Result<(Program, Interner), ParseError> {
    with_parser(source, config, |p| p.parse_program())
}

/// Parse a single braced block. Nothing may follow the closing brace.
///
/// ```
/// use vv_parser::parse_block;
///
/// let (block, _) = parse_block("{ a := 1; b := 2 }").unwrap();
/// assert_eq!(block.stmts.len(), 2);
/// ```
pub fn parse_block(source: &str) -> Result<(Block, Interner), ParseError> {
    with_parser(source, &LexerConfig::default(), |p| {
        let block = p.parse_block()?;
        p.expect(TokenKind::Eof)?;
        Ok(block)
    })
}

/// Parse a single expression. Nothing may follow it.
pub fn parse_expr(source: &str) -> Result<(Expr, Interner), ParseError> {
    with_parser(source, &LexerConfig::default(), |p| {
        let expr = p.parse_expr()?;
        p.expect(TokenKind::Eof)?;
        Ok(expr)
    })
}

fn with_parser<T>(
    source: &str,
    config: &LexerConfig,
    f: impl FnOnce(&mut Parser<'_>) -> Result<T, ParseError>,
) -> Result<(T, Interner), ParseError> {
    let mut interner = config.interner();
    let node = {
        let mut parser = Parser::new(Lexer::with_config(source, &mut interner, config));
        f(&mut parser)?
    };
    Ok((node, interner))
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: None,
        }
    }

    pub fn interner(&self) -> &Interner {
        self.lexer.interner()
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn peek(&mut self) -> Result<Token, ParseError> {
        match self.current {
            Some(token) => Ok(token),
            None => {
                let token = self.lexer.next_token()?;
                self.current = Some(token);
                Ok(token)
            }
        }
    }

    fn at(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.peek()?.kind == kind)
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.peek()?;
        if token.kind != TokenKind::Eof {
            self.current = None;
        }
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.peek()?;
        if token.kind == kind {
            return self.advance();
        }
        Err(ParseError::expected(
            format!("\"{kind}\""),
            token.kind,
            token.row,
            token.col,
        ))
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.at(kind)? {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn can_start_expr(&mut self) -> Result<bool, ParseError> {
        Ok(matches!(
            self.peek()?.kind,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::Str
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Money
                | TokenKind::Not
                | TokenKind::Minus
        ))
    }

    // ========================================================================
    // Program / Block
    // ========================================================================

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon)? {}
            if self.at(TokenKind::Eof)? {
                break;
            }
            stmts.push(self.parse_stmt()?);
        }
        debug!(stmts = stmts.len(), interned = self.interner().len(), "parsed program");
        Ok(Program { stmts })
    }

    pub fn parse_block(&mut self) -> Result<Block, ParseError> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            match self.peek()?.kind {
                TokenKind::RBrace | TokenKind::Eof => break,
                _ => stmts.push(self.parse_stmt()?),
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: open.span(),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Identifier => self.parse_assign(),
            TokenKind::Def => self.parse_def(),
            TokenKind::When => self.parse_when(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Money => Ok(Stmt::Call(self.parse_call()?)),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => Err(ParseError::Unrecognised {
                row: token.row,
                col: token.col,
            }),
        }
    }

    fn parse_assign(&mut self) -> Result<Stmt, ParseError> {
        let target = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Is)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign {
            target,
            value,
            span: target.span(),
        })
    }

    fn parse_def(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect(TokenKind::Def)?;
        let name = self.expect(TokenKind::Identifier)?;
        let partial = if self.eat(TokenKind::Colon)? {
            self.expect(TokenKind::Partial)?;
            true
        } else {
            false
        };
        self.expect(TokenKind::Is)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Def {
            name,
            partial,
            value,
            span: keyword.span(),
        })
    }

    fn parse_when(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect(TokenKind::When)?;
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(TokenKind::Colon)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::When {
            condition,
            then_block,
            else_block,
            span: keyword.span(),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect(TokenKind::While)?;
        let condition = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While {
            condition,
            body,
            span: keyword.span(),
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect(TokenKind::Return)?;
        let value = if self.can_start_expr()? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Stmt::Return {
            value,
            span: keyword.span(),
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Binary expression over unary operands.
    ///
    /// Pending left operands wait on a bounded stack together with their
    /// operator. Before an operator is pushed, every stacked operator of
    /// higher or equal priority is folded into the running right operand,
    /// which yields left-associative trees.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut pending: Vec<(Expr, BinOp, Span)> = Vec::with_capacity(OPERATOR_STACK_LEN);
        let mut rhs = self.parse_unary()?;

        while let Some(op) = BinOp::from_token(self.peek()?.kind) {
            let token = self.advance()?;

            while pending
                .last()
                .is_some_and(|(_, top, _)| top.priority() >= op.priority())
            {
                if let Some((lhs, top, span)) = pending.pop() {
                    rhs = Expr::binary(top, lhs, rhs, span);
                }
            }

            if pending.len() == OPERATOR_STACK_LEN {
                return Err(ParseError::OperatorOverflow {
                    row: token.row,
                    col: token.col,
                });
            }
            pending.push((rhs, op, token.span()));
            rhs = self.parse_unary()?;
        }

        while let Some((lhs, top, span)) = pending.pop() {
            rhs = Expr::binary(top, lhs, rhs, span);
        }
        Ok(rhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek()?;
        if let Some(op) = UnaryOp::from_token(token.kind) {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span: token.span(),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::Str
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil => Ok(Expr::Literal(self.advance()?)),
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_func(),
            TokenKind::Money => Ok(Expr::Call(self.parse_call()?)),
            TokenKind::Eof => Err(ParseError::expected(
                "expression",
                token.kind,
                token.row,
                token.col,
            )),
            _ => Err(ParseError::Unrecognised {
                row: token.row,
                col: token.col,
            }),
        }
    }

    /// `[: a, b, : { .. }]`
    fn parse_func(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect(TokenKind::LBracket)?;
        self.expect(TokenKind::Colon)?;
        let mut params = Vec::new();
        while self.at(TokenKind::Identifier)? {
            params.push(self.advance()?);
            self.expect(TokenKind::Comma)?;
        }
        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::Func {
            params,
            body,
            span: open.span(),
        })
    }

    /// `$(callee a, b)`. Arguments are comma separated; a trailing comma is
    /// allowed.
    fn parse_call(&mut self) -> Result<Call, ParseError> {
        let money = self.expect(TokenKind::Money)?;
        self.expect(TokenKind::LParen)?;
        let callee = self.parse_expr()?;
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen)? {
            let token = self.peek()?;
            if token.kind == TokenKind::Eof {
                return Err(ParseError::expected(
                    format!("\"{}\"", TokenKind::RParen),
                    token.kind,
                    token.row,
                    token.col,
                ));
            }
            args.push(self.parse_expr()?);
            if !self.at(TokenKind::RParen)? {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Call {
            callee: Box::new(callee),
            args,
            span: money.span(),
        })
    }
}
