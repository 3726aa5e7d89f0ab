/// Owned AST types for the vv language.
///
/// Every node owns its children; statement, parameter and argument lists are
/// plain `Vec`s in source order. Names and literals stay as tokens so their
/// interned handle and position travel together.
use serde::Serialize;

use crate::token::{Token, TokenKind};

/// Source location for error reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub row: usize,
    pub col: usize,
}

/// A complete program: a sequence of statements.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// A braced block of statements. `span` is the opening brace.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement variants.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Stmt {
    /// `name := value`
    Assign {
        target: Token,
        value: Expr,
        span: Span,
    },
    /// `def name [: partial] := value`
    Def {
        name: Token,
        partial: bool,
        value: Expr,
        span: Span,
    },
    /// `when cond { .. } [: { .. }]`
    When {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Block,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Call(Call),
    Block(Block),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign { span, .. }
            | Stmt::Def { span, .. }
            | Stmt::When { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Return { span, .. } => *span,
            Stmt::Call(call) => call.span,
            Stmt::Block(block) => block.span,
        }
    }
}

/// `$(callee arg, arg, ...)`. `span` is the `$`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Call {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Expr {
    /// Identifier, number, string, `true`, `false` or `nil`.
    Literal(Token),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    /// `span` is the operator token.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `[: a, b, : { .. }]`
    Func {
        params: Vec<Token>,
        body: Block,
        span: Span,
    },
    Call(Call),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(token) => token.span(),
            Expr::Unary { span, .. } | Expr::Binary { span, .. } | Expr::Func { span, .. } => *span,
            Expr::Call(call) => call.span,
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    /// Binds tighter than every binary operator.
    pub const PRIORITY: u8 = 20;

    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Mul,
    Div,
    Add,
    Sub,
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Neq,
    And,
    Or,
}

impl BinOp {
    pub fn from_token(kind: TokenKind) -> Option<BinOp> {
        Some(match kind {
            TokenKind::Mul => BinOp::Mul,
            TokenKind::Div => BinOp::Div,
            TokenKind::Add => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Ge => BinOp::Ge,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Eq => BinOp::Eq,
            TokenKind::Neq => BinOp::Neq,
            TokenKind::And => BinOp::And,
            TokenKind::Or => BinOp::Or,
            _ => return None,
        })
    }

    /// Higher binds tighter.
    pub fn priority(self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div => 10,
            BinOp::Add | BinOp::Sub => 9,
            BinOp::Ge | BinOp::Gt | BinOp::Le | BinOp::Lt => 8,
            BinOp::Eq | BinOp::Neq => 7,
            BinOp::And => 6,
            BinOp::Or => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Ge => ">=",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Lt => "<",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}
