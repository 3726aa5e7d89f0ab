//! Lowers a parsed expression to straight-line VM code for tests.
//!
//! Every node gets its own memory slot, numbered from 0. Literal slots are
//! returned as seeds to be written into memory before running.

#![allow(dead_code)]

use memory::Value;
use vm::{Instruction, OpCode, VM};
use vv_parser::ast::{BinOp, Expr, UnaryOp};
use vv_parser::{parse_expr, Interner, TokenKind};

pub struct Lowered {
    pub code: Vec<Instruction>,
    pub seeds: Vec<(usize, Value)>,
    pub result: usize,
}

pub fn binop(op: BinOp) -> OpCode {
    match op {
        BinOp::Mul => OpCode::Mul,
        BinOp::Div => OpCode::Div,
        BinOp::Add => OpCode::Add,
        BinOp::Sub => OpCode::Sub,
        BinOp::Ge => OpCode::Ge,
        BinOp::Gt => OpCode::Gt,
        BinOp::Le => OpCode::Le,
        BinOp::Lt => OpCode::Lt,
        BinOp::Eq => OpCode::Eq,
        BinOp::Neq => OpCode::Neq,
        BinOp::And => OpCode::And,
        BinOp::Or => OpCode::Or,
    }
}

struct Lowering<'t> {
    table: &'t Interner,
    code: Vec<Instruction>,
    seeds: Vec<(usize, Value)>,
    next: usize,
}

impl Lowering<'_> {
    fn slot(&mut self) -> usize {
        self.next += 1;
        self.next - 1
    }

    fn lower(&mut self, expr: &Expr) -> usize {
        match expr {
            Expr::Literal(token) => {
                let value = match token.kind {
                    TokenKind::Number => {
                        let text = self.table.lookup(token.value.unwrap());
                        Value::number(text.parse().unwrap())
                    }
                    TokenKind::True => Value::bool(true),
                    TokenKind::False => Value::bool(false),
                    TokenKind::Nil => Value::nil(),
                    TokenKind::Str => Value::string(token.value.unwrap().index() as u32),
                    other => panic!("cannot lower literal {other}"),
                };
                let slot = self.slot();
                self.seeds.push((slot, value));
                slot
            }
            Expr::Unary { op, operand, span } => {
                let src = self.lower(operand);
                let dst = self.slot();
                let code = match op {
                    UnaryOp::Neg => OpCode::Inv,
                    UnaryOp::Not => OpCode::Not,
                };
                self.code
                    .push(Instruction::new(code, dst, src, 0).at(span.row, span.col));
                dst
            }
            Expr::Binary { op, lhs, rhs, span } => {
                let l = self.lower(lhs);
                let r = self.lower(rhs);
                let dst = self.slot();
                self.code
                    .push(Instruction::new(binop(*op), dst, l, r).at(span.row, span.col));
                dst
            }
            other => panic!("cannot lower {other:?}"),
        }
    }
}

/// Lower `source` and terminate the code with `HALT`.
pub fn lower(source: &str) -> Lowered {
    let (expr, table) = parse_expr(source).unwrap();
    let mut lowering = Lowering {
        table: &table,
        code: Vec::new(),
        seeds: Vec::new(),
        next: 0,
    };
    let result = lowering.lower(&expr);
    let mut code = lowering.code;
    code.push(Instruction::halt());
    Lowered {
        code,
        seeds: lowering.seeds,
        result,
    }
}

/// Seed memory, register `code` and run it as the entry function.
pub fn load(vm: &mut VM, lowered: &Lowered) -> usize {
    for &(slot, value) in &lowered.seeds {
        vm.memory.set(slot, value).unwrap();
    }
    vm.add_function(lowered.code.clone())
}

/// Evaluate an expression and return its value.
pub fn eval(source: &str) -> Value {
    let lowered = lower(source);
    let mut vm = VM::new();
    let main = load(&mut vm, &lowered);
    vm.run(main).unwrap();
    vm.memory.get(lowered.result)
}
