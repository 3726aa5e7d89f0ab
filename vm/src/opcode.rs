//! OpCode definitions for the vv VM
//!
//! Every instruction is a fixed-size record of an opcode, the source position
//! it was generated from, and three operands A, B, C. Operands address the
//! flat value memory unless noted otherwise; `R` is the register block and
//! `L` the locals block that follows it.

use std::fmt;

/// Virtual machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Stop execution.
    Halt = 0,

    // ===== Moves =====
    /// L[A] = M[B]
    Store = 1,
    /// M[A] = L[B]
    Load = 2,
    /// M[A] = M[B]
    Mov = 3,

    // ===== Frame stack =====
    /// push M[A]
    Push = 4,
    /// M[A] = pop
    Pop = 5,
    /// M[A] = top
    Peek = 6,
    /// push top
    Dup = 7,
    /// Call function A, moving the top B values into the new frame.
    Call = 8,
    /// Return, moving the top A values to the caller.
    Leav = 9,

    // ===== Flow Control =====
    /// Jump to address A.
    Jmp = 10,
    /// Jump to address A if M[B] is truthy.
    Jmpt = 11,
    /// Jump to address A if M[B] is falsey.
    Jmpf = 12,

    // ===== Logic =====
    /// M[A] = !M[B]
    Not = 13,
    /// M[A] = M[B] == M[C]
    Eq = 14,
    /// M[A] = M[B] != M[C]
    Neq = 15,
    /// M[A] = M[B] && M[C]
    And = 16,
    /// M[A] = M[B] || M[C]
    Or = 17,

    // ===== Arithmetic =====
    /// M[A] = -M[B]
    Inv = 18,
    /// M[A] = M[B] >= M[C]
    Ge = 19,
    /// M[A] = M[B] > M[C]
    Gt = 20,
    /// M[A] = M[B] <= M[C]
    Le = 21,
    /// M[A] = M[B] < M[C]
    Lt = 22,
    /// M[A] = M[B] + M[C]
    Add = 23,
    /// M[A] = M[B] - M[C]
    Sub = 24,
    /// M[A] = M[B] * M[C]
    Mul = 25,
    /// M[A] = M[B] / M[C]
    Div = 26,
}

impl OpCode {
    pub fn from_u8(byte: u8) -> Option<Self> {
        use OpCode::*;
        const ALL: [OpCode; 27] = [
            Halt, Store, Load, Mov, Push, Pop, Peek, Dup, Call, Leav, Jmp, Jmpt, Jmpf, Not, Eq,
            Neq, And, Or, Inv, Ge, Gt, Le, Lt, Add, Sub, Mul, Div,
        ];
        ALL.get(byte as usize).copied()
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Operations that require numeric operands.
    #[inline]
    pub fn is_numeric(self) -> bool {
        self.as_u8() >= OpCode::Inv.as_u8()
    }

    pub fn name(self) -> &'static str {
        match self {
            OpCode::Halt => "HALT",
            OpCode::Store => "STORE",
            OpCode::Load => "LOAD",
            OpCode::Mov => "MOV",
            OpCode::Push => "PUSH",
            OpCode::Pop => "POP",
            OpCode::Peek => "PEEK",
            OpCode::Dup => "DUP",
            OpCode::Call => "CALL",
            OpCode::Leav => "LEAV",
            OpCode::Jmp => "JMP",
            OpCode::Jmpt => "JMPT",
            OpCode::Jmpf => "JMPF",
            OpCode::Not => "NOT",
            OpCode::Eq => "EQ",
            OpCode::Neq => "NEQ",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Inv => "INV",
            OpCode::Ge => "GE",
            OpCode::Gt => "GT",
            OpCode::Le => "LE",
            OpCode::Lt => "LT",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: OpCode,
    pub row: usize,
    pub col: usize,
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Instruction {
    pub fn new(op: OpCode, a: usize, b: usize, c: usize) -> Self {
        Self {
            op,
            row: 0,
            col: 0,
            a,
            b,
            c,
        }
    }

    /// Attach the source position reported by runtime errors.
    pub fn at(mut self, row: usize, col: usize) -> Self {
        self.row = row;
        self.col = col;
        self
    }

    pub fn halt() -> Self {
        Self::new(OpCode::Halt, 0, 0, 0)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {} {} {}", self.op, self.a, self.b, self.c)
    }
}
