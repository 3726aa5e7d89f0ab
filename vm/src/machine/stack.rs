use memory::Value;

use crate::error::RuntimeError;
use crate::opcode::Instruction;

/// Operand stack of the current frame. Underflow is reported at the
/// instruction that caused it.
pub trait StackOps {
    fn push_value(&mut self, value: Value);
    fn pop_value(&mut self, inst: &Instruction) -> Result<Value, RuntimeError>;
    fn peek_value(&self, inst: &Instruction) -> Result<Value, RuntimeError>;
}

fn underflow(inst: &Instruction) -> RuntimeError {
    RuntimeError::StackUnderflow {
        row: inst.row,
        col: inst.col,
    }
}

impl StackOps for super::vm::VM {
    #[inline(always)]
    fn push_value(&mut self, value: Value) {
        self.frames.current_mut().push(value);
    }

    #[inline(always)]
    fn pop_value(&mut self, inst: &Instruction) -> Result<Value, RuntimeError> {
        self.frames.current_mut().pop().ok_or_else(|| underflow(inst))
    }

    #[inline(always)]
    fn peek_value(&self, inst: &Instruction) -> Result<Value, RuntimeError> {
        self.frames.current().peek().ok_or_else(|| underflow(inst))
    }
}
