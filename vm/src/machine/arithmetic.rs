use crate::error::RuntimeError;
use crate::opcode::{Instruction, OpCode};
use memory::Value;

/// Trait for arithmetic instruction handlers
pub trait ArithmeticOps {
    fn handle_arithmetic(&mut self, inst: &Instruction) -> Result<(), RuntimeError>;
}

impl ArithmeticOps for super::vm::VM {
    fn handle_arithmetic(&mut self, inst: &Instruction) -> Result<(), RuntimeError> {
        let non_numeric = || RuntimeError::NonNumericOperand {
            row: inst.row,
            col: inst.col,
        };

        let lhs = self.memory.get(inst.b).as_number().ok_or_else(non_numeric)?;

        if inst.op == OpCode::Inv {
            return self.write(inst, inst.a, Value::number(-lhs));
        }

        let rhs = self.memory.get(inst.c).as_number().ok_or_else(non_numeric)?;

        let result = match inst.op {
            OpCode::Ge => Value::bool(lhs >= rhs),
            OpCode::Gt => Value::bool(lhs > rhs),
            OpCode::Le => Value::bool(lhs <= rhs),
            OpCode::Lt => Value::bool(lhs < rhs),
            OpCode::Add => Value::number(lhs + rhs),
            OpCode::Sub => Value::number(lhs - rhs),
            OpCode::Mul => Value::number(lhs * rhs),
            OpCode::Div => {
                if rhs == 0.0 {
                    return Err(RuntimeError::DivideByZero {
                        row: inst.row,
                        col: inst.col,
                    });
                }
                Value::number(lhs / rhs)
            }
            _ => unreachable!("{} is not an arithmetic opcode", inst.op),
        };

        self.write(inst, inst.a, result)
    }
}
