use crate::error::RuntimeError;
use crate::opcode::{Instruction, OpCode};
use tracing::debug;

use super::frame::{CallFrame, CallInfo};
use super::vm::Flow;

/// Trait for control flow instruction handlers
pub trait ControlFlowOps {
    fn handle_control(&mut self, inst: &Instruction) -> Result<Flow, RuntimeError>;
}

impl ControlFlowOps for super::vm::VM {
    fn handle_control(&mut self, inst: &Instruction) -> Result<Flow, RuntimeError> {
        let underflow = || RuntimeError::StackUnderflow {
            row: inst.row,
            col: inst.col,
        };

        match inst.op {
            OpCode::Call => {
                let callee = inst.a;
                if self.function(callee).is_none() {
                    return Err(RuntimeError::FunctionNotFound(callee));
                }

                let args = self
                    .frames
                    .current_mut()
                    .take_top(inst.b)
                    .ok_or_else(underflow)?;

                let to = CallInfo::new(callee, 0);
                let mut frame = CallFrame::new(self.pc, to);
                frame.stack.extend(args);
                let depth = self.frames.push(frame);

                debug!(from = ?self.pc, function = callee, args = inst.b, depth, "call");
                self.pc = to;
                Ok(Flow::Jump)
            }

            OpCode::Leav => {
                if self.frames.depth() == 1 {
                    debug!("leave from entry frame");
                    return Ok(Flow::Halt);
                }

                // An underflow leaves the callee frame in place.
                let results = self
                    .frames
                    .current_mut()
                    .take_top(inst.a)
                    .ok_or_else(underflow)?;
                let Some(frame) = self.frames.pop() else {
                    return Ok(Flow::Halt);
                };
                self.frames.current_mut().stack.extend(results);

                self.pc = CallInfo::new(frame.from.function, frame.from.address + 1);
                debug!(to = ?self.pc, results = inst.a, depth = self.frames.depth(), "leave");
                Ok(Flow::Jump)
            }

            OpCode::Jmp => {
                self.pc.address = inst.a;
                Ok(Flow::Jump)
            }

            OpCode::Jmpt | OpCode::Jmpf => {
                let truthy = self.memory.get(inst.b).is_truthy();
                if truthy == (inst.op == OpCode::Jmpt) {
                    self.pc.address = inst.a;
                    return Ok(Flow::Jump);
                }
                Ok(Flow::Next)
            }

            _ => unreachable!("{} is not a control opcode", inst.op),
        }
    }
}
