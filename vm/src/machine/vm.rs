use crate::error::RuntimeError;
use crate::opcode::{Instruction, OpCode};
use memory::{Memory, MemoryError, Value};
use tracing::{debug, trace};

use super::arithmetic::ArithmeticOps;
use super::control::ControlFlowOps;
use super::frame::{CallInfo, CallStack};
use super::stack::StackOps;

/// What the loop does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to the next address.
    Next,
    /// The instruction set the program counter itself.
    Jump,
    Halt,
}

/// The Virtual Machine struct
pub struct VM {
    pub memory: Memory,
    pub frames: CallStack,
    /// Program counter.
    pub pc: CallInfo,
    /// Function table. Removed functions leave a hole that the next
    /// `add_function` reuses.
    functions: Vec<Option<Vec<Instruction>>>,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    pub fn new() -> Self {
        Self {
            memory: Memory::new(),
            frames: CallStack::new(),
            pc: CallInfo::default(),
            functions: Vec::new(),
        }
    }

    /// Register a function body and return its id. A body should end in
    /// `HALT` or `LEAV`.
    pub fn add_function(&mut self, code: Vec<Instruction>) -> usize {
        let len = code.len();
        let id = match self.functions.iter().position(Option::is_none) {
            Some(hole) => {
                self.functions[hole] = Some(code);
                hole
            }
            None => {
                self.functions.push(Some(code));
                self.functions.len() - 1
            }
        };
        debug!(id, len, "added function");
        id
    }

    pub fn remove_function(&mut self, id: usize) -> Result<Vec<Instruction>, RuntimeError> {
        let code = self
            .functions
            .get_mut(id)
            .and_then(Option::take)
            .ok_or(RuntimeError::FunctionNotFound(id))?;
        debug!(id, "removed function");
        Ok(code)
    }

    pub fn function(&self, id: usize) -> Option<&[Instruction]> {
        self.functions.get(id)?.as_deref()
    }

    /// Read a local slot, i.e. memory after the registers.
    pub fn local(&self, index: usize) -> Value {
        self.memory.local(index)
    }

    /// Write a memory cell, reporting a bad address at `inst`.
    pub(super) fn write(
        &mut self,
        inst: &Instruction,
        index: usize,
        value: Value,
    ) -> Result<(), RuntimeError> {
        self.memory
            .set(index, value)
            .map_err(|error| memory_error(inst, error))
    }

    fn write_local(
        &mut self,
        inst: &Instruction,
        index: usize,
        value: Value,
    ) -> Result<(), RuntimeError> {
        self.memory
            .set_local(index, value)
            .map_err(|error| memory_error(inst, error))
    }

    /// Reset the call stack and run `function` from address 0.
    pub fn run(&mut self, function: usize) -> Result<(), RuntimeError> {
        self.frames.reset();
        self.pc = CallInfo::new(function, 0);
        self.interpret()
    }

    /// Main interpretation loop. Runs from the current program counter until
    /// `HALT`, a `LEAV` in the entry frame, or an error.
    pub fn interpret(&mut self) -> Result<(), RuntimeError> {
        loop {
            let inst = self.fetch()?;
            trace!(
                function = self.pc.function,
                address = self.pc.address,
                "{inst}"
            );

            match self.step(&inst)? {
                Flow::Next => self.pc.address += 1,
                Flow::Jump => {}
                Flow::Halt => return Ok(()),
            }
        }
    }

    fn fetch(&self) -> Result<Instruction, RuntimeError> {
        let CallInfo { function, address } = self.pc;
        let code = self
            .function(function)
            .ok_or(RuntimeError::FunctionNotFound(function))?;
        code.get(address)
            .copied()
            .ok_or(RuntimeError::AddressOutOfRange { function, address })
    }

    /// Execute one instruction without moving the program counter, except
    /// where the opcode transfers control.
    pub fn step(&mut self, inst: &Instruction) -> Result<Flow, RuntimeError> {
        use crate::opcode::OpCode::*;

        match inst.op {
            Halt => return Ok(Flow::Halt),

            Store => self.write_local(inst, inst.a, self.memory.get(inst.b))?,
            Load => self.write(inst, inst.a, self.memory.local(inst.b))?,
            Mov => self.write(inst, inst.a, self.memory.get(inst.b))?,

            Push => {
                let value = self.memory.get(inst.a);
                self.push_value(value);
            }
            Pop => {
                let value = self.pop_value(inst)?;
                self.write(inst, inst.a, value)?;
            }
            Peek => {
                let value = self.peek_value(inst)?;
                self.write(inst, inst.a, value)?;
            }
            Dup => {
                let value = self.peek_value(inst)?;
                self.push_value(value);
            }

            // Control Flow (delegated to control.rs)
            Call | Leav | Jmp | Jmpt | Jmpf => return self.handle_control(inst),

            Not => {
                let value = Value::bool(self.memory.get(inst.b).is_falsey());
                self.write(inst, inst.a, value)?;
            }
            Eq | Neq => {
                let equal = self.memory.get(inst.b).loose_eq(&self.memory.get(inst.c));
                self.write(inst, inst.a, Value::bool(equal == (inst.op == OpCode::Eq)))?;
            }
            And => {
                let both =
                    self.memory.get(inst.b).is_truthy() && self.memory.get(inst.c).is_truthy();
                self.write(inst, inst.a, Value::bool(both))?;
            }
            Or => {
                let either =
                    self.memory.get(inst.b).is_truthy() || self.memory.get(inst.c).is_truthy();
                self.write(inst, inst.a, Value::bool(either))?;
            }

            // Arithmetic (delegated to arithmetic.rs)
            Inv | Ge | Gt | Le | Lt | Add | Sub | Mul | Div => self.handle_arithmetic(inst)?,
        }

        Ok(Flow::Next)
    }
}

fn memory_error(inst: &Instruction, error: MemoryError) -> RuntimeError {
    RuntimeError::Memory {
        error,
        row: inst.row,
        col: inst.col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory::REGISTER_COUNT;

    fn run(code: Vec<Instruction>) -> (VM, Result<(), RuntimeError>) {
        let mut vm = VM::new();
        let main = vm.add_function(code);
        let result = vm.run(main);
        (vm, result)
    }

    #[test]
    fn halt_stops_immediately() {
        let (vm, result) = run(vec![Instruction::halt()]);
        assert!(result.is_ok());
        assert_eq!(vm.pc.address, 0);
    }

    #[test]
    fn store_and_load_use_locals() {
        let mut vm = VM::new();
        vm.memory.set(1, Value::number(9.0)).unwrap();
        let main = vm.add_function(vec![
            Instruction::new(OpCode::Store, 3, 1, 0),
            Instruction::new(OpCode::Load, 2, 3, 0),
            Instruction::halt(),
        ]);
        vm.run(main).unwrap();
        assert_eq!(vm.local(3).as_number(), Some(9.0));
        assert_eq!(vm.memory.get(2).as_number(), Some(9.0));
    }

    #[test]
    fn pop_on_empty_stack_is_fatal() {
        let (_, result) = run(vec![
            Instruction::new(OpCode::Pop, 0, 0, 0).at(4, 2),
            Instruction::halt(),
        ]);
        assert_eq!(result, Err(RuntimeError::StackUnderflow { row: 4, col: 2 }));
    }

    #[test]
    fn peek_reads_the_top_value() {
        let mut vm = VM::new();
        vm.memory.set(0, Value::number(1.0)).unwrap();
        vm.memory.set(1, Value::number(2.0)).unwrap();
        let main = vm.add_function(vec![
            Instruction::new(OpCode::Push, 0, 0, 0),
            Instruction::new(OpCode::Push, 1, 0, 0),
            Instruction::new(OpCode::Peek, 2, 0, 0),
            Instruction::new(OpCode::Dup, 0, 0, 0),
            Instruction::halt(),
        ]);
        vm.run(main).unwrap();
        assert_eq!(vm.memory.get(2).as_number(), Some(2.0));
        assert_eq!(vm.frames.current().stack.len(), 3);
    }

    #[test]
    fn running_off_the_end_is_fatal() {
        let (_, result) = run(vec![Instruction::new(OpCode::Mov, 0, 1, 0)]);
        assert_eq!(
            result,
            Err(RuntimeError::AddressOutOfRange {
                function: 0,
                address: 1
            })
        );
    }

    #[test]
    fn huge_operands_are_runtime_errors() {
        let (vm, result) = run(vec![
            Instruction::new(OpCode::Load, 0, usize::MAX, 0),
            Instruction::new(OpCode::Store, usize::MAX, 0, 0).at(2, 1),
            Instruction::halt(),
        ]);
        assert!(vm.memory.get(0).is_nil());
        assert_eq!(
            result,
            Err(RuntimeError::Memory {
                error: MemoryError::LocalOutOfRange(usize::MAX),
                row: 2,
                col: 1,
            })
        );

        let mut vm = VM::new();
        vm.memory.set(1, Value::number(2.0)).unwrap();
        let main = vm.add_function(vec![
            Instruction::new(OpCode::Inv, usize::MAX, 1, 0).at(3, 4),
            Instruction::halt(),
        ]);
        let err = vm.run(main).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::Memory {
                error: MemoryError::CellOutOfRange(usize::MAX),
                row: 3,
                col: 4,
            }
        );
        assert_eq!(err.to_string(), format!("Memory cell {} is out of range", usize::MAX));
        assert_eq!(vm.memory.len(), REGISTER_COUNT);
    }

    #[test]
    fn removed_ids_are_reused() {
        let mut vm = VM::new();
        let a = vm.add_function(vec![Instruction::halt()]);
        let b = vm.add_function(vec![Instruction::halt()]);
        assert_eq!((a, b), (0, 1));
        vm.remove_function(a).unwrap();
        assert!(vm.function(a).is_none());
        assert_eq!(vm.remove_function(a), Err(RuntimeError::FunctionNotFound(0)));
        assert_eq!(vm.add_function(vec![]), 0);
        assert_eq!(vm.add_function(vec![]), 2);
    }
}
