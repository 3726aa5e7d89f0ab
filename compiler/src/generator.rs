//! Code generator state shared by the emitter: the instruction buffer, the
//! global symbol table and the stack of function scopes.

use tracing::debug;
use vm::{Instruction, OpCode};

use crate::error::CompileError;
use crate::field::{Field, FieldStack};
use crate::symbols::{Identifier, SectionKind, SymbolTable, Variable};

/// Initial capacity of the instruction buffer.
pub const CODEGEN_BUFFER_DEFAULT_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct Generator {
    code: Vec<Instruction>,
    pub symbols: SymbolTable,
    fields: FieldStack,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::with_capacity(CODEGEN_BUFFER_DEFAULT_LEN)
    }

    pub fn with_capacity(len: usize) -> Self {
        Self {
            code: Vec::with_capacity(len),
            symbols: SymbolTable::new(),
            fields: FieldStack::new(),
        }
    }

    /// Append an instruction and return its address.
    pub fn emit(&mut self, inst: Instruction) -> usize {
        self.code.push(inst);
        self.code.len() - 1
    }

    /// Set the A operand (the jump target) of an emitted instruction.
    pub fn patch(&mut self, address: usize, target: usize) -> Result<(), CompileError> {
        let inst = self
            .code
            .get_mut(address)
            .ok_or(CompileError::PatchOutOfRange(address))?;
        inst.a = target;
        Ok(())
    }

    /// Address the next `emit` will use.
    pub fn here(&self) -> usize {
        self.code.len()
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    /// Take the finished function body, appending `HALT` unless it already
    /// ends in `HALT` or `LEAV`.
    pub fn finish(mut self) -> Vec<Instruction> {
        let terminated = matches!(
            self.code.last().map(|i| i.op),
            Some(OpCode::Halt | OpCode::Leav)
        );
        if !terminated {
            self.code.push(Instruction::halt());
        }
        self.code
    }

    pub fn enter_field(&mut self) -> Result<(), CompileError> {
        self.fields.enter(Field::new())?;
        debug!(depth = self.fields.depth(), "enter field");
        Ok(())
    }

    pub fn leave_field(&mut self) -> Option<Field> {
        let field = self.fields.leave()?;
        debug!(depth = self.fields.depth(), locals = field.occupied(), "leave field");
        Some(field)
    }

    /// Innermost function scope, `None` at global scope.
    pub fn current_field(&self) -> Option<&Field> {
        self.fields.current()
    }

    /// Current field first, then the global table.
    pub fn resolve(&self, identifier: Identifier) -> Option<Variable> {
        self.fields
            .current()
            .and_then(|f| f.lookup(identifier))
            .or_else(|| self.symbols.lookup(identifier))
            .copied()
    }

    /// Declare a name in the current scope: a local slot inside a function,
    /// a memory slot at global scope.
    pub fn declare_local(&mut self, identifier: Identifier) -> Variable {
        if let Some(field) = self.fields.current_mut() {
            return field.declare(identifier);
        }
        let index = self.symbols.add(SectionKind::Memory, identifier);
        Variable {
            identifier,
            class: SectionKind::Memory.into(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::StorageClass;

    #[test]
    fn emit_returns_addresses_and_patch_rewrites_target() {
        let mut gen = Generator::new();
        assert_eq!(gen.emit(Instruction::new(OpCode::Jmpf, 0, 1, 0)), 0);
        assert_eq!(gen.emit(Instruction::new(OpCode::Mov, 2, 3, 0)), 1);
        gen.patch(0, gen.here()).unwrap();
        assert_eq!(gen.code()[0].a, 2);
        assert_eq!(gen.patch(9, 0), Err(CompileError::PatchOutOfRange(9)));
    }

    #[test]
    fn finish_terminates_once() {
        let mut gen = Generator::new();
        gen.emit(Instruction::new(OpCode::Mov, 0, 1, 0));
        let code = gen.finish();
        assert_eq!(code.len(), 2);
        assert_eq!(code[1].op, OpCode::Halt);

        let mut gen = Generator::new();
        gen.emit(Instruction::new(OpCode::Leav, 0, 0, 0));
        assert_eq!(gen.finish().len(), 1);
    }

    #[test]
    fn global_declarations_use_memory() {
        let mut gen = Generator::new();
        let var = gen.declare_local(Identifier::True);
        assert_eq!(var.class, StorageClass::Memory);
        assert_eq!(var.index, 0);
    }
}
