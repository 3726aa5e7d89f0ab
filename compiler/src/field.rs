//! Function scopes ("fields") and the stack of active ones.

use crate::error::CompileError;
use crate::symbols::{Identifier, StorageClass, Variable, SYM_TABLE_STEP};

/// Local slots a new field starts with.
pub const LOCAL_SECTION_DEFAULT: usize = 2;
/// Deepest nesting of function scopes.
pub const FIELD_STACK_MAX: usize = 16;

/// Local variables of one function body.
#[derive(Debug, Clone)]
pub struct Field {
    locals: Vec<Variable>,
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    pub fn new() -> Self {
        Self {
            locals: (0..LOCAL_SECTION_DEFAULT)
                .map(|i| Variable::free(StorageClass::Local, i))
                .collect(),
        }
    }

    /// Only this field's own locals are searched.
    pub fn lookup(&self, identifier: Identifier) -> Option<&Variable> {
        if identifier.is_free() {
            return None;
        }
        self.locals.iter().find(|v| v.identifier == identifier)
    }

    /// Take the first free local slot, growing when none is left. The slot
    /// is marked `Nameless`.
    pub fn alloc(&mut self) -> usize {
        let index = match self.locals.iter().position(Variable::is_free) {
            Some(i) => i,
            None => {
                let start = self.locals.len();
                self.locals.extend(
                    (start..start + SYM_TABLE_STEP).map(|i| Variable::free(StorageClass::Local, i)),
                );
                start
            }
        };
        self.locals[index].identifier = Identifier::Nameless;
        index
    }

    /// Allocate a slot and name it.
    pub fn declare(&mut self, identifier: Identifier) -> Variable {
        let index = self.alloc();
        self.locals[index].identifier = identifier;
        self.locals[index]
    }

    pub fn free(&mut self, index: usize) -> bool {
        match self.locals.get_mut(index) {
            Some(slot) if !slot.is_free() => {
                *slot = Variable::free(StorageClass::Local, index);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.locals.get(index)
    }

    pub fn capacity(&self) -> usize {
        self.locals.len()
    }

    pub fn occupied(&self) -> usize {
        self.locals.iter().filter(|v| !v.is_free()).count()
    }
}

/// Active function scopes, innermost last. An empty stack means the global
/// scope is current.
#[derive(Debug, Clone, Default)]
pub struct FieldStack {
    fields: Vec<Field>,
}

impl FieldStack {
    pub fn new() -> Self {
        Self {
            fields: Vec::with_capacity(FIELD_STACK_MAX),
        }
    }

    pub fn enter(&mut self, field: Field) -> Result<(), CompileError> {
        if self.fields.len() >= FIELD_STACK_MAX {
            return Err(CompileError::StackOverflow);
        }
        self.fields.push(field);
        Ok(())
    }

    /// Pop the innermost field. `None` when already global.
    pub fn leave(&mut self) -> Option<Field> {
        self.fields.pop()
    }

    pub fn current(&self) -> Option<&Field> {
        self.fields.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Field> {
        self.fields.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.fields.len()
    }

    pub fn is_global(&self) -> bool {
        self.fields.is_empty()
    }
}
