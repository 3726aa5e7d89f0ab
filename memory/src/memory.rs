/// Flat value memory: the hardware registers followed by a growable block of
/// locals.
use std::fmt;

use crate::value::Value;

/// Number of hardware registers at the start of memory.
pub const REGISTER_COUNT: usize = 8;
/// Largest number of cells memory grows to, registers included.
pub const MEMORY_MAX_CELLS: usize = 1 << 24;

/// Errors from writing memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryError {
    /// Cell index at or past [`MEMORY_MAX_CELLS`].
    CellOutOfRange(usize),
    /// Local index whose cell would be past [`MEMORY_MAX_CELLS`].
    LocalOutOfRange(usize),
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::CellOutOfRange(index) => write!(f, "Memory cell {index} is out of range"),
            MemoryError::LocalOutOfRange(index) => write!(f, "Local {index} is out of range"),
        }
    }
}

impl std::error::Error for MemoryError {}

#[derive(Clone, Debug)]
pub struct Memory {
    cells: Vec<Value>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: vec![Value::nil(); REGISTER_COUNT],
        }
    }

    /// Reads past the allocated cells yield `nil`.
    #[inline]
    pub fn get(&self, index: usize) -> Value {
        self.cells.get(index).copied().unwrap_or_default()
    }

    /// Writes past the allocated cells grow memory, filling the gap with `nil`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), MemoryError> {
        if index >= MEMORY_MAX_CELLS {
            return Err(MemoryError::CellOutOfRange(index));
        }
        if index >= self.cells.len() {
            self.cells.resize(index + 1, Value::nil());
        }
        self.cells[index] = value;
        Ok(())
    }

    /// Local slot `index`, i.e. the cell after the registers. `nil` when
    /// never written.
    #[inline]
    pub fn local(&self, index: usize) -> Value {
        REGISTER_COUNT
            .checked_add(index)
            .map_or_else(Value::nil, |cell| self.get(cell))
    }

    pub fn set_local(&mut self, index: usize, value: Value) -> Result<(), MemoryError> {
        match REGISTER_COUNT.checked_add(index) {
            Some(cell) if cell < MEMORY_MAX_CELLS => self.set(cell, value),
            _ => Err(MemoryError::LocalOutOfRange(index)),
        }
    }

    /// Allocated cells, registers included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn locals_len(&self) -> usize {
        self.cells.len() - REGISTER_COUNT
    }

    pub fn registers(&self) -> &[Value] {
        &self.cells[..REGISTER_COUNT]
    }
}
