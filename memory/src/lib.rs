pub mod memory;
pub mod value;

#[cfg(test)]
mod value_tests;

pub use memory::{Memory, MemoryError, MEMORY_MAX_CELLS, REGISTER_COUNT};
pub use value::{Value, ValueKind};
