pub mod error;
pub mod field;
pub mod generator;
pub mod symbols;

pub use error::CompileError;
pub use field::{Field, FieldStack};
pub use generator::Generator;
pub use symbols::{Identifier, Section, SectionKind, StorageClass, SymbolTable, Variable};
