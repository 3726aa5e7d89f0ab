pub mod args;
pub mod commands;

pub use commands::SourceError;
