//! Machine module - VM implementation
//!
//! The fetch-execute loop lives in `vm`; opcode families are split into
//! trait impls on [`VM`] the same way the loop dispatches them.

mod arithmetic;
mod control;
mod frame;
mod stack;
mod vm;

// Public API
pub use frame::{CallFrame, CallInfo, CallStack};
pub use vm::{Flow, VM};
