pub mod error;
pub mod machine;
pub mod opcode;

pub use error::RuntimeError;
pub use machine::{CallFrame, CallInfo, CallStack, Flow, VM};
pub use opcode::{Instruction, OpCode};
