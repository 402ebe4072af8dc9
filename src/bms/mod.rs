pub mod interpreter;
pub mod opcode;
pub mod tape;
pub mod trace;

pub use interpreter::{Interpreter, Song};
pub use tape::Tape;
pub use trace::{BmsJson, TraceEvent};
