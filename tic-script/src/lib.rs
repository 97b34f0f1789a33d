//! tic-script
//!
//! What the bridge needs from a script engine, and nothing more: slot access,
//! handles, foreign binding and the two diagnostic sinks ([`vm`]), a tagged
//! view of marshaled values ([`value`]), per-call argument resolution with
//! fallbacks ([`args`]) and an exact-match foreign signature table
//! ([`registry`]).

pub mod args;
pub mod registry;
pub mod value;
pub mod vm;

/// In-memory engine for tests across the workspace (kept as a module, not a binary).
pub mod testing;

pub use args::ArgumentFrame;
pub use registry::SignatureTable;
pub use value::Value;
pub use vm::{ErrorKind, ForeignId, InterpretResult, ScriptError, ScriptVm, SlotType, VmHost};
