//! The embedding interface the bridge expects from a script engine.
//!
//! The shape follows slot-based embedding APIs: every value crossing the
//! boundary lives in a numbered slot of the current call frame, slot 0 holds
//! the receiver on entry and the return value on exit, and long-lived
//! references are held through opaque handles.

use std::fmt;

/// Token the engine stores for a bound foreign method and hands back on every
/// call to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ForeignId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotType {
    Bool,
    Num,
    Foreign,
    List,
    Map,
    Null,
    String,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpretResult {
    Success,
    CompileError,
    RuntimeError,
}

impl InterpretResult {
    pub fn is_success(self) -> bool {
        self == InterpretResult::Success
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Compile,
    Runtime,
    /// One line of a runtime error's stack trace.
    StackTrace,
}

/// A diagnostic raised by the engine.
///
/// Runtime errors usually carry neither module nor line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub module: Option<String>,
    pub line: Option<u32>,
    pub message: String,
}

impl ScriptError {
    pub fn runtime(message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Runtime, module: None, line: None, message: message.into() }
    }

    pub fn compile(module: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Compile,
            module: Some(module.into()),
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.line.map_or(-1, |l| l as i64);
        match &self.module {
            Some(module) => write!(f, "\"{module}\", {line} ,\"{}\"", self.message),
            None => write!(f, "{line}, \"{}\"", self.message),
        }
    }
}

impl std::error::Error for ScriptError {}

/// The embedder side of an engine: foreign binding, foreign dispatch and the
/// two output sinks.
///
/// The engine lends itself back to the host on every foreign call, so a host
/// may read arguments, write the return value, and even call back into the
/// engine before returning.
pub trait VmHost<V: ?Sized> {
    /// Consulted once per declared foreign method while a module is being
    /// interpreted. `None` leaves the method unbound, which the engine reports
    /// as a load error.
    fn bind_foreign_method(
        &mut self,
        module: &str,
        class_name: &str,
        is_static: bool,
        signature: &str,
    ) -> Option<ForeignId>;

    fn call_foreign(&mut self, vm: &mut V, id: ForeignId);

    /// `System.print` and friends.
    fn write(&mut self, text: &str);

    fn report_error(&mut self, error: &ScriptError);
}

pub trait ScriptVm: Sized {
    /// A reference that keeps an engine object alive until released.
    ///
    /// Handles are not `Clone`: releasing consumes the handle, so a handle can
    /// only be released once.
    type Handle;

    fn interpret<H>(&mut self, host: &mut H, module: &str, source: &str) -> InterpretResult
    where
        H: VmHost<Self> + ?Sized;

    /// Invokes `method` with the receiver in slot 0 and arguments in the
    /// following slots. The result is left in slot 0.
    fn call<H>(&mut self, host: &mut H, method: &Self::Handle) -> InterpretResult
    where
        H: VmHost<Self> + ?Sized;

    fn slot_count(&self) -> usize;
    fn ensure_slots(&mut self, count: usize);
    fn slot_type(&self, slot: usize) -> SlotType;

    fn slot_bool(&self, slot: usize) -> bool;
    fn slot_double(&self, slot: usize) -> f64;
    fn slot_string(&self, slot: usize) -> &str;

    fn set_slot_bool(&mut self, slot: usize, value: bool);
    fn set_slot_double(&mut self, slot: usize, value: f64);
    fn set_slot_null(&mut self, slot: usize);
    fn set_slot_string(&mut self, slot: usize, text: &str);
    fn set_slot_new_list(&mut self, slot: usize);

    fn list_count(&self, slot: usize) -> usize;
    /// Copies element `index` of the list in `list_slot` into `element_slot`.
    fn list_element(&mut self, list_slot: usize, index: usize, element_slot: usize);
    /// A negative index counts from the end; `-1` appends.
    fn insert_in_list(&mut self, list_slot: usize, index: isize, element_slot: usize);

    fn slot_handle(&mut self, slot: usize) -> Self::Handle;
    fn set_slot_handle(&mut self, slot: usize, handle: &Self::Handle);
    /// A handle that invokes the method named by `signature`, e.g. `update()`.
    fn make_call_handle(&mut self, signature: &str) -> Self::Handle;
    fn release_handle(&mut self, handle: Self::Handle);

    /// Loads the top-level variable `name` of `module` into `slot`; false when
    /// no such variable exists.
    fn variable(&mut self, module: &str, name: &str, slot: usize) -> bool;
}
