//! An in-memory script engine.
//!
//! `FakeVm` implements [`ScriptVm`] closely enough to drive an embedder end to
//! end: interpreting a module binds every `foreign static` declaration through
//! the host, user classes are Rust closures registered per source text, and
//! foreign calls made from those closures go through the host exactly like
//! engine bytecode would, re-entrancy included.
//!
//! The engine is strict where a real one would be undefined: reading a slot as
//! the wrong type, touching a slot that was never ensured, or using a released
//! handle all panic.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;
use crate::vm::{ForeignId, InterpretResult, ScriptError, ScriptVm, SlotType, VmHost};

pub type Body = Rc<dyn Fn(&mut FakeCall<'_>) -> Result<FakeValue, String>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum FakeValue {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<FakeValue>),
    Object(ObjectId),
}

impl FakeValue {
    pub fn list<T: Into<FakeValue>>(items: impl IntoIterator<Item = T>) -> Self {
        FakeValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            FakeValue::Num(v) => Some(*v),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            FakeValue::Null => "Null",
            FakeValue::Bool(_) => "Bool",
            FakeValue::Num(_) => "Num",
            FakeValue::Str(_) => "String",
            FakeValue::List(_) => "List",
            FakeValue::Object(_) => "Object",
        }
    }
}

impl From<f64> for FakeValue {
    fn from(v: f64) -> Self {
        FakeValue::Num(v)
    }
}

impl From<i32> for FakeValue {
    fn from(v: i32) -> Self {
        FakeValue::Num(v as f64)
    }
}

impl From<bool> for FakeValue {
    fn from(v: bool) -> Self {
        FakeValue::Bool(v)
    }
}

impl From<&str> for FakeValue {
    fn from(v: &str) -> Self {
        FakeValue::Str(v.to_owned())
    }
}

impl From<&FakeValue> for Value {
    fn from(v: &FakeValue) -> Self {
        match v {
            FakeValue::Null => Value::Null,
            FakeValue::Bool(b) => Value::Bool(*b),
            FakeValue::Num(n) => Value::Num(*n),
            FakeValue::Str(s) => Value::Str(s.clone()),
            FakeValue::List(items) => Value::List(items.iter().map(Value::from).collect()),
            FakeValue::Object(_) => Value::Other,
        }
    }
}

/// A user class: an optional `new()` body and instance methods keyed by
/// signature (`update()`, `scanline(_)`).
#[derive(Clone)]
pub struct FakeClass {
    name: String,
    constructor: Option<Body>,
    methods: HashMap<String, Body>,
}

impl FakeClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), constructor: None, methods: HashMap::new() }
    }

    pub fn constructor<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut FakeCall<'_>) -> Result<FakeValue, String> + 'static,
    {
        self.constructor = Some(Rc::new(body));
        self
    }

    pub fn method<F>(mut self, signature: &str, body: F) -> Self
    where
        F: Fn(&mut FakeCall<'_>) -> Result<FakeValue, String> + 'static,
    {
        self.methods.insert(signature.to_owned(), Rc::new(body));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What interpreting a registered source text does beyond binding foreign
/// declarations.
#[derive(Clone)]
pub enum FakeScript {
    Classes(Vec<FakeClass>),
    CompileError { line: u32, message: String },
    RuntimeError(String),
}

#[derive(Clone)]
enum Object {
    Class(FakeClass),
    Instance { class: ObjectId },
    Closure(Body),
}

/// Opaque engine handle. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct FakeHandle(u32);

enum HandleTarget {
    Value(FakeValue),
    Method(String),
}

enum Request {
    Foreign { class: String, signature: String, args: Vec<FakeValue> },
    Invoke { receiver: FakeValue, signature: String, args: Vec<FakeValue> },
    Closure(Body),
    Print(String),
}

/// The view a class body gets of the running engine.
pub struct FakeCall<'a> {
    receiver: FakeValue,
    args: Vec<FakeValue>,
    engine: &'a mut dyn FnMut(Request) -> Result<FakeValue, String>,
}

impl FakeCall<'_> {
    pub fn receiver(&self) -> &FakeValue {
        &self.receiver
    }

    pub fn args(&self) -> &[FakeValue] {
        &self.args
    }

    /// Zero-based; a missing argument reads as null.
    pub fn arg(&self, index: usize) -> FakeValue {
        self.args.get(index).cloned().unwrap_or(FakeValue::Null)
    }

    pub fn num(&self, index: usize) -> Result<f64, String> {
        let arg = self.arg(index);
        arg.as_num().ok_or_else(|| format!("expected num, found {}", arg.type_name()))
    }

    /// Calls `Class.signature` as a static foreign method.
    pub fn foreign(&mut self, class: &str, signature: &str, args: Vec<FakeValue>) -> Result<FakeValue, String> {
        (self.engine)(Request::Foreign { class: class.to_owned(), signature: signature.to_owned(), args })
    }

    /// Shorthand for a foreign call on `Tic`.
    pub fn tic(&mut self, signature: &str, args: Vec<FakeValue>) -> Result<FakeValue, String> {
        self.foreign("Tic", signature, args)
    }

    pub fn invoke(&mut self, receiver: FakeValue, signature: &str, args: Vec<FakeValue>) -> Result<FakeValue, String> {
        (self.engine)(Request::Invoke { receiver, signature: signature.to_owned(), args })
    }

    /// Allocates a function object answering `call(...)`.
    pub fn closure<F>(&mut self, body: F) -> FakeValue
    where
        F: Fn(&mut FakeCall<'_>) -> Result<FakeValue, String> + 'static,
    {
        (self.engine)(Request::Closure(Rc::new(body))).unwrap_or(FakeValue::Null)
    }

    /// `System.print(text)`.
    pub fn print(&mut self, text: &str) -> Result<(), String> {
        (self.engine)(Request::Print(text.to_owned())).map(|_| ())
    }
}

/// Handle counts shared by every engine created from one factory, so a test
/// can check for leaks after the engines themselves are gone.
#[derive(Debug, Default)]
pub struct HandleLedger {
    created: Cell<usize>,
    released: Cell<usize>,
    leaked: Cell<usize>,
}

impl HandleLedger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Handles still live when their engine was dropped.
    pub fn leaked(&self) -> usize {
        self.leaked.get()
    }
}

pub struct FakeVm {
    ledger: Option<Rc<HandleLedger>>,
    frames: Vec<Vec<FakeValue>>,
    heap: Vec<Object>,
    variables: HashMap<(String, String), FakeValue>,
    foreign: HashMap<String, ForeignId>,
    scripts: HashMap<String, FakeScript>,
    handles: HashMap<u32, HandleTarget>,
    next_handle: u32,
    released: usize,
    calls: Vec<String>,
}

impl Default for FakeVm {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeVm {
    pub fn new() -> Self {
        Self {
            ledger: None,
            frames: vec![Vec::new()],
            heap: Vec::new(),
            variables: HashMap::new(),
            foreign: HashMap::new(),
            scripts: HashMap::new(),
            handles: HashMap::new(),
            next_handle: 0,
            released: 0,
            calls: Vec::new(),
        }
    }

    pub fn with_ledger(mut self, ledger: Rc<HandleLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Interpreting exactly `source` will also define `classes`.
    pub fn define(&mut self, source: &str, classes: Vec<FakeClass>) {
        self.scripts.insert(source.to_owned(), FakeScript::Classes(classes));
    }

    pub fn define_script(&mut self, source: &str, script: FakeScript) {
        self.scripts.insert(source.to_owned(), script);
    }

    pub fn closure<F>(&mut self, body: F) -> FakeValue
    where
        F: Fn(&mut FakeCall<'_>) -> Result<FakeValue, String> + 'static,
    {
        FakeValue::Object(self.alloc(Object::Closure(Rc::new(body))))
    }

    /// Enters a native frame as if `receiver` had been called with `args`.
    pub fn push_frame(&mut self, receiver: FakeValue, args: Vec<FakeValue>) {
        let mut frame = Vec::with_capacity(args.len() + 1);
        frame.push(receiver);
        frame.extend(args);
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Vec<FakeValue> {
        if self.frames.len() == 1 {
            return std::mem::take(&mut self.frames[0]);
        }
        self.frames.pop().unwrap_or_default()
    }

    pub fn slot_value(&self, slot: usize) -> &FakeValue {
        &self.frame()[slot]
    }

    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    pub fn released_handles(&self) -> usize {
        self.released
    }

    /// Every method invoked so far, as `Class.signature` (`Fn.call(_)` for
    /// closures, `static Tic.spr(_)` for foreign calls).
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn is_bound(&self, class: &str, signature: &str) -> bool {
        self.foreign.contains_key(&format!("{class}.{signature}"))
    }

    fn frame(&self) -> &Vec<FakeValue> {
        // the base frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut Vec<FakeValue> {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn slot_mut(&mut self, slot: usize) -> &mut FakeValue {
        let frame = self.frame_mut();
        let len = frame.len();
        match frame.get_mut(slot) {
            Some(v) => v,
            None => panic!("slot {slot} out of range ({len} slots); ensure_slots first"),
        }
    }

    fn alloc(&mut self, object: Object) -> ObjectId {
        self.heap.push(object);
        ObjectId(self.heap.len() - 1)
    }

    fn new_handle(&mut self, target: HandleTarget) -> FakeHandle {
        let id = self.next_handle;
        self.next_handle += 1;
        self.handles.insert(id, target);
        if let Some(ledger) = &self.ledger {
            ledger.created.set(ledger.created.get() + 1);
        }
        FakeHandle(id)
    }

    fn class_object(&self, name: &str) -> FakeValue {
        self.variables
            .iter()
            .find(|((_, var), _)| var == name)
            .map(|(_, v)| v.clone())
            .unwrap_or(FakeValue::Null)
    }

    fn class_name(&self, id: ObjectId) -> String {
        match &self.heap[id.0] {
            Object::Class(class) => class.name.clone(),
            Object::Instance { class } => self.class_name(*class),
            Object::Closure(_) => "Fn".to_owned(),
        }
    }

    fn run_body<H>(&mut self, host: &mut H, body: Body, receiver: FakeValue, args: Vec<FakeValue>) -> Result<FakeValue, String>
    where
        H: VmHost<Self> + ?Sized,
    {
        let mut engine = |request: Request| self.serve(&mut *host, request);
        let mut call = FakeCall { receiver, args, engine: &mut engine };
        body(&mut call)
    }

    fn serve<H>(&mut self, host: &mut H, request: Request) -> Result<FakeValue, String>
    where
        H: VmHost<Self> + ?Sized,
    {
        match request {
            Request::Foreign { class, signature, args } => {
                let Some(id) = self.foreign.get(&format!("{class}.{signature}")).copied() else {
                    return Err(format!("{class} metaclass does not implement '{signature}'."));
                };
                self.calls.push(format!("static {class}.{signature}"));
                let receiver = self.class_object(&class);
                self.push_frame(receiver, args);
                host.call_foreign(self, id);
                let frame = self.pop_frame();
                Ok(frame.into_iter().next().unwrap_or(FakeValue::Null))
            }
            Request::Invoke { receiver, signature, args } => self.invoke(host, receiver, &signature, args),
            Request::Closure(body) => Ok(FakeValue::Object(self.alloc(Object::Closure(body)))),
            Request::Print(text) => {
                host.write(&text);
                host.write("\n");
                Ok(FakeValue::Null)
            }
        }
    }

    fn invoke<H>(&mut self, host: &mut H, receiver: FakeValue, signature: &str, args: Vec<FakeValue>) -> Result<FakeValue, String>
    where
        H: VmHost<Self> + ?Sized,
    {
        let FakeValue::Object(id) = receiver else {
            return Err(format!("{} does not implement '{signature}'.", receiver.type_name()));
        };
        let name = self.class_name(id);
        self.calls.push(format!("{name}.{signature}"));

        match self.heap[id.0].clone() {
            Object::Class(class) => {
                if signature != "new()" {
                    return Err(format!("{} metaclass does not implement '{signature}'.", class.name));
                }
                let instance = FakeValue::Object(self.alloc(Object::Instance { class: id }));
                if let Some(body) = class.constructor {
                    self.run_body(host, body, instance.clone(), args)?;
                }
                Ok(instance)
            }
            Object::Instance { class } => {
                let body = match &self.heap[class.0] {
                    Object::Class(c) => c.methods.get(signature).cloned(),
                    _ => None,
                };
                match body {
                    Some(body) => self.run_body(host, body, receiver, args),
                    None => Err(format!("{} does not implement '{signature}'.", self.class_name(class))),
                }
            }
            Object::Closure(body) => {
                if !signature.starts_with("call(") {
                    return Err(format!("Fn does not implement '{signature}'."));
                }
                self.run_body(host, body, receiver, args)
            }
        }
    }

    fn declare_class(&mut self, module: &str, name: &str) {
        let id = self.alloc(Object::Class(FakeClass::new(name)));
        self.variables.insert((module.to_owned(), name.to_owned()), FakeValue::Object(id));
    }
}

impl Drop for FakeVm {
    fn drop(&mut self) {
        if let Some(ledger) = &self.ledger {
            ledger.leaked.set(ledger.leaked.get() + self.handles.len());
        }
    }
}

/// `spr(id, x, y)` -> `spr(_,_,_)`; a getter keeps its bare name.
fn declared_signature(decl: &str) -> String {
    let decl = decl.trim();
    let Some(open) = decl.find('(') else {
        return decl.split_whitespace().next().unwrap_or_default().to_owned();
    };
    let name = decl[..open].trim();
    let close = decl[open..].find(')').map_or(decl.len(), |c| open + c);
    let arity = decl[open + 1..close].split(',').filter(|p| !p.trim().is_empty()).count();
    format!("{name}({})", vec!["_"; arity].join(","))
}

fn declared_class(rest: &str) -> Option<&str> {
    rest.split(|c: char| !(c.is_alphanumeric() || c == '_')).next().filter(|n| !n.is_empty())
}

impl ScriptVm for FakeVm {
    type Handle = FakeHandle;

    fn interpret<H>(&mut self, host: &mut H, module: &str, source: &str) -> InterpretResult
    where
        H: VmHost<Self> + ?Sized,
    {
        let script = self.scripts.get(source).cloned();
        if let Some(FakeScript::CompileError { line, message }) = &script {
            host.report_error(&ScriptError::compile(module, *line, message.clone()));
            return InterpretResult::CompileError;
        }

        let mut current: Option<String> = None;
        for line in source.lines() {
            let line = line.trim();
            let class_decl = line.strip_prefix("foreign class ").or_else(|| line.strip_prefix("class "));
            if let Some(name) = class_decl.and_then(declared_class) {
                self.declare_class(module, name);
                current = Some(name.to_owned());
                continue;
            }
            let (Some(rest), Some(class)) = (line.strip_prefix("foreign static "), current.as_deref()) else {
                continue;
            };
            let signature = declared_signature(rest);
            match host.bind_foreign_method(module, class, true, &signature) {
                Some(id) => {
                    self.foreign.insert(format!("{class}.{signature}"), id);
                }
                None => {
                    host.report_error(&ScriptError::runtime(format!(
                        "Could not find foreign method '{signature}' for class {class} in module '{module}'."
                    )));
                    return InterpretResult::RuntimeError;
                }
            }
        }

        match script {
            Some(FakeScript::Classes(classes)) => {
                for class in classes {
                    let name = class.name.clone();
                    let id = self.alloc(Object::Class(class));
                    self.variables.insert((module.to_owned(), name), FakeValue::Object(id));
                }
                InterpretResult::Success
            }
            Some(FakeScript::RuntimeError(message)) => {
                host.report_error(&ScriptError::runtime(message));
                InterpretResult::RuntimeError
            }
            Some(FakeScript::CompileError { .. }) | None => InterpretResult::Success,
        }
    }

    fn call<H>(&mut self, host: &mut H, method: &FakeHandle) -> InterpretResult
    where
        H: VmHost<Self> + ?Sized,
    {
        let signature = match self.handles.get(&method.0) {
            Some(HandleTarget::Method(sig)) => sig.clone(),
            Some(HandleTarget::Value(_)) => panic!("handle {} is not a call handle", method.0),
            None => panic!("call through released handle {}", method.0),
        };
        let arity = signature.matches('_').count();
        let frame = self.frame();
        let receiver = frame.first().cloned().unwrap_or(FakeValue::Null);
        let args = (1..=arity).map(|i| frame.get(i).cloned().unwrap_or(FakeValue::Null)).collect();

        match self.invoke(&mut *host, receiver, &signature, args) {
            Ok(result) => {
                self.ensure_slots(1);
                *self.slot_mut(0) = result;
                InterpretResult::Success
            }
            Err(message) => {
                host.report_error(&ScriptError::runtime(message));
                InterpretResult::RuntimeError
            }
        }
    }

    fn slot_count(&self) -> usize {
        self.frame().len()
    }

    fn ensure_slots(&mut self, count: usize) {
        let frame = self.frame_mut();
        if frame.len() < count {
            frame.resize(count, FakeValue::Null);
        }
    }

    fn slot_type(&self, slot: usize) -> SlotType {
        match &self.frame()[slot] {
            FakeValue::Null => SlotType::Null,
            FakeValue::Bool(_) => SlotType::Bool,
            FakeValue::Num(_) => SlotType::Num,
            FakeValue::Str(_) => SlotType::String,
            FakeValue::List(_) => SlotType::List,
            FakeValue::Object(_) => SlotType::Unknown,
        }
    }

    fn slot_bool(&self, slot: usize) -> bool {
        match &self.frame()[slot] {
            FakeValue::Bool(b) => *b,
            other => panic!("slot {slot} holds {other:?}, not a bool"),
        }
    }

    fn slot_double(&self, slot: usize) -> f64 {
        match &self.frame()[slot] {
            FakeValue::Num(v) => *v,
            other => panic!("slot {slot} holds {other:?}, not a num"),
        }
    }

    fn slot_string(&self, slot: usize) -> &str {
        match &self.frame()[slot] {
            FakeValue::Str(s) => s,
            other => panic!("slot {slot} holds {other:?}, not a string"),
        }
    }

    fn set_slot_bool(&mut self, slot: usize, value: bool) {
        *self.slot_mut(slot) = FakeValue::Bool(value);
    }

    fn set_slot_double(&mut self, slot: usize, value: f64) {
        *self.slot_mut(slot) = FakeValue::Num(value);
    }

    fn set_slot_null(&mut self, slot: usize) {
        *self.slot_mut(slot) = FakeValue::Null;
    }

    fn set_slot_string(&mut self, slot: usize, text: &str) {
        *self.slot_mut(slot) = FakeValue::Str(text.to_owned());
    }

    fn set_slot_new_list(&mut self, slot: usize) {
        *self.slot_mut(slot) = FakeValue::List(Vec::new());
    }

    fn list_count(&self, slot: usize) -> usize {
        match &self.frame()[slot] {
            FakeValue::List(items) => items.len(),
            other => panic!("slot {slot} holds {other:?}, not a list"),
        }
    }

    fn list_element(&mut self, list_slot: usize, index: usize, element_slot: usize) {
        let element = match &self.frame()[list_slot] {
            FakeValue::List(items) => items[index].clone(),
            other => panic!("slot {list_slot} holds {other:?}, not a list"),
        };
        *self.slot_mut(element_slot) = element;
    }

    fn insert_in_list(&mut self, list_slot: usize, index: isize, element_slot: usize) {
        let element = self.frame()[element_slot].clone();
        match self.slot_mut(list_slot) {
            FakeValue::List(items) => {
                let at = if index < 0 { (items.len() as isize + 1 + index) as usize } else { index as usize };
                items.insert(at, element);
            }
            other => panic!("slot {list_slot} holds {other:?}, not a list"),
        }
    }

    fn slot_handle(&mut self, slot: usize) -> FakeHandle {
        let value = self.frame()[slot].clone();
        self.new_handle(HandleTarget::Value(value))
    }

    fn set_slot_handle(&mut self, slot: usize, handle: &FakeHandle) {
        let value = match self.handles.get(&handle.0) {
            Some(HandleTarget::Value(v)) => v.clone(),
            Some(HandleTarget::Method(sig)) => panic!("handle {} is the call handle {sig}", handle.0),
            None => panic!("use of released handle {}", handle.0),
        };
        *self.slot_mut(slot) = value;
    }

    fn make_call_handle(&mut self, signature: &str) -> FakeHandle {
        self.new_handle(HandleTarget::Method(signature.to_owned()))
    }

    fn release_handle(&mut self, handle: FakeHandle) {
        if self.handles.remove(&handle.0).is_none() {
            panic!("handle {} released twice", handle.0);
        }
        self.released += 1;
        if let Some(ledger) = &self.ledger {
            ledger.released.set(ledger.released.get() + 1);
        }
    }

    fn variable(&mut self, module: &str, name: &str, slot: usize) -> bool {
        match self.variables.get(&(module.to_owned(), name.to_owned())).cloned() {
            Some(value) => {
                *self.slot_mut(slot) = value;
                true
            }
            None => false,
        }
    }
}
