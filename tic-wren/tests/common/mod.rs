#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use tic_core::testing::{RecordingConsole, RecordingSink};
use tic_script::testing::{FakeCall, FakeClass, FakeValue, FakeVm, HandleLedger};
use tic_wren::{BridgeConfig, LoadError, WrenBridge};

pub const CART: &str = "class Game is Engine {\n  construct new() {}\n}\n";

/// A console, its sinks and a bridge whose engines all report to one ledger.
pub struct Rig {
    pub console: RecordingConsole,
    pub sink: RecordingSink,
    pub bridge: WrenBridge<FakeVm>,
    pub ledger: Rc<HandleLedger>,
}

impl Rig {
    /// `setup` runs on every fresh engine before the cart is interpreted.
    pub fn with_setup(config: BridgeConfig, setup: impl Fn(&mut FakeVm) + 'static) -> Self {
        let ledger = HandleLedger::new();
        let shared = ledger.clone();
        let bridge = WrenBridge::new(config, move || {
            let mut vm = FakeVm::new().with_ledger(shared.clone());
            setup(&mut vm);
            vm
        });
        Self { console: RecordingConsole::new(), sink: RecordingSink::new(), bridge, ledger }
    }

    pub fn with_classes(config: BridgeConfig, classes: Vec<FakeClass>) -> Self {
        Self::with_setup(config, move |vm| vm.define(CART, classes.clone()))
    }

    /// A `Game` whose `update()` runs `body`.
    pub fn with_update<F>(config: BridgeConfig, body: F) -> Self
    where
        F: Fn(&mut FakeCall<'_>) -> Result<FakeValue, String> + 'static,
    {
        Self::with_classes(config, vec![FakeClass::new("Game").method("update()", body)])
    }

    pub fn load(&mut self) -> Result<(), LoadError> {
        self.bridge.load(&mut self.console, &mut self.sink, CART)
    }

    pub fn tick(&mut self) {
        self.bridge.tick(&mut self.console, &mut self.sink);
    }

    pub fn scanline(&mut self, row: i32) {
        self.bridge.scanline(&mut self.console, &mut self.sink, row);
    }

    pub fn live_handles(&self) -> usize {
        self.bridge.vm().map_or(0, FakeVm::live_handles)
    }
}

/// Values answered by foreign calls made from a script body, in call order.
#[derive(Clone, Default)]
pub struct Answers(Rc<RefCell<Vec<FakeValue>>>);

impl Answers {
    pub fn push(&self, value: FakeValue) {
        self.0.borrow_mut().push(value);
    }

    pub fn take(&self) -> Vec<FakeValue> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Runs one frame whose `update()` makes the foreign calls in `calls`,
/// recording each answer.
pub fn run_calls(config: BridgeConfig, prepare: impl FnOnce(&mut RecordingConsole), calls: Vec<(&'static str, Vec<FakeValue>)>) -> (Rig, Vec<FakeValue>) {
    let answers = Answers::default();
    let out = answers.clone();
    let mut rig = Rig::with_update(config, move |cx| {
        for (sig, args) in &calls {
            let answer = cx.tic(sig, args.clone())?;
            out.push(answer);
        }
        Ok(FakeValue::Null)
    });
    prepare(&mut rig.console);
    rig.load().expect("cart loads");
    rig.tick();
    (rig, answers.take())
}

pub fn num(v: i32) -> FakeValue {
    FakeValue::Num(v as f64)
}

pub fn nums(values: &[i32]) -> Vec<FakeValue> {
    values.iter().copied().map(num).collect()
}
