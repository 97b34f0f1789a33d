//! Loading a cart, driving its game object, and tearing it down again.

use tic_core::{Console, HostSink};
use tic_script::ScriptVm;

use crate::config::BridgeConfig;
use crate::error::LoadError;
use crate::logger;
use crate::machine::Machine;
use crate::prelude::PRELUDE;
use crate::trace;

const NEW_SIGNATURE: &str = "new()";
const UPDATE_SIGNATURE: &str = "update()";
const SCANLINE_SIGNATURE: &str = "scanline(_)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeState {
    Unloaded,
    Loading,
    Ready,
}

/// Handles that stay alive while a cart is loaded.
struct GameHandles<V: ScriptVm> {
    instance: V::Handle,
    update: V::Handle,
    scanline: V::Handle,
}

impl<V: ScriptVm> GameHandles<V> {
    fn release(self, vm: &mut V) {
        vm.release_handle(self.instance);
        vm.release_handle(self.update);
        vm.release_handle(self.scanline);
    }
}

/// Owns one engine instance and the game object living in it.
///
/// Each `load` starts from a fresh engine built by the factory. Handles taken
/// by a previous load are released against the engine that issued them
/// before that engine is dropped.
pub struct WrenBridge<V: ScriptVm> {
    config: BridgeConfig,
    factory: Box<dyn FnMut() -> V>,
    vm: Option<V>,
    handles: Option<GameHandles<V>>,
    state: BridgeState,
}

impl<V: ScriptVm> WrenBridge<V> {
    pub fn new(config: BridgeConfig, factory: impl FnMut() -> V + 'static) -> Self {
        if let Some(logger_config) = config.logger_config() {
            logger::init(Some(logger_config));
        }
        Self { config, factory: Box::new(factory), vm: None, handles: None, state: BridgeState::Unloaded }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BridgeState::Ready
    }

    pub fn vm(&self) -> Option<&V> {
        self.vm.as_ref()
    }

    pub fn vm_mut(&mut self) -> Option<&mut V> {
        self.vm.as_mut()
    }

    /// Loads `code` into a fresh engine and instantiates the game class.
    ///
    /// Whatever was loaded before is closed first. On failure the bridge is
    /// left unloaded and the reason has already gone to the error sink.
    pub fn load(&mut self, console: &mut dyn Console, sink: &mut dyn HostSink, code: &str) -> Result<(), LoadError> {
        self.close();

        self.state = BridgeState::Loading;
        trace::lifecycle(format_args!("loading cart ({} bytes)", code.len()));

        let mut vm = (self.factory)();
        let mut machine = Machine::new(console, sink, &self.config);

        match boot(&mut vm, &mut machine, code) {
            Ok(handles) => {
                self.vm = Some(vm);
                self.handles = Some(handles);
                self.state = BridgeState::Ready;
                trace::lifecycle(format_args!("cart ready, {} instantiated", self.config.game_class()));
                Ok(())
            }
            Err(e) => {
                if !matches!(e, LoadError::Script(_)) {
                    machine.error(&e.to_string());
                }
                log::warn!("cart load failed: {e}");
                self.state = BridgeState::Unloaded;
                Err(e)
            }
        }
    }

    /// Runs `update()` on the game object. Does nothing unless ready.
    pub fn tick(&mut self, console: &mut dyn Console, sink: &mut dyn HostSink) {
        let (BridgeState::Ready, Some(vm), Some(handles)) = (self.state, self.vm.as_mut(), self.handles.as_ref()) else {
            return;
        };
        let mut machine = Machine::new(console, sink, &self.config);

        vm.ensure_slots(1);
        vm.set_slot_handle(0, &handles.instance);
        let result = vm.call(&mut machine, &handles.update);
        if !result.is_success() {
            log::debug!("update() returned {result:?}");
        }
    }

    /// Runs `scanline(row)` on the game object. Does nothing unless ready.
    pub fn scanline(&mut self, console: &mut dyn Console, sink: &mut dyn HostSink, row: i32) {
        let (BridgeState::Ready, Some(vm), Some(handles)) = (self.state, self.vm.as_mut(), self.handles.as_ref()) else {
            return;
        };
        let mut machine = Machine::new(console, sink, &self.config);

        vm.ensure_slots(2);
        vm.set_slot_handle(0, &handles.instance);
        vm.set_slot_double(1, row as f64);
        let result = vm.call(&mut machine, &handles.scanline);
        if !result.is_success() {
            log::debug!("scanline({row}) returned {result:?}");
        }
    }

    /// Releases the game handles and drops the engine. Safe to call in any state.
    pub fn close(&mut self) {
        let handles = self.handles.take();
        if let Some(mut vm) = self.vm.take() {
            if let Some(handles) = handles {
                handles.release(&mut vm);
                trace::lifecycle(format_args!("released game handles"));
            }
        }
        if self.state != BridgeState::Unloaded {
            trace::lifecycle(format_args!("cart closed"));
        }
        self.state = BridgeState::Unloaded;
    }
}

impl<V: ScriptVm> Drop for WrenBridge<V> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Interprets the prelude and the cart, then constructs the game object.
/// Leaves no handle alive on failure.
fn boot<V: ScriptVm>(vm: &mut V, machine: &mut Machine<'_>, code: &str) -> Result<GameHandles<V>, LoadError> {
    let module = machine.config().module().to_owned();
    let class = machine.config().game_class().to_owned();

    if !vm.interpret(&mut *machine, &module, PRELUDE).is_success() {
        return Err(LoadError::Prelude);
    }

    let result = vm.interpret(&mut *machine, &module, code);
    if !result.is_success() {
        return Err(LoadError::Script(result));
    }

    vm.ensure_slots(1);
    if !vm.variable(&module, &class, 0) {
        return Err(LoadError::MissingClass { class });
    }

    let new = vm.make_call_handle(NEW_SIGNATURE);
    let update = vm.make_call_handle(UPDATE_SIGNATURE);
    let scanline = vm.make_call_handle(SCANLINE_SIGNATURE);

    let constructed = vm.call(&mut *machine, &new).is_success();
    vm.release_handle(new);
    if !constructed {
        vm.release_handle(update);
        vm.release_handle(scanline);
        return Err(LoadError::Constructor { class });
    }

    let instance = vm.slot_handle(0);
    Ok(GameHandles { instance, update, scanline })
}
