use tic_core::{Console, HostSink, MapTarget, SpriteDraw};
use tic_script::{ForeignId, ScriptError, ScriptVm, VmHost};

use crate::api;
use crate::config::BridgeConfig;
use crate::foreign::{self, Foreign};
use crate::trace;

/// The host side of one engine entry: the console and sink the engine may
/// reach while it runs, plus the bridge configuration.
///
/// A `Machine` lives for a single host-to-engine call (load, tick or
/// scanline) and is lent to the engine as its [`VmHost`].
pub struct Machine<'a> {
    pub(crate) console: &'a mut dyn Console,
    pub(crate) sink: &'a mut dyn HostSink,
    pub(crate) config: &'a BridgeConfig,
}

impl<'a> Machine<'a> {
    pub fn new(console: &'a mut dyn Console, sink: &'a mut dyn HostSink, config: &'a BridgeConfig) -> Self {
        Self { console, sink, config }
    }

    pub fn console(&mut self) -> &mut dyn Console {
        &mut *self.console
    }

    pub fn config(&self) -> &BridgeConfig {
        self.config
    }

    pub(crate) fn error(&mut self, message: &str) {
        self.sink.error(message);
    }
}

impl<V: ScriptVm> VmHost<V> for Machine<'_> {
    fn bind_foreign_method(
        &mut self,
        module: &str,
        class_name: &str,
        is_static: bool,
        signature: &str,
    ) -> Option<ForeignId> {
        foreign::bind(self.config, module, class_name, is_static, signature)
    }

    fn call_foreign(&mut self, vm: &mut V, id: ForeignId) {
        let Some(foreign) = Foreign::from_id(id) else {
            log::error!("call_foreign: no trampoline for {id:?}");
            return;
        };
        trace::foreign(format_args!("{foreign:?} slots={}", vm.slot_count()));

        if let Err(e) = api::invoke(foreign, self, vm) {
            log::debug!("{foreign:?}: {e:#}");
            self.sink.error(&e.to_string());
        }
    }

    fn write(&mut self, text: &str) {
        // the engine terminates every print with a separate "\n" write
        if text == "\n" {
            return;
        }
        self.sink.trace(text, self.config.write_color());
    }

    fn report_error(&mut self, error: &ScriptError) {
        log::debug!("script error: {error:?}");
        self.sink.error(&error.to_string());
    }
}

impl MapTarget for Machine<'_> {
    fn map_tile(&self, index: i32) -> u8 {
        self.console.ram().map_tile(index)
    }

    fn draw_tile(&mut self, sprite: &SpriteDraw) {
        self.console.sprite(sprite);
    }
}
