//! Per-tile callback into the script during a remapped map draw.
//!
//! A [`RemapScope`] exists for exactly one `map` call. It pins the callable
//! passed by the script and a `call(_,_,_)` handle when the draw starts and
//! releases both when it is dropped, on every exit path.

use tic_core::{Flip, RemapResult, Rotate, TileRemap};
use tic_script::{ScriptVm, SlotType};

use crate::machine::Machine;
use crate::trace;

/// `remap.call(tile, x, y)`
pub const REMAP_SIGNATURE: &str = "call(_,_,_)";

/// Receiver plus the three callback arguments.
const CALL_SLOTS: usize = 4;

pub struct RemapScope<'v, V: ScriptVm> {
    vm: &'v mut V,
    callable: Option<V::Handle>,
    call: Option<V::Handle>,
}

impl<'v, V: ScriptVm> RemapScope<'v, V> {
    /// Takes a handle to the callable in `slot` of the current frame.
    pub fn acquire(vm: &'v mut V, slot: usize) -> Self {
        let callable = vm.slot_handle(slot);
        let call = vm.make_call_handle(REMAP_SIGNATURE);
        trace::remap(format_args!("acquired remap callable from slot {slot}"));
        Self { vm, callable: Some(callable), call: Some(call) }
    }

    /// Reads the callback's answer from slot 0, using slot 1 as scratch.
    fn read_result(&mut self) -> RemapResult {
        let vm = &mut *self.vm;
        match vm.slot_type(0) {
            SlotType::Num => RemapResult::Tile(vm.slot_double(0) as i32),
            SlotType::List => {
                let count = vm.list_count(0);
                let mut fields = [None; 3];
                for (i, field) in fields.iter_mut().enumerate().take(count) {
                    vm.list_element(0, i, 1);
                    if vm.slot_type(1) == SlotType::Num {
                        *field = Some(vm.slot_double(1) as i32);
                    }
                }
                match fields {
                    [None, ..] => RemapResult::Keep,
                    [Some(tile), flip, rotate] => RemapResult::Transformed {
                        tile,
                        flip: Flip::from_script(flip.unwrap_or(0)),
                        rotate: Rotate::from_script(rotate.unwrap_or(0)),
                    },
                }
            }
            _ => RemapResult::Keep,
        }
    }
}

impl<'m, V: ScriptVm> TileRemap<Machine<'m>> for RemapScope<'_, V> {
    fn remap(&mut self, cx: &mut Machine<'m>, tile: u8, x: i32, y: i32) -> Option<RemapResult> {
        let (Some(callable), Some(call)) = (self.callable.as_ref(), self.call.as_ref()) else {
            return None;
        };

        let vm = &mut *self.vm;
        vm.ensure_slots(CALL_SLOTS);
        vm.set_slot_handle(0, callable);
        vm.set_slot_double(1, tile as f64);
        vm.set_slot_double(2, x as f64);
        vm.set_slot_double(3, y as f64);

        let result = vm.call(cx, call);
        if !result.is_success() {
            trace::remap(format_args!("remap call failed at ({x}, {y}): {result:?}"));
            return None;
        }

        let answer = self.read_result();
        trace::remap(format_args!("remap ({x}, {y}) {tile} -> {answer:?}"));
        Some(answer)
    }
}

impl<V: ScriptVm> Drop for RemapScope<'_, V> {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            self.vm.release_handle(call);
        }
        if let Some(callable) = self.callable.take() {
            self.vm.release_handle(callable);
        }
        trace::remap(format_args!("released remap handles"));
    }
}
