use anyhow::{bail, Result};
use tic_core::layout::SCREEN_WIDTH;
use tic_script::{ArgumentFrame, ScriptVm, Value};

use crate::config::InputMode;
use crate::machine::Machine;

/// Gamepad bits are selected by the low four bits of a button index.
const BUTTON_MASK: i32 = 0x0f;

/// Bit 15 of the packed input word carries the mouse button.
const MOUSE_PRESSED: u16 = 0x8000;

/// `btn()` is true when any button is down, `btn(id)` tests one.
pub fn btn<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    if m.config.input() != InputMode::Gamepad {
        args.ret_null();
        return Ok(());
    }

    let gamepad = m.console.ram().gamepad();
    if args.top() > 1 {
        let bit = args.int(1) & BUTTON_MASK;
        args.ret_bool(gamepad & (1 << bit) != 0);
    } else {
        args.ret_bool(gamepad != 0);
    }
    Ok(())
}

/// `btnp([id[, hold, period]])`; unspecified fields are passed as `-1`.
pub fn btnp<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    if m.config.input() != InputMode::Gamepad {
        args.ret_null();
        return Ok(());
    }

    let top = args.top();
    let (mut index, mut hold, mut period) = (-1, -1, -1);
    if top > 1 {
        index = args.int(1) & BUTTON_MASK;

        if top > 3 {
            hold = args.int(2);
            period = args.int(3);
        }
    }

    let pressed = m.console.btnp(index, hold, period);
    args.ret_bool(pressed);
    Ok(())
}

/// `mouse()` answers `[x, y, pressed]` decoded from the packed input word.
pub fn mouse<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    if m.config.input() != InputMode::Mouse {
        bail!("mouse input not declared in metadata");
    }

    let data = m.console.ram().gamepad();
    let position = (data & !MOUSE_PRESSED) as i32;
    args.ret_list(&[
        Value::from(position % SCREEN_WIDTH),
        Value::from(position / SCREEN_WIDTH),
        Value::from(data & MOUSE_PRESSED != 0),
    ]);
    Ok(())
}
