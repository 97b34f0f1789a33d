use anyhow::Result;
use tic_core::layout::{PALETTE_SIZE, SPRITE_SIZE};
use tic_core::FontDraw;
use tic_script::{ArgumentFrame, ScriptVm};

use super::color;
use crate::machine::Machine;

/// Text of a slot that did not hold a string.
const NULL_TEXT: &str = "null";

fn text_arg<V: ScriptVm>(args: &ArgumentFrame<'_, V>, slot: usize) -> String {
    args.string(slot).unwrap_or(NULL_TEXT).to_owned()
}

/// `print__(text, x, y, color, fixed, scale)`, reached through the `print`
/// wrappers which always pass all six. Answers the drawn width.
pub fn print<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let text = text_arg(args, 1);
    let x = args.int(2);
    let y = args.int(3);
    let c = args.int(4).rem_euclid(PALETTE_SIZE as i32) as u8;
    let fixed = args.bool(5);
    let scale = args.int(6);

    if scale == 0 {
        args.ret_num(0);
        return Ok(());
    }

    let width = m.console.text(&text, x, y, c, fixed, scale);
    args.ret_num(width);
    Ok(())
}

/// `font(text[, x, y[, colorkey[, w, h[, fixed[, scale]]]]])`
pub fn font<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let top = args.top();
    if top <= 1 {
        return Ok(());
    }

    let text = text_arg(args, 1);
    let mut font = FontDraw { x: 0, y: 0, chromakey: 0, w: SPRITE_SIZE, h: SPRITE_SIZE, fixed: false, scale: 1 };

    if top > 3 {
        font.x = args.int(2);
        font.y = args.int(3);

        if top > 4 {
            font.chromakey = color(args, 4);

            if top > 6 {
                font.w = args.int(5);
                font.h = args.int(6);

                if top > 7 {
                    font.fixed = args.bool(7);

                    if top > 8 {
                        font.scale = args.int(8);
                    }
                }
            }
        }
    }

    if font.scale == 0 {
        args.ret_num(0);
        return Ok(());
    }

    let width = m.console.font(&text, &font);
    args.ret_num(width);
    Ok(())
}

/// `trace__(text, color)`
pub fn trace<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let text = text_arg(args, 1);
    m.sink.trace(&text, color(args, 2));
    Ok(())
}
