use anyhow::Result;
use tic_core::layout::{MAP_HEIGHT, MAP_WIDTH, PALETTE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_SIZE};
use tic_core::map::draw_remapped;
use tic_core::{Flip, MapDraw, Rotate, SpriteDraw, TexTri};
use tic_script::{ArgumentFrame, ScriptVm};

use super::color;
use crate::machine::Machine;
use crate::remap::RemapScope;
use crate::trace;

/// Slot holding the optional remap callable of `map`.
const REMAP_SLOT: usize = 9;

pub fn map_width<V: ScriptVm>(args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    args.ret_num(MAP_WIDTH);
    Ok(())
}

pub fn map_height<V: ScriptVm>(args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    args.ret_num(MAP_HEIGHT);
    Ok(())
}

pub fn spritesize<V: ScriptVm>(args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    args.ret_num(SPRITE_SIZE);
    Ok(())
}

/// `spr(id[, x, y[, colors[, scale[, flip[, rotate[, w, h]]]]]])`
///
/// `colors` is a list of transparent color indices; a bare number stands for
/// a one-element list.
pub fn spr<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let top = args.top();
    let mut sprite = SpriteDraw::default();

    if top > 1 {
        sprite.index = args.int(1);

        if top > 3 {
            sprite.x = args.int(2);
            sprite.y = args.int(3);

            if top > 4 {
                sprite.colors = args.bytes::<PALETTE_SIZE>(4);

                if top > 5 {
                    sprite.scale = args.int(5);

                    if top > 6 {
                        sprite.flip = Flip::from_script(args.int(6));

                        if top > 7 {
                            sprite.rotate = Rotate::from_script(args.int(7));

                            if top > 9 {
                                sprite.w = args.int(8);
                                sprite.h = args.int(9);
                            }
                        }
                    }
                }
            }
        }
    }

    m.console.sprite(&sprite);
    Ok(())
}

/// `map([x, y[, w, h[, sx, sy[, colorkey[, scale[, remap]]]]]])`
///
/// With a remap callable the walk runs here, one tile at a time, and calls
/// back into the script for every visited cell.
pub fn map<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let top = args.top();
    let mut draw = MapDraw::default();

    if top > 2 {
        draw.x = args.int(1);
        draw.y = args.int(2);

        if top > 4 {
            draw.w = args.int(3);
            draw.h = args.int(4);

            if top > 6 {
                draw.sx = args.int(5);
                draw.sy = args.int(6);

                if top > 7 {
                    draw.chromakey = color(args, 7);

                    if top > 8 {
                        draw.scale = args.int(8);
                    }
                }
            }
        }
    }

    if top > REMAP_SLOT && !args.is_null(REMAP_SLOT) {
        let drawn = {
            let mut scope = RemapScope::acquire(args.vm(), REMAP_SLOT);
            draw_remapped(m, &draw, &mut scope)
        };
        // slot 0 still holds the last callback answer
        args.ret_null();
        trace::remap(format_args!("map {}x{} at ({}, {}): {drawn} cells remapped", draw.w, draw.h, draw.x, draw.y));
    } else {
        m.console.map(&draw);
    }
    Ok(())
}

/// `mset(x, y[, tile])`; the tile defaults to 0.
pub fn mset<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let x = args.int(1);
    let y = args.int(2);
    let tile = if args.top() > 3 { color(args, 3) } else { 0 };
    m.console.ram_mut().map_set(x, y, tile);
    Ok(())
}

pub fn mget<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let tile = m.console.ram().map_get(args.int(1), args.int(2));
    args.ret_num(tile);
    Ok(())
}

pub fn mgeti<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let tile = m.console.ram().map_tile(args.int(1));
    args.ret_num(tile);
    Ok(())
}

pub fn textri<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let top = args.top();
    let mut tri = TexTri { points: [0; 12], use_map: false, chromakey: u8::MAX };
    for (i, p) in tri.points.iter_mut().enumerate() {
        *p = args.int(i + 1);
    }
    if top > 13 {
        tri.use_map = args.bool(13);
    }
    if top > 14 {
        tri.chromakey = color(args, 14);
    }
    m.console.textri(&tri);
    Ok(())
}

/// `pix(x, y)` reads, `pix(x, y, color)` writes.
pub fn pix<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let x = args.int(1);
    let y = args.int(2);
    if args.top() > 3 {
        m.console.pixel(x, y, color(args, 3));
    } else {
        let c = m.console.get_pixel(x, y);
        args.ret_num(c);
    }
    Ok(())
}

pub fn line<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    m.console.line(args.int(1), args.int(2), args.int(3), args.int(4), color(args, 5));
    Ok(())
}

pub fn circ<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let radius = args.int(3);
    if radius < 0 {
        return Ok(());
    }
    m.console.circle(args.int(1), args.int(2), radius, color(args, 4));
    Ok(())
}

pub fn circb<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let radius = args.int(3);
    if radius < 0 {
        return Ok(());
    }
    m.console.circle_border(args.int(1), args.int(2), radius, color(args, 4));
    Ok(())
}

pub fn rect<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    m.console.rect(args.int(1), args.int(2), args.int(3), args.int(4), color(args, 5));
    Ok(())
}

pub fn rectb<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    m.console.rect_border(args.int(1), args.int(2), args.int(3), args.int(4), color(args, 5));
    Ok(())
}

pub fn tri<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let mut points = [0; 6];
    for (i, p) in points.iter_mut().enumerate() {
        *p = args.int(i + 1);
    }
    m.console.tri(points, color(args, 7));
    Ok(())
}

pub fn cls<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let c = if args.top() > 1 { color(args, 1) } else { 0 };
    m.console.clear(c);
    Ok(())
}

/// `clip()` resets to the whole screen.
pub fn clip<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    if args.top() > 4 {
        m.console.clip(args.int(1), args.int(2), args.int(3), args.int(4));
    } else {
        m.console.clip(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);
    }
    Ok(())
}
