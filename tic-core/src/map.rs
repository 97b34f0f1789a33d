//! Tile-map walk with per-cell remapping.

use crate::console::{Flip, MapDraw, Palette, Rotate, SpriteDraw};
use crate::layout::{MAP_HEIGHT, MAP_WIDTH, SPRITE_SIZE};

/// What a remap callback wants drawn for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemapResult {
    /// Draw the cell's own tile untouched.
    Keep,
    /// Any sprite index, not only the byte a map cell can hold.
    Tile(i32),
    Transformed { tile: i32, flip: Flip, rotate: Rotate },
}

/// Callback consulted once per visited cell.
///
/// `cx` is the drawing context the walk runs on; it is lent to the callback
/// for the duration of the call so the callback may draw or read memory.
/// Returning `None` stops the walk.
pub trait TileRemap<C: ?Sized> {
    fn remap(&mut self, cx: &mut C, tile: u8, x: i32, y: i32) -> Option<RemapResult>;
}

impl<C: ?Sized, F> TileRemap<C> for F
where
    F: FnMut(&mut C, u8, i32, i32) -> Option<RemapResult>,
{
    fn remap(&mut self, cx: &mut C, tile: u8, x: i32, y: i32) -> Option<RemapResult> {
        self(cx, tile, x, y)
    }
}

/// Where remapped tiles are read from and drawn to.
pub trait MapTarget {
    fn map_tile(&self, index: i32) -> u8;
    fn draw_tile(&mut self, sprite: &SpriteDraw);
}

/// Wraps a cell coordinate onto a map dimension of `size` cells.
#[inline]
pub fn wrap_cell(value: impl Into<i64>, size: i32) -> i32 {
    // the remainder is in 0..size, so it always fits back
    value.into().rem_euclid(i64::from(size)) as i32
}

/// Screen position of the `step`th tile from `origin`, saturated to `i32`.
#[inline]
fn screen_offset(origin: i32, step: i32, size: i64) -> i32 {
    let pos = i64::from(origin).saturating_add(i64::from(step).saturating_mul(size));
    pos.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// One visited cell of a map draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapCell {
    /// Wrapped map coordinates.
    pub x: i32,
    pub y: i32,
    /// Screen position.
    pub sx: i32,
    pub sy: i32,
}

impl MapCell {
    pub fn index(&self) -> i32 {
        self.x + self.y * MAP_WIDTH
    }
}

/// Cells visited by `draw`, row by row.
///
/// Arguments come straight from scripts, so the walk is computed in `i64`:
/// any coordinate or scale wraps or saturates instead of overflowing.
pub fn cells(draw: &MapDraw) -> impl Iterator<Item = MapCell> + '_ {
    let size = i64::from(SPRITE_SIZE) * i64::from(draw.scale);
    let rows = draw.h.max(0);
    let cols = draw.w.max(0);
    (0..rows).flat_map(move |j| {
        (0..cols).map(move |i| MapCell {
            x: wrap_cell(i64::from(draw.x) + i64::from(i), MAP_WIDTH),
            y: wrap_cell(i64::from(draw.y) + i64::from(j), MAP_HEIGHT),
            sx: screen_offset(draw.sx, i, size),
            sy: screen_offset(draw.sy, j, size),
        })
    })
}

/// Draws `draw` one tile at a time, letting `remap` replace each tile.
///
/// Returns the number of cells drawn.
pub fn draw_remapped<C>(cx: &mut C, draw: &MapDraw, remap: &mut dyn TileRemap<C>) -> usize
where
    C: MapTarget + ?Sized,
{
    let mut colors = Palette::new();
    colors.push(draw.chromakey);

    let mut drawn = 0;
    for cell in cells(draw) {
        let current = cx.map_tile(cell.index());
        let Some(result) = remap.remap(cx, current, cell.x, cell.y) else {
            log::debug!("map remap stopped at cell ({}, {})", cell.x, cell.y);
            break;
        };

        let (index, flip, rotate) = match result {
            RemapResult::Keep => (i32::from(current), Flip::empty(), Rotate::None),
            RemapResult::Tile(tile) => (tile, Flip::empty(), Rotate::None),
            RemapResult::Transformed { tile, flip, rotate } => (tile, flip, rotate),
        };

        cx.draw_tile(&SpriteDraw {
            index,
            x: cell.sx,
            y: cell.sy,
            w: 1,
            h: 1,
            colors: colors.clone(),
            scale: draw.scale,
            flip,
            rotate,
        });
        drawn += 1;
    }
    drawn
}
