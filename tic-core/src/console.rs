use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::layout::PALETTE_SIZE;
use crate::memory::Ram;

/// Transparent color indices handed to the sprite blitter.
pub type Palette = ArrayVec<u8, PALETTE_SIZE>;

bitflags! {
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Flip: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

impl Flip {
    pub fn from_script(value: i32) -> Self {
        Flip::from_bits_truncate(value as u8)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Rotate {
    #[default]
    None,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotate {
    /// Only the low two bits are meaningful.
    pub fn from_script(value: i32) -> Self {
        match value & 0x03 {
            1 => Rotate::Deg90,
            2 => Rotate::Deg180,
            3 => Rotate::Deg270,
            _ => Rotate::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteDraw {
    pub index: i32,
    pub x: i32,
    pub y: i32,
    /// Size in cells.
    pub w: i32,
    pub h: i32,
    pub colors: Palette,
    pub scale: i32,
    pub flip: Flip,
    pub rotate: Rotate,
}

impl Default for SpriteDraw {
    fn default() -> Self {
        Self {
            index: 0,
            x: 0,
            y: 0,
            w: 1,
            h: 1,
            colors: Palette::new(),
            scale: 1,
            flip: Flip::empty(),
            rotate: Rotate::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapDraw {
    /// First cell, in map coordinates.
    pub x: i32,
    pub y: i32,
    /// Cells to draw.
    pub w: i32,
    pub h: i32,
    /// Screen position of the first cell.
    pub sx: i32,
    pub sy: i32,
    /// 255 means no transparent color.
    pub chromakey: u8,
    pub scale: i32,
}

impl Default for MapDraw {
    fn default() -> Self {
        use crate::layout::{MAP_SCREEN_HEIGHT, MAP_SCREEN_WIDTH};
        Self {
            x: 0,
            y: 0,
            w: MAP_SCREEN_WIDTH,
            h: MAP_SCREEN_HEIGHT,
            sx: 0,
            sy: 0,
            chromakey: u8::MAX,
            scale: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexTri {
    /// Screen vertices, then texture coordinates: x1 y1 x2 y2 x3 y3 u1 v1 u2 v2 u3 v3.
    pub points: [i32; 12],
    pub use_map: bool,
    pub chromakey: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SfxPlay {
    pub index: i32,
    pub note: i32,
    pub octave: i32,
    pub duration: i32,
    pub channel: i32,
    pub volume: i32,
    pub speed: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontDraw {
    pub x: i32,
    pub y: i32,
    pub chromakey: u8,
    pub w: i32,
    pub h: i32,
    pub fixed: bool,
    pub scale: i32,
}

/// Host engine entry points.
///
/// The bridge calls these with arguments that are already defaulted and
/// validated; implementations do not need to re-check what the bridge
/// guarantees (palette length, channel range, non-zero text scale).
pub trait Console {
    fn ram(&self) -> &Ram;
    fn ram_mut(&mut self) -> &mut Ram;

    fn clear(&mut self, color: u8);
    fn clip(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn pixel(&mut self, x: i32, y: i32, color: u8);
    fn get_pixel(&mut self, x: i32, y: i32) -> u8;
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8);
    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8);
    fn rect_border(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8);
    fn circle(&mut self, x: i32, y: i32, radius: i32, color: u8);
    fn circle_border(&mut self, x: i32, y: i32, radius: i32, color: u8);
    fn tri(&mut self, points: [i32; 6], color: u8);
    fn textri(&mut self, tri: &TexTri);
    fn sprite(&mut self, sprite: &SpriteDraw);
    fn map(&mut self, map: &MapDraw);

    /// Returns the drawn width in pixels.
    fn text(&mut self, text: &str, x: i32, y: i32, color: u8, fixed: bool, scale: i32) -> i32;
    /// Returns the drawn width in pixels.
    fn font(&mut self, text: &str, font: &FontDraw) -> i32;

    /// `-1` leaves a field unspecified.
    fn btnp(&mut self, index: i32, hold: i32, period: i32) -> bool;

    fn sfx_stop(&mut self, channel: i32);
    fn sfx(&mut self, sfx: &SfxPlay);
    fn music(&mut self, track: i32, frame: i32, row: i32, looped: bool);

    /// Milliseconds since the cart started.
    fn time(&self) -> f64;
    fn sync(&mut self);
}

/// Studio-side callbacks: trace output, error reporting and exit requests.
pub trait HostSink {
    fn trace(&mut self, text: &str, color: u8);
    fn error(&mut self, message: &str);
    fn exit(&mut self);
}
