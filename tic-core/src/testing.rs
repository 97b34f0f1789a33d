//! Host doubles that record every call made through [`Console`] and
//! [`HostSink`]. Kept as a module, not a dev-only file, so the bridge crate's
//! tests can drive a real machine without a renderer.

use crate::console::{Console, FontDraw, HostSink, MapDraw, SfxPlay, SpriteDraw, TexTri};
use crate::memory::Ram;

/// Width in pixels of one glyph in the recording font.
pub const GLYPH_WIDTH: i32 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleCall {
    Clear(u8),
    Clip(i32, i32, i32, i32),
    Pixel(i32, i32, u8),
    GetPixel(i32, i32),
    Line(i32, i32, i32, i32, u8),
    Rect(i32, i32, i32, i32, u8),
    RectBorder(i32, i32, i32, i32, u8),
    Circle(i32, i32, i32, u8),
    CircleBorder(i32, i32, i32, u8),
    Tri([i32; 6], u8),
    Textri(TexTri),
    Sprite(SpriteDraw),
    Map(MapDraw),
    Text { text: String, x: i32, y: i32, color: u8, fixed: bool, scale: i32 },
    Font { text: String, font: FontDraw },
    Btnp(i32, i32, i32),
    SfxStop(i32),
    Sfx(SfxPlay),
    Music { track: i32, frame: i32, row: i32, looped: bool },
    Sync,
}

#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub ram: Ram,
    pub calls: Vec<ConsoleCall>,
    pub time: f64,
    pub btnp_result: bool,
    /// Returned by every pixel read.
    pub pixel: u8,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self) -> Vec<&SpriteDraw> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ConsoleCall::Sprite(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<&ConsoleCall> {
        self.calls.last()
    }
}

impl Console for RecordingConsole {
    fn ram(&self) -> &Ram {
        &self.ram
    }

    fn ram_mut(&mut self) -> &mut Ram {
        &mut self.ram
    }

    fn clear(&mut self, color: u8) {
        self.calls.push(ConsoleCall::Clear(color));
    }

    fn clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.calls.push(ConsoleCall::Clip(x, y, w, h));
    }

    fn pixel(&mut self, x: i32, y: i32, color: u8) {
        self.calls.push(ConsoleCall::Pixel(x, y, color));
    }

    fn get_pixel(&mut self, x: i32, y: i32) -> u8 {
        self.calls.push(ConsoleCall::GetPixel(x, y));
        self.pixel
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
        self.calls.push(ConsoleCall::Line(x0, y0, x1, y1, color));
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8) {
        self.calls.push(ConsoleCall::Rect(x, y, w, h, color));
    }

    fn rect_border(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8) {
        self.calls.push(ConsoleCall::RectBorder(x, y, w, h, color));
    }

    fn circle(&mut self, x: i32, y: i32, radius: i32, color: u8) {
        self.calls.push(ConsoleCall::Circle(x, y, radius, color));
    }

    fn circle_border(&mut self, x: i32, y: i32, radius: i32, color: u8) {
        self.calls.push(ConsoleCall::CircleBorder(x, y, radius, color));
    }

    fn tri(&mut self, points: [i32; 6], color: u8) {
        self.calls.push(ConsoleCall::Tri(points, color));
    }

    fn textri(&mut self, tri: &TexTri) {
        self.calls.push(ConsoleCall::Textri(*tri));
    }

    fn sprite(&mut self, sprite: &SpriteDraw) {
        self.calls.push(ConsoleCall::Sprite(sprite.clone()));
    }

    fn map(&mut self, map: &MapDraw) {
        self.calls.push(ConsoleCall::Map(*map));
    }

    fn text(&mut self, text: &str, x: i32, y: i32, color: u8, fixed: bool, scale: i32) -> i32 {
        self.calls.push(ConsoleCall::Text { text: text.to_owned(), x, y, color, fixed, scale });
        text.chars().count() as i32 * GLYPH_WIDTH * scale
    }

    fn font(&mut self, text: &str, font: &FontDraw) -> i32 {
        self.calls.push(ConsoleCall::Font { text: text.to_owned(), font: font.clone() });
        text.chars().count() as i32 * font.w * font.scale
    }

    fn btnp(&mut self, index: i32, hold: i32, period: i32) -> bool {
        self.calls.push(ConsoleCall::Btnp(index, hold, period));
        self.btnp_result
    }

    fn sfx_stop(&mut self, channel: i32) {
        self.calls.push(ConsoleCall::SfxStop(channel));
    }

    fn sfx(&mut self, sfx: &SfxPlay) {
        self.calls.push(ConsoleCall::Sfx(*sfx));
    }

    fn music(&mut self, track: i32, frame: i32, row: i32, looped: bool) {
        self.calls.push(ConsoleCall::Music { track, frame, row, looped });
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn sync(&mut self) {
        self.calls.push(ConsoleCall::Sync);
    }
}

/// Collects trace lines, error messages and exit requests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub traces: Vec<(String, u8)>,
    pub errors: Vec<String>,
    pub exits: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when any reported error contains `needle`.
    pub fn has_error(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.contains(needle))
    }
}

impl HostSink for RecordingSink {
    fn trace(&mut self, text: &str, color: u8) {
        self.traces.push((text.to_owned(), color));
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }

    fn exit(&mut self) {
        self.exits += 1;
    }
}
