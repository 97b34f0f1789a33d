//! Trampolines, one file per family.
//!
//! Each trampoline reads its arguments in increasing position order, testing
//! `top() > k` before touching position `k`, and starts every parameter at its
//! documented default. Supplying argument `n` therefore implies `1..n` were
//! supplied too. An `Err` is reported through the host error sink by the
//! caller and the operation is skipped.

use anyhow::Result;
use tic_script::{ArgumentFrame, ScriptVm};

use crate::foreign::Foreign;
use crate::machine::Machine;

pub mod graph;
pub mod input;
pub mod memory;
pub mod sound;
pub mod system;
pub mod text;

pub(crate) fn invoke<V: ScriptVm>(foreign: Foreign, m: &mut Machine<'_>, vm: &mut V) -> Result<()> {
    let mut frame = ArgumentFrame::new(vm);
    let args = &mut frame;

    match foreign {
        Foreign::MapWidth => graph::map_width(args),
        Foreign::MapHeight => graph::map_height(args),
        Foreign::SpriteSize => graph::spritesize(args),

        Foreign::Btn => input::btn(m, args),
        Foreign::Btnp => input::btnp(m, args),
        Foreign::Mouse => input::mouse(m, args),

        Foreign::Print => text::print(m, args),
        Foreign::Font => text::font(m, args),
        Foreign::Trace => text::trace(m, args),

        Foreign::Spr => graph::spr(m, args),
        Foreign::Map => graph::map(m, args),
        Foreign::Mset => graph::mset(m, args),
        Foreign::Mget => graph::mget(m, args),
        Foreign::Mgeti => graph::mgeti(m, args),
        Foreign::Textri => graph::textri(m, args),
        Foreign::Pix => graph::pix(m, args),
        Foreign::Line => graph::line(m, args),
        Foreign::Circ => graph::circ(m, args),
        Foreign::Circb => graph::circb(m, args),
        Foreign::Rect => graph::rect(m, args),
        Foreign::Rectb => graph::rectb(m, args),
        Foreign::Tri => graph::tri(m, args),
        Foreign::Cls => graph::cls(m, args),
        Foreign::Clip => graph::clip(m, args),

        Foreign::Peek => memory::peek(m, args),
        Foreign::Poke => memory::poke(m, args),
        Foreign::Peek4 => memory::peek4(m, args),
        Foreign::Poke4 => memory::poke4(m, args),
        Foreign::Memcpy => memory::memcpy(m, args),
        Foreign::Memset => memory::memset(m, args),
        Foreign::Pmem => memory::pmem(m, args),

        Foreign::Sfx => sound::sfx(m, args),
        Foreign::Music => sound::music(m, args),

        Foreign::Time => system::time(m, args),
        Foreign::Sync => system::sync(m, args),
        Foreign::Exit => system::exit(m, args),
    }
}

/// Colors come from script numbers and wrap into a byte like a C cast.
#[inline]
pub(crate) fn color<V: ScriptVm>(args: &ArgumentFrame<'_, V>, slot: usize) -> u8 {
    args.int(slot) as u8
}
