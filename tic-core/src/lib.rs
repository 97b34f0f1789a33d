//! tic-core
//!
//! The console side of the scripting bridge: the fixed RAM image every foreign
//! call is checked against, the host entry points the bridge calls once arguments
//! are resolved, and the tile-map walk used when a script remaps tiles.

pub mod console;
pub mod layout;
pub mod map;
pub mod memory;
pub mod note;

/// Recording host doubles shared by the workspace tests.
pub mod testing;

pub use console::{
    Console, Flip, FontDraw, HostSink, MapDraw, Palette, Rotate, SfxPlay, SpriteDraw, TexTri,
};
pub use map::{draw_remapped, MapCell, MapTarget, RemapResult, TileRemap};
pub use memory::{Ram, SfxRecord};
pub use note::parse_note;
