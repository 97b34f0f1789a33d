//! Fixed layout of the console RAM image.
//!
//! Offsets are absolute byte addresses inside [`RAM_SIZE`]. The regions are laid
//! out back to back; the tail after the persistent slots is free for carts.

pub const SCREEN_WIDTH: i32 = 240;
pub const SCREEN_HEIGHT: i32 = 136;

pub const PALETTE_SIZE: usize = 16;
pub const SPRITE_SIZE: i32 = 8;

pub const MAP_WIDTH: i32 = SCREEN_WIDTH;
pub const MAP_HEIGHT: i32 = SCREEN_HEIGHT;
/// Cells covered by one screen of map.
pub const MAP_SCREEN_WIDTH: i32 = SCREEN_WIDTH / SPRITE_SIZE;
pub const MAP_SCREEN_HEIGHT: i32 = SCREEN_HEIGHT / SPRITE_SIZE;

/// Total addressable bytes.
pub const RAM_SIZE: usize = 0x18000;

/// 4bpp frame buffer.
pub const SCREEN_ADDR: usize = 0x00000;
pub const SCREEN_BYTES: usize = (SCREEN_WIDTH * SCREEN_HEIGHT / 2) as usize;

pub const PALETTE_ADDR: usize = 0x03FC0;
pub const PALETTE_BYTES: usize = PALETTE_SIZE * 3;

pub const TILES_ADDR: usize = 0x04000;
pub const SPRITES_ADDR: usize = 0x06000;
pub const TILES_BYTES: usize = 0x2000;

/// One byte per map cell, row major.
pub const MAP_ADDR: usize = 0x08000;
pub const MAP_BYTES: usize = (MAP_WIDTH * MAP_HEIGHT) as usize;

/// Little-endian 16-bit input word. In mouse mode the low 15 bits pack the
/// cursor position as `x + y * SCREEN_WIDTH` and bit 15 holds the button.
pub const GAMEPAD_ADDR: usize = 0x0FF80;

pub const SOUND_REGISTERS_ADDR: usize = 0x0FF9C;
pub const WAVEFORMS_ADDR: usize = 0x0FFE4;

pub const SFX_ADDR: usize = 0x100E4;
pub const SFX_COUNT: i32 = 64;
pub const SFX_RECORD_BYTES: usize = 66;
/// Byte inside a record holding the octave (low three bits) and a signed
/// three-bit speed in bits 4..=6.
pub const SFX_OCTAVE_SPEED_OFFSET: usize = 60;
/// Byte inside a record holding the note in its low nibble.
pub const SFX_NOTE_OFFSET: usize = 61;

pub const MUSIC_PATTERNS_ADDR: usize = 0x11164;
pub const MUSIC_TRACKS_ADDR: usize = 0x13E64;

/// Persistent save slots, one little-endian `i32` each.
pub const PERSISTENT_ADDR: usize = 0x14000;
pub const PERSISTENT_SLOTS: u32 = 256;

pub const NOTES: i32 = 12;
pub const SOUND_CHANNELS: i32 = 4;
pub const MAX_VOLUME: i32 = 15;
pub const SFX_DEF_SPEED: i32 = 0;
