use byteorder::{ByteOrder, LittleEndian};

use crate::layout::*;

/// Sound-effect defaults stored in a RAM effect record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SfxRecord {
    pub note: i32,
    pub octave: i32,
    pub speed: i32,
}

/// The console RAM image.
///
/// Every accessor validates its address range against [`RAM_SIZE`] before
/// touching a byte. Rejected accesses are reported as `None`/`false` and leave
/// the image unchanged; callers decide whether that is worth surfacing.
pub struct Ram {
    bytes: Box<[u8]>,
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ram").field("len", &self.bytes.len()).finish()
    }
}

impl Ram {
    pub fn new() -> Self {
        Self { bytes: vec![0u8; RAM_SIZE].into_boxed_slice() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// `0 <= address` and `address + len <= RAM_SIZE`.
    fn span(&self, address: i32, len: usize) -> Option<std::ops::Range<usize>> {
        if address < 0 {
            return None;
        }
        let start = address as usize;
        let end = start.checked_add(len)?;
        (end <= self.bytes.len()).then_some(start..end)
    }

    pub fn peek(&self, address: i32) -> Option<u8> {
        self.span(address, 1).map(|r| self.bytes[r.start])
    }

    pub fn poke(&mut self, address: i32, value: u8) -> bool {
        match self.span(address, 1) {
            Some(r) => {
                self.bytes[r.start] = value;
                true
            }
            None => false,
        }
    }

    /// Nibble addressing: two addresses per byte, low nibble first.
    pub fn peek4(&self, address: i32) -> Option<u8> {
        if address < 0 || address as usize >= self.bytes.len() * 2 {
            return None;
        }
        let byte = self.bytes[address as usize >> 1];
        Some((byte >> ((address & 1) * 4)) & 0x0f)
    }

    pub fn poke4(&mut self, address: i32, value: u8) -> bool {
        if address < 0 || address as usize >= self.bytes.len() * 2 {
            return false;
        }
        let shift = (address & 1) * 4;
        let byte = &mut self.bytes[address as usize >> 1];
        *byte = (*byte & !(0x0f << shift)) | ((value & 0x0f) << shift);
        true
    }

    /// Inclusive upper bound for a block of `size` bytes.
    ///
    /// The size check and the start-address checks stay separate: the bound
    /// alone does not reject a negative start.
    fn block_bound(&self, size: i32) -> Option<i64> {
        let total = self.bytes.len() as i64;
        let size = size as i64;
        if size < 0 || size > total {
            return None;
        }
        Some(total - size)
    }

    /// Overlap-safe block copy. A zero-length copy is always accepted.
    pub fn memcpy(&mut self, dest: i32, src: i32, size: i32) -> bool {
        let Some(bound) = self.block_bound(size) else {
            return false;
        };
        if dest < 0 || src < 0 || dest as i64 > bound || src as i64 > bound {
            return false;
        }
        let (dest, src, size) = (dest as usize, src as usize, size as usize);
        self.bytes.copy_within(src..src + size, dest);
        true
    }

    pub fn memset(&mut self, dest: i32, value: u8, size: i32) -> bool {
        let Some(bound) = self.block_bound(size) else {
            return false;
        };
        if dest < 0 || dest as i64 > bound {
            return false;
        }
        let dest = dest as usize;
        self.bytes[dest..dest + size as usize].fill(value);
        true
    }

    fn pmem_offset(index: u32) -> usize {
        PERSISTENT_ADDR + (index % PERSISTENT_SLOTS) as usize * 4
    }

    /// Persistent slots never reject an index, they wrap.
    pub fn pmem(&self, index: u32) -> i32 {
        let off = Self::pmem_offset(index);
        LittleEndian::read_i32(&self.bytes[off..off + 4])
    }

    /// Stores `value` and returns what the slot held before.
    pub fn set_pmem(&mut self, index: u32, value: i32) -> i32 {
        let off = Self::pmem_offset(index);
        let prev = LittleEndian::read_i32(&self.bytes[off..off + 4]);
        LittleEndian::write_i32(&mut self.bytes[off..off + 4], value);
        prev
    }

    /// Raw map cell by linear index; anything outside the map reads as 0.
    pub fn map_tile(&self, index: i32) -> u8 {
        if index < 0 || index >= MAP_WIDTH * MAP_HEIGHT {
            return 0;
        }
        self.bytes[MAP_ADDR + index as usize]
    }

    pub fn map_get(&self, x: i32, y: i32) -> u8 {
        if !(0..MAP_WIDTH).contains(&x) || !(0..MAP_HEIGHT).contains(&y) {
            return 0;
        }
        self.map_tile(x + y * MAP_WIDTH)
    }

    pub fn map_set(&mut self, x: i32, y: i32, tile: u8) -> bool {
        if !(0..MAP_WIDTH).contains(&x) || !(0..MAP_HEIGHT).contains(&y) {
            return false;
        }
        self.bytes[MAP_ADDR + (x + y * MAP_WIDTH) as usize] = tile;
        true
    }

    pub fn gamepad(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[GAMEPAD_ADDR..GAMEPAD_ADDR + 2])
    }

    /// Written by the input sampler once per frame.
    pub fn set_gamepad(&mut self, value: u16) {
        LittleEndian::write_u16(&mut self.bytes[GAMEPAD_ADDR..GAMEPAD_ADDR + 2], value);
    }

    pub fn sfx_record(&self, index: i32) -> Option<SfxRecord> {
        if !(0..SFX_COUNT).contains(&index) {
            return None;
        }
        let base = SFX_ADDR + index as usize * SFX_RECORD_BYTES;
        let octave_speed = self.bytes[base + SFX_OCTAVE_SPEED_OFFSET];
        let note = self.bytes[base + SFX_NOTE_OFFSET];

        // three-bit two's complement
        let raw_speed = ((octave_speed >> 4) & 0x07) as i32;
        let speed = if raw_speed >= 4 { raw_speed - 8 } else { raw_speed };

        Some(SfxRecord {
            note: (note & 0x0f) as i32,
            octave: (octave_speed & 0x07) as i32,
            speed,
        })
    }
}
