use crate::layout::NOTES;

const NOTE_NAMES: [&str; NOTES as usize] =
    ["C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-"];

/// Parses a tracker note such as `C#4` or `A-2` into `(note, octave)`.
///
/// Octaves are zero based: `C-1` is octave 0.
pub fn parse_note(text: &str) -> Option<(i32, i32)> {
    let bytes = text.as_bytes();
    if bytes.len() != 3 {
        return None;
    }
    let note = NOTE_NAMES.iter().position(|name| name.as_bytes() == &bytes[..2])?;
    let digit = bytes[2];
    if !(b'1'..=b'9').contains(&digit) {
        return None;
    }
    Some((note as i32, (digit - b'1') as i32))
}
