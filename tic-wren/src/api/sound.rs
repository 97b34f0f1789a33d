use anyhow::{bail, Result};
use tic_core::layout::{MAX_VOLUME, NOTES, SFX_COUNT, SFX_DEF_SPEED, SOUND_CHANNELS};
use tic_core::{parse_note, SfxPlay};
use tic_script::{ArgumentFrame, ScriptVm};

use crate::machine::Machine;

/// `sfx(id[, note[, duration[, channel[, volume[, speed]]]]])`
///
/// Without `note` the effect plays at the note, octave and speed stored in
/// its RAM record. A numeric note counts semitones from C-1; a string note
/// reads like `C#4`. The channel's current effect is stopped first.
pub fn sfx<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let top = args.top();
    let index = args.int(1);
    if index >= SFX_COUNT {
        bail!("unknown sfx index");
    }

    let mut play = SfxPlay {
        index,
        note: -1,
        octave: -1,
        duration: -1,
        channel: 0,
        volume: MAX_VOLUME,
        speed: SFX_DEF_SPEED,
    };

    if let Some(record) = m.console.ram().sfx_record(index) {
        play.note = record.note;
        play.octave = record.octave;
        play.speed = record.speed;
    }

    if top > 2 {
        if args.is_num(2) {
            let id = args.int(2);
            play.note = id % NOTES;
            play.octave = id / NOTES;
        } else if args.is_string(2) {
            let Some((note, octave)) = args.string(2).and_then(parse_note) else {
                bail!("invalid note, should be like C#4");
            };
            play.note = note;
            play.octave = octave;
        }

        if top > 3 {
            play.duration = args.int(3);

            if top > 4 {
                play.channel = args.int(4);

                if top > 5 {
                    play.volume = args.int(5);

                    if top > 6 {
                        play.speed = args.int(6);
                    }
                }
            }
        }
    }

    if !(0..SOUND_CHANNELS).contains(&play.channel) {
        bail!("unknown channel");
    }

    play.volume &= 0x0f;
    m.console.sfx_stop(play.channel);
    m.console.sfx(&play);
    Ok(())
}

/// `music([track[, frame[, row[, loop]]]])`; `music()` stops playback.
pub fn music<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let top = args.top();
    let (mut track, mut frame, mut row, mut looped) = (-1, -1, -1, true);

    if top > 1 {
        track = args.int(1);

        if top > 2 {
            frame = args.int(2);

            if top > 3 {
                row = args.int(3);

                if top > 4 {
                    looped = args.bool(4);
                }
            }
        }
    }

    m.console.music(track, frame, row, looped);
    Ok(())
}
