mod common;

use common::{num, nums, run_calls};
use pretty_assertions::assert_eq;
use tic_core::layout::{PERSISTENT_SLOTS, RAM_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use tic_core::testing::ConsoleCall;
use tic_core::{Flip, FontDraw, Rotate, SfxPlay, SpriteDraw};
use tic_script::testing::FakeValue;
use tic_wren::{BridgeConfig, BridgeConfigBuilder, InputMode};

fn run(calls: Vec<(&'static str, Vec<FakeValue>)>) -> (common::Rig, Vec<FakeValue>) {
    run_calls(BridgeConfig::default(), |_| {}, calls)
}

fn sprites(rig: &common::Rig) -> Vec<SpriteDraw> {
    rig.console.sprites().into_iter().cloned().collect()
}

#[test]
fn sprite_arguments_extend_rightward() {
    let empty = FakeValue::List(vec![]);
    let key = FakeValue::list([3]);
    let (rig, _) = run(vec![
        ("spr(_)", nums(&[5])),
        ("spr(_,_,_)", nums(&[5, 0, 0])),
        ("spr(_,_,_,_)", vec![num(5), num(0), num(0), empty]),
        ("spr(_,_,_,_)", vec![num(5), num(1), num(2), key.clone()]),
        ("spr(_,_,_,_,_)", vec![num(5), num(1), num(2), key.clone(), num(1)]),
        ("spr(_,_,_,_,_,_)", vec![num(5), num(1), num(2), key.clone(), num(1), num(0)]),
        ("spr(_,_,_,_,_,_,_)", vec![num(5), num(1), num(2), key.clone(), num(1), num(0), num(0)]),
        ("spr(_,_,_,_,_,_,_,_,_)", vec![num(5), num(1), num(2), key, num(1), num(0), num(0), num(1), num(1)]),
    ]);
    assert!(rig.sink.errors.is_empty(), "{:?}", rig.sink.errors);

    let drawn = sprites(&rig);
    assert_eq!(drawn.len(), 8);
    assert_eq!(drawn[0], SpriteDraw { index: 5, ..SpriteDraw::default() });
    assert_eq!(drawn[0], drawn[1]);
    assert_eq!(drawn[1], drawn[2]);
    for pair in drawn[3..].windows(2) {
        assert_eq!(pair[0], pair[1]);
    }
    assert_eq!(drawn[7].colors.as_slice(), &[3]);
    assert_eq!((drawn[7].x, drawn[7].y), (1, 2));
}

#[test]
fn sprite_flags_and_size_reach_the_console() {
    let (rig, _) = run(vec![(
        "spr(_,_,_,_,_,_,_,_,_)",
        vec![num(9), num(10), num(20), num(0), num(2), num(3), num(1), num(2), num(3)],
    )]);
    let drawn = sprites(&rig);
    assert_eq!(
        drawn[0],
        SpriteDraw {
            index: 9,
            x: 10,
            y: 20,
            w: 2,
            h: 3,
            colors: [0].into_iter().collect(),
            scale: 2,
            flip: Flip::HORIZONTAL | Flip::VERTICAL,
            rotate: Rotate::Deg90,
        }
    );
}

#[test]
fn palettes_degrade_and_truncate() {
    let long = FakeValue::list(0..20);
    let (rig, _) = run(vec![
        ("spr(_,_,_,_)", vec![num(1), num(0), num(0), num(12)]),
        ("spr(_,_,_,_)", vec![num(1), num(0), num(0), long]),
        ("spr(_,_,_,_)", vec![num(1), num(0), num(0), FakeValue::Str("red".into())]),
    ]);
    let drawn = sprites(&rig);
    assert_eq!(drawn[0].colors.as_slice(), &[12]);
    assert_eq!(drawn[1].colors.len(), 16);
    assert_eq!(drawn[1].colors[15], 15);
    assert_eq!(drawn[2].colors.as_slice(), &[0]);
    assert!(rig.sink.errors.is_empty());
}

#[test]
fn memory_stays_inside_the_region() {
    let size = RAM_SIZE as i32;
    let (rig, answers) = run(vec![
        ("poke(_,_)", nums(&[size, 1])),
        ("poke(_,_)", nums(&[size - 1, 300])),
        ("peek(_)", nums(&[size - 1])),
        ("peek(_)", nums(&[size])),
        ("peek(_)", nums(&[-1])),
        ("memset(_,_,_)", nums(&[0, 9, size + 1])),
        ("memset(_,_,_)", nums(&[size, 9, 0])),
        ("memcpy(_,_,_)", nums(&[size, size, 0])),
        ("peek(_)", nums(&[0])),
        ("memset(_,_,_)", nums(&[0, 7, 4])),
        ("memcpy(_,_,_)", nums(&[2, 0, 4])),
        ("peek(_)", nums(&[5])),
        ("poke4(_,_)", nums(&[1, 0xf3])),
        ("peek4(_)", nums(&[1])),
        ("peek4(_)", nums(&[size * 2])),
    ]);

    assert!(rig.sink.errors.is_empty(), "{:?}", rig.sink.errors);
    let reads: Vec<FakeValue> = [2, 3, 4, 8, 11, 13, 14].iter().map(|&i| answers[i].clone()).collect();
    assert_eq!(
        reads,
        vec![num(44), FakeValue::Null, FakeValue::Null, num(0), num(7), num(3), FakeValue::Null]
    );
    assert_eq!(rig.console.ram.peek(size - 1), Some(44));
}

#[test]
fn persistent_slots_wrap_and_answer_the_previous_value() {
    let slots = PERSISTENT_SLOTS as i32;
    let (_, answers) = run(vec![
        ("pmem(_,_)", nums(&[slots, 5])),
        ("pmem(_)", nums(&[0])),
        ("pmem(_,_)", nums(&[0, 6])),
        ("pmem(_)", nums(&[slots])),
    ]);
    assert_eq!(answers, vec![num(0), num(5), num(5), num(6)]);
}

#[test]
fn sfx_resolves_notes_and_rejects_bad_arguments() {
    let (rig, _) = run(vec![
        ("sfx(_,_)", vec![num(0), FakeValue::Str("C#4".into())]),
        ("sfx(_,_,_,_,_,_)", nums(&[1, 30, 10, 2, 255, 3])),
        ("sfx(_,_)", vec![num(0), FakeValue::Str("H-4".into())]),
        ("sfx(_,_,_,_)", nums(&[0, 30, -1, 4])),
        ("sfx(_)", nums(&[64])),
    ]);

    let played: Vec<&ConsoleCall> =
        rig.console.calls.iter().filter(|c| matches!(c, ConsoleCall::Sfx(_) | ConsoleCall::SfxStop(_))).collect();
    assert_eq!(
        played,
        vec![
            &ConsoleCall::SfxStop(0),
            &ConsoleCall::Sfx(SfxPlay { index: 0, note: 1, octave: 3, duration: -1, channel: 0, volume: 15, speed: 0 }),
            &ConsoleCall::SfxStop(2),
            &ConsoleCall::Sfx(SfxPlay { index: 1, note: 6, octave: 2, duration: 10, channel: 2, volume: 15, speed: 3 }),
        ]
    );
    assert_eq!(
        rig.sink.errors,
        vec!["invalid note, should be like C#4".to_owned(), "unknown channel".to_owned(), "unknown sfx index".to_owned()]
    );
}

#[test]
fn music_defaults_to_looping_everything() {
    let (rig, _) = run(vec![
        ("music()", vec![]),
        ("music(_,_)", nums(&[3, 1])),
        ("music(_,_,_,_)", vec![num(3), num(1), num(8), FakeValue::Bool(false)]),
    ]);
    let music: Vec<&ConsoleCall> = rig.console.calls.iter().filter(|c| matches!(c, ConsoleCall::Music { .. })).collect();
    assert_eq!(
        music,
        vec![
            &ConsoleCall::Music { track: -1, frame: -1, row: -1, looped: true },
            &ConsoleCall::Music { track: 3, frame: 1, row: -1, looped: true },
            &ConsoleCall::Music { track: 3, frame: 1, row: 8, looped: false },
        ]
    );
}

#[test]
fn mouse_requires_the_declared_capability() {
    let (rig, answers) = run(vec![("mouse()", vec![])]);
    assert!(rig.sink.has_error("mouse input not declared in metadata"));
    assert_eq!(answers.len(), 1);

    let config = BridgeConfigBuilder::new().with_input(InputMode::Mouse).get();
    let (rig, answers) = run_calls(
        config,
        |console| console.ram.set_gamepad(0x8000 | (5 * SCREEN_WIDTH as u16 + 17)),
        vec![("mouse()", vec![]), ("btn()", vec![])],
    );
    assert!(rig.sink.errors.is_empty());
    assert_eq!(answers, vec![FakeValue::List(vec![num(17), num(5), FakeValue::Bool(true)]), FakeValue::Null]);
}

#[test]
fn buttons_read_the_gamepad_word() {
    let (rig, answers) = run_calls(
        BridgeConfig::default(),
        |console| {
            console.ram.set_gamepad(0b100);
            console.btnp_result = true;
        },
        vec![
            ("btn()", vec![]),
            ("btn(_)", nums(&[2])),
            ("btn(_)", nums(&[1])),
            ("btn(_)", nums(&[18])),
            ("btnp()", vec![]),
            ("btnp(_,_,_)", nums(&[20, 10, 5])),
        ],
    );
    assert_eq!(
        answers,
        vec![
            FakeValue::Bool(true),
            FakeValue::Bool(true),
            FakeValue::Bool(false),
            FakeValue::Bool(true),
            FakeValue::Bool(true),
            FakeValue::Bool(true),
        ]
    );
    let btnp: Vec<&ConsoleCall> = rig.console.calls.iter().filter(|c| matches!(c, ConsoleCall::Btnp(..))).collect();
    assert_eq!(btnp, vec![&ConsoleCall::Btnp(-1, -1, -1), &ConsoleCall::Btnp(4, 10, 5)]);
}

#[test]
fn text_widths_and_zero_scale() {
    let (rig, answers) = run(vec![
        ("print__(_,_,_,_,_,_)", vec!["hi".into(), num(1), num(2), num(18), FakeValue::Bool(false), num(2)]),
        ("print__(_,_,_,_,_,_)", vec!["hi".into(), num(1), num(2), num(3), FakeValue::Bool(false), num(0)]),
        ("font(_)", nums(&[7])),
        ("font(_,_,_,_,_,_,_,_)", vec!["ab".into(), num(1), num(2), num(3), num(4), num(5), FakeValue::Bool(true), num(0)]),
    ]);

    assert_eq!(answers, vec![num(24), num(0), num(32), num(0)]);
    let text: Vec<&ConsoleCall> =
        rig.console.calls.iter().filter(|c| matches!(c, ConsoleCall::Text { .. } | ConsoleCall::Font { .. })).collect();
    assert_eq!(
        text,
        vec![
            &ConsoleCall::Text { text: "hi".into(), x: 1, y: 2, color: 2, fixed: false, scale: 2 },
            &ConsoleCall::Font {
                text: "null".into(),
                font: FontDraw { x: 0, y: 0, chromakey: 0, w: 8, h: 8, fixed: false, scale: 1 },
            },
        ]
    );
}

#[test]
fn drawing_primitives_fill_in_defaults() {
    let (rig, answers) = run_calls(
        BridgeConfig::default(),
        |console| console.pixel = 9,
        vec![
            ("cls()", vec![]),
            ("cls(_)", nums(&[3])),
            ("clip()", vec![]),
            ("clip(_,_,_,_)", nums(&[1, 2, 3, 4])),
            ("pix(_,_)", nums(&[1, 2])),
            ("pix(_,_,_)", nums(&[1, 2, 5])),
            ("circ(_,_,_,_)", nums(&[1, 1, -1, 2])),
            ("circb(_,_,_,_)", nums(&[1, 1, 4, 2])),
            ("tri(_,_,_,_,_,_,_)", nums(&[1, 2, 3, 4, 5, 6, 7])),
            ("line(_,_,_,_,_)", nums(&[0, 0, 9, 9, 1])),
            ("rectb(_,_,_,_,_)", nums(&[0, 0, 9, 9, 258])),
        ],
    );
    assert_eq!(answers[4], num(9));
    assert_eq!(
        rig.console.calls,
        vec![
            ConsoleCall::Clear(0),
            ConsoleCall::Clear(3),
            ConsoleCall::Clip(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT),
            ConsoleCall::Clip(1, 2, 3, 4),
            ConsoleCall::GetPixel(1, 2),
            ConsoleCall::Pixel(1, 2, 5),
            ConsoleCall::CircleBorder(1, 1, 4, 2),
            ConsoleCall::Tri([1, 2, 3, 4, 5, 6], 7),
            ConsoleCall::Line(0, 0, 9, 9, 1),
            ConsoleCall::RectBorder(0, 0, 9, 9, 2),
        ]
    );
}

#[test]
fn textured_triangles_default_to_sprites_without_colorkey() {
    let coords: Vec<i32> = (1..=12).collect();
    let mut with_map = nums(&coords);
    with_map.push(FakeValue::Bool(true));
    let (rig, _) = run(vec![("textri(_,_,_,_,_,_,_,_,_,_,_,_)", nums(&coords)), ("textri(_,_,_,_,_,_,_,_,_,_,_,_,_)", with_map)]);

    let tris: Vec<(bool, u8)> = rig
        .console
        .calls
        .iter()
        .filter_map(|c| match c {
            ConsoleCall::Textri(t) => Some((t.use_map, t.chromakey)),
            _ => None,
        })
        .collect();
    assert_eq!(tris, vec![(false, 255), (true, 255)]);
}

#[test]
fn map_cells_are_read_and_written() {
    let (rig, answers) = run(vec![
        ("mset(_,_,_)", nums(&[3, 2, 77])),
        ("mget(_,_)", nums(&[3, 2])),
        ("mgeti(_)", nums(&[3 + 2 * 240])),
        ("mset(_,_)", nums(&[3, 2])),
        ("mget(_,_)", nums(&[3, 2])),
        ("mgeti(_)", nums(&[-1])),
        ("map_width", vec![]),
        ("spritesize", vec![]),
    ]);
    assert_eq!(answers[1..].to_vec(), vec![num(77), num(77), answers[3].clone(), num(0), num(0), num(240), num(8)]);
    assert_eq!(rig.console.ram.map_get(3, 2), 0);
}

#[test]
fn system_calls_reach_the_host() {
    let (rig, answers) = run_calls(
        BridgeConfig::default(),
        |console| console.time = 1500.0,
        vec![("time()", vec![]), ("sync()", vec![]), ("trace__(_,_)", vec!["hello".into(), num(6)]), ("exit()", vec![])],
    );
    assert_eq!(answers[0], FakeValue::Num(1500.0));
    assert_eq!(rig.console.last(), Some(&ConsoleCall::Sync));
    assert_eq!(rig.sink.traces, vec![("hello".to_owned(), 6)]);
    assert_eq!(rig.sink.exits, 1);
}
