mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{num, Rig};
use pretty_assertions::assert_eq;
use tic_core::layout::MAP_WIDTH;
use tic_core::testing::ConsoleCall;
use tic_core::{Flip, Rotate, SpriteDraw};
use tic_script::testing::{FakeCall, FakeValue};
use tic_wren::BridgeConfig;

const MAP_9: &str = "map(_,_,_,_,_,_,_,_,_)";

type Remap = fn(&mut FakeCall<'_>) -> Result<FakeValue, String>;

/// One frame drawing a `w`x`h` map at cell (`x`, `y`) through `remap`.
fn draw_with(tile: u8, x: i32, y: i32, w: i32, h: i32, remap: Remap) -> Rig {
    let mut rig = Rig::with_update(BridgeConfig::default(), move |cx| {
        let f = cx.closure(remap);
        cx.tic(MAP_9, vec![num(x), num(y), num(w), num(h), num(16), num(24), num(0), num(1), f])?;
        Ok(FakeValue::Null)
    });
    rig.console.ram.map_set(0, 0, tile);
    rig.load().expect("cart loads");
    rig.tick();
    rig
}

fn drawn(rig: &Rig) -> Vec<SpriteDraw> {
    rig.console.sprites().into_iter().cloned().collect()
}

#[test]
fn bare_index_replaces_the_tile() {
    let rig = draw_with(12, 0, 0, 1, 1, |cx| Ok(FakeValue::Num(cx.num(0)? + 1.0)));
    assert!(rig.sink.errors.is_empty(), "{:?}", rig.sink.errors);

    let sprites = drawn(&rig);
    assert_eq!(sprites.len(), 1);
    assert_eq!(
        sprites[0],
        SpriteDraw { index: 13, x: 16, y: 24, colors: [0].into_iter().collect(), ..SpriteDraw::default() }
    );
    assert!(!rig.console.calls.iter().any(|c| matches!(c, ConsoleCall::Map(_))));
}

#[test]
fn triple_carries_flip_and_rotation() {
    let rig = draw_with(12, 0, 0, 1, 1, |cx| Ok(FakeValue::List(vec![cx.arg(0), num(2), num(3)])));
    let sprites = drawn(&rig);
    assert_eq!(sprites[0].index, 12);
    assert_eq!(sprites[0].flip, Flip::VERTICAL);
    assert_eq!(sprites[0].rotate, Rotate::Deg270);
}

#[test]
fn other_answers_keep_the_tile() {
    let rig = draw_with(12, 0, 0, 1, 1, |_| Ok(FakeValue::Str("same".into())));
    assert_eq!(drawn(&rig)[0].index, 12);
}

#[test]
fn cells_wrap_around_the_map() {
    let seen: Rc<RefCell<Vec<(FakeValue, FakeValue)>>> = Rc::default();
    let log = seen.clone();
    let mut rig = Rig::with_update(BridgeConfig::default(), move |cx| {
        for x in [0, MAP_WIDTH, -MAP_WIDTH] {
            let log = log.clone();
            let f = cx.closure(move |cx| {
                log.borrow_mut().push((cx.arg(1), cx.arg(2)));
                Ok(FakeValue::Null)
            });
            cx.tic(MAP_9, vec![num(x), num(0), num(1), num(1), num(0), num(0), num(255), num(1), f])?;
        }
        Ok(FakeValue::Null)
    });
    rig.console.ram.map_set(0, 0, 7);
    rig.load().expect("cart loads");
    rig.tick();

    assert_eq!(*seen.borrow(), vec![(num(0), num(0)); 3]);
    let indices: Vec<i32> = drawn(&rig).iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![7, 7, 7]);
}

#[test]
fn callback_may_call_back_into_the_console() {
    let rig = draw_with(3, 0, 0, 2, 1, |cx| {
        let below = cx.tic("mget(_,_)", vec![cx.arg(1), num(1)])?;
        cx.tic("pix(_,_,_)", vec![cx.arg(1), num(0), num(4)])?;
        Ok(below)
    });
    assert!(rig.sink.errors.is_empty(), "{:?}", rig.sink.errors);
    let indices: Vec<i32> = drawn(&rig).iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 0]);
    let pixels = rig.console.calls.iter().filter(|c| matches!(c, ConsoleCall::Pixel(_, 0, 4))).count();
    assert_eq!(pixels, 2);
}

#[test]
fn failing_callback_stops_the_walk() {
    let rig = draw_with(1, 0, 0, 4, 4, |_| Err("no tiles today".to_string()));
    assert!(drawn(&rig).is_empty());
    assert!(rig.sink.has_error("no tiles today"));
}

#[test]
fn handles_are_released_after_every_draw() {
    let mut rig = draw_with(1, 0, 0, 3, 2, |_| Ok(FakeValue::Null));
    assert_eq!(drawn(&rig).len(), 6);
    assert_eq!(rig.live_handles(), 3);

    rig.tick();
    assert_eq!(rig.live_handles(), 3);
    assert_eq!(rig.bridge.vm().map(|vm| vm.released_handles()), Some(1 + 2 * 2));
}

#[test]
fn null_remap_draws_the_plain_map() {
    let mut rig = Rig::with_update(BridgeConfig::default(), |cx| {
        cx.tic(MAP_9, vec![num(1), num(2), num(3), num(4), num(5), num(6), num(7), num(2), FakeValue::Null])?;
        cx.tic("map()", vec![])?;
        Ok(FakeValue::Null)
    });
    rig.load().expect("cart loads");
    rig.tick();

    let maps: Vec<&ConsoleCall> = rig.console.calls.iter().filter(|c| matches!(c, ConsoleCall::Map(_))).collect();
    assert_eq!(maps.len(), 2);
    match maps[0] {
        ConsoleCall::Map(draw) => {
            assert_eq!((draw.x, draw.y, draw.w, draw.h, draw.sx, draw.sy), (1, 2, 3, 4, 5, 6));
            assert_eq!((draw.chromakey, draw.scale), (7, 2));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(maps[1], &ConsoleCall::Map(Default::default()));
    assert_eq!(rig.live_handles(), 3);
}

#[test]
fn tiles_past_one_byte_reach_the_sprite_bank() {
    let rig = draw_with(255, 0, 0, 1, 1, |cx| Ok(FakeValue::Num(cx.num(0)? + 1.0)));
    assert_eq!(drawn(&rig)[0].index, 256);

    let rig = draw_with(255, 0, 0, 1, 1, |_| Ok(FakeValue::List(vec![num(300), num(1)])));
    let sprites = drawn(&rig);
    assert_eq!(sprites[0].index, 300);
    assert_eq!(sprites[0].flip, Flip::HORIZONTAL);
}

#[test]
fn empty_draws_still_release_their_handles() {
    for (w, h) in [(0, 3), (3, 0)] {
        let rig = draw_with(1, 0, 0, w, h, |_| Err("no cell to visit".to_string()));
        assert!(drawn(&rig).is_empty());
        assert!(rig.sink.errors.is_empty(), "{:?}", rig.sink.errors);
        assert!(!rig.console.calls.iter().any(|c| matches!(c, ConsoleCall::Map(_))));
        assert_eq!(rig.live_handles(), 3);
        assert_eq!(rig.bridge.vm().map(|vm| vm.released_handles()), Some(1 + 2));
    }
}

#[test]
fn huge_coordinates_and_scale_do_not_overflow() {
    let seen: Rc<RefCell<Vec<FakeValue>>> = Rc::default();
    let log = seen.clone();
    let mut rig = Rig::with_update(BridgeConfig::default(), move |cx| {
        let log = log.clone();
        let f = cx.closure(move |cx| {
            log.borrow_mut().push(cx.arg(1));
            Ok(FakeValue::Null)
        });
        let huge = FakeValue::Num(1e10);
        cx.tic(MAP_9, vec![huge.clone(), num(0), num(2), num(1), num(0), num(0), num(255), num(1), f.clone()])?;
        cx.tic(MAP_9, vec![num(0), num(0), num(2), num(1), huge, num(0), num(255), FakeValue::Num(1e9), f])?;
        Ok(FakeValue::Null)
    });
    rig.load().expect("cart loads");
    rig.tick();
    assert!(rig.sink.errors.is_empty(), "{:?}", rig.sink.errors);

    // 1e10 saturates to i32::MAX, which lands on column 127
    assert_eq!(*seen.borrow(), vec![num(127), num(128), num(0), num(1)]);

    let sprites = drawn(&rig);
    assert_eq!(sprites.len(), 4);
    assert_eq!((sprites[0].x, sprites[1].x), (0, 8));
    assert_eq!((sprites[2].x, sprites[3].x), (i32::MAX, i32::MAX));
    assert_eq!(sprites[3].scale, 1_000_000_000);
    assert_eq!(rig.live_handles(), 3);
}
