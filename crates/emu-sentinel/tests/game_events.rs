mod common;

use common::{Recorder, STACK_TOP, Snapshot, rom};
use emu_sentinel::{Error, InputAction, NoEvents, Sentinel, SentinelConfig, layout};

fn sentinel(snapshot: &Snapshot) -> Sentinel {
    Sentinel::new(&rom(), &snapshot.bytes(), &SentinelConfig::default()).expect("sentinel")
}

fn run_one_frame(snapshot: &Snapshot, events: &mut Recorder) -> Sentinel {
    let mut game = sentinel(snapshot);
    game.run_frame(events, false).expect("frame");
    game
}

#[test]
fn title_screen_after_interrupts() {
    let mut snapshot = Snapshot::at(0x5D20);
    snapshot.poke(0x5D20, &[0x76, 0xC3, 0xE5, 0x7F]); // HALT; JP 0x7FE5
    snapshot.poke(0x7FE5, &[0xCD, 0x10, 0x5D]); // CALL wait_key, skipped
    // LD A,5; LD (0xFAC0),A; JR $
    snapshot.poke(0x7FE8, &[0x3E, 0x05, 0x32, 0xC0, 0xFA, 0x18, 0xFE]);

    let mut game = sentinel(&snapshot);
    let mut events = Recorder::default();
    let frames = game
        .run_until(&mut events, "title screen", |e| e.title_screens > 0)
        .expect("title screen");
    assert_eq!(frames, 2);

    for _ in 0..3 {
        game.run_frame(&mut events, true).expect("frame");
    }
    assert_eq!(events.title_screens, 1);
    assert_eq!(game.memory().peek(layout::OBJECTS_TYPE), 5);
    assert_eq!(game.machine().pc(), 0x7FED);
}

#[test]
fn unreachable_state_is_reported() {
    let mut game = sentinel(&Snapshot::new());
    let mut events = Recorder::default();
    let err = game
        .run_until(&mut events, "title screen", |e| e.title_screens > 0)
        .unwrap_err();

    assert!(matches!(
        &err,
        Error::StateTransition { transition, frames: 1000 } if transition == "title screen"
    ));
    assert!(err.to_string().contains("title screen"));
}

#[test]
fn already_reached_state_runs_nothing() {
    let mut game = sentinel(&Snapshot::new());
    let mut events = Recorder::default();
    let frames = game.run_until(&mut events, "anything", |_| true).expect("reached");
    assert_eq!(frames, 0);
    assert_eq!(game.machine().cycles(), 0);
}

#[test]
fn landscape_input_seeds_the_generator() {
    let mut snapshot = Snapshot::at(0x7FF8);
    snapshot.poke(0x7FF8, &[0x3E, 0x00]);
    snapshot.poke(0xAFC9, &[0x21, 0x34, 0x12, 0xC9]); // LD HL,0x1234; RET
    snapshot.poke(0x803A, &[0x18, 0xFE]);

    let mut events = Recorder {
        landscape: (0xE512, 0x1234_5678),
        ..Recorder::default()
    };
    let game = run_one_frame(&snapshot, &mut events);
    let regs = game.machine().regs();

    assert_eq!(events.landscape_requests, 1);
    assert_eq!(regs.c, 0x12);
    // Landscape numbers wrap above DFFF.
    assert_eq!(regs.e, 0x05);
    assert_eq!(regs.hl(), 0x1234);
    assert_eq!(regs.pc, 0x803A);
    assert_eq!(regs.sp, STACK_TOP);
    assert_eq!(
        game.memory().slice(layout::SECRET_CODE_BCD, 8),
        &[0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn generated_secret_code_is_captured() {
    let mut snapshot = Snapshot::at(0x5D20);
    snapshot.poke(0x5D20, &[0x3E, 0x12, 0xC3, 0xA9, 0xAF]); // LD A,0x12; JP 0xAFA9
    snapshot.poke(0x5D10, &[0x3C, 0xC9]); // INC A; RET
    // CALL 0x5D10; CP 0x14; JR NZ,-7; JR $
    snapshot.poke(0xAFA9, &[0xCD, 0x10, 0x5D, 0xFE, 0x14, 0x20, 0xF9, 0x18, 0xFE]);
    snapshot.poke(layout::LANDSCAPE_BCD_LSB, &[0x42, 0x00]);

    let game = run_one_frame(&snapshot, &mut Recorder::default());
    assert_eq!(game.landscape_and_code(), (0x0042, 0x1213));
}

#[test]
fn input_action_can_be_rewritten() {
    let mut snapshot = Snapshot::at(0x8229);
    // LD A,(0x5D40); AND 0x0F; JR $
    snapshot.poke(0x8229, &[0x3A, 0x40, 0x5D, 0xE6, 0x0F, 0x18, 0xFE]);
    snapshot.poke(0x5D40, &[0x01]);

    let mut events = Recorder {
        rewrite_action: Some(0x22),
        ..Recorder::default()
    };
    let game = run_one_frame(&snapshot, &mut events);
    assert_eq!(game.memory().peek(0x5D40), 0x22);
    assert_eq!(game.machine().regs().a, 0x02);

    let game = run_one_frame(&snapshot, &mut Recorder::default());
    assert_eq!(game.memory().peek(0x5D40), 0x01);
    assert_eq!(game.machine().regs().a, 0x01);
}

fn target_check_snapshot(action: u8) -> Snapshot {
    let mut snapshot = Snapshot::at(0x7648);
    // JR C,+2; JR $ (accepted); JR $ (rejected)
    snapshot.poke(0x7648, &[0x38, 0x02, 0x18, 0xFE, 0x18, 0xFE]);
    snapshot.poke(layout::OBJECT_ACTION, &[action]);
    snapshot
}

#[test]
fn accepted_target_marks_the_tile() {
    let mut events = Recorder {
        target: Some((5, 9)),
        ..Recorder::default()
    };
    let game = run_one_frame(&target_check_snapshot(0x20), &mut events);

    assert_eq!(events.target_checks, vec![InputAction::Absorb]);
    assert_eq!(game.machine().pc(), 0x764A);
    for address in layout::TARGET_TILE_X {
        assert_eq!(game.memory().peek(address), 5);
    }
    for address in layout::TARGET_TILE_Z {
        assert_eq!(game.memory().peek(address), 9);
    }
}

#[test]
fn rejected_target_sets_carry() {
    let mut events = Recorder::default();
    let game = run_one_frame(&target_check_snapshot(0x03), &mut events);
    assert_eq!(events.target_checks, vec![InputAction::CreateBoulder]);
    assert_eq!(game.machine().pc(), 0x764C);
}

#[test]
fn unknown_action_is_rejected_without_asking() {
    let mut events = Recorder {
        target: Some((1, 1)),
        ..Recorder::default()
    };
    let game = run_one_frame(&target_check_snapshot(0x01), &mut events);
    assert!(events.target_checks.is_empty());
    assert_eq!(game.machine().pc(), 0x764C);
}

#[test]
fn sound_effect_replaces_the_beeper_routine() {
    let mut snapshot = Snapshot::at(0x5D30);
    // LD A,7; LD C,3; CALL 0xBCAF; JR $
    snapshot.poke(0x5D30, &[0x3E, 0x07, 0x0E, 0x03, 0xCD, 0xAF, 0xBC, 0x18, 0xFE]);

    let mut events = Recorder::default();
    let game = run_one_frame(&snapshot, &mut events);
    assert_eq!(events.effects, vec![(7, 3)]);
    assert_eq!(game.machine().pc(), 0x5D37);
    assert_eq!(game.machine().regs().sp, STACK_TOP);
}

#[test]
fn tune_replaces_the_tune_player() {
    let mut snapshot = Snapshot::at(0x5D30);
    // LD A,4; CALL 0xBBFD; JR $
    snapshot.poke(0x5D30, &[0x3E, 0x04, 0xCD, 0xFD, 0xBB, 0x18, 0xFE]);

    let mut events = Recorder::default();
    let game = run_one_frame(&snapshot, &mut events);
    assert_eq!(events.tunes, vec![4]);
    assert_eq!(game.machine().pc(), 0x5D35);
}

#[test]
fn object_changes_skip_the_redraw() {
    let mut snapshot = Snapshot::at(0x5D30);
    // CALL 0x839D; CALL 0x9007; JR $
    snapshot.poke(0x5D30, &[0xCD, 0x9D, 0x83, 0xCD, 0x07, 0x90, 0x18, 0xFE]);
    snapshot.poke(0x839D, &[0xCD, 0x00, 0x00, 0xC9]);
    snapshot.poke(0x9007, &[0xCD, 0x00, 0x00, 0xC9]);
    snapshot.poke(layout::PLACED_OBJECT_INDEX, &[11]);

    let mut events = Recorder::default();
    let game = run_one_frame(&snapshot, &mut events);
    assert_eq!(events.model_changes, vec![(11, true), (11, false)]);
    assert_eq!(game.machine().pc(), 0x5D36);
}

#[test]
fn energy_panel_events() {
    let mut snapshot = Snapshot::at(0x5D30);
    // LD A,0x10; LD C,0x18; JP 0xBD64
    snapshot.poke(0x5D30, &[0x3E, 0x10, 0x0E, 0x18, 0xC3, 0x64, 0xBD]);
    snapshot.poke(0xBD64, &[0x21, 0x00, 0x00, 0xC3, 0x42, 0xB3]); // LD HL,0; JP 0xB342
    snapshot.poke(0xB342, &[0x3E, 0x00, 0x18, 0xFE]);

    let mut events = Recorder::default();
    run_one_frame(&snapshot, &mut events);
    assert_eq!(events.symbols, vec![(3, 0x10)]);
    assert_eq!(events.panel_hidden, 1);
}

#[test]
fn landscape_generated_and_player_dead() {
    let mut snapshot = Snapshot::at(0xB1B0);
    snapshot.poke(0xB1B0, &[0x3E, 0x00, 0xC3, 0x34, 0xBB]); // LD A,0; JP 0xBB34
    snapshot.poke(0xBB34, &[0xCD, 0x10, 0x5D, 0x18, 0xFE]); // CALL 0x5D10; JR $
    snapshot.poke(0x5D10, &[0xC9]);

    let mut events = Recorder::default();
    let game = run_one_frame(&snapshot, &mut events);
    assert_eq!(events.generated, 1);
    assert_eq!(events.dead, 1);
    assert_eq!(game.machine().pc(), 0xBB37);
}

#[test]
fn default_events_enter_landscape_0000() {
    let mut snapshot = Snapshot::at(0x7FF8);
    snapshot.poke(0x7FF8, &[0x3E, 0x00]);
    snapshot.poke(0xAFC9, &[0x21, 0x00, 0x00, 0xC9]);
    snapshot.poke(0x803A, &[0x18, 0xFE]);

    let mut game = sentinel(&snapshot);
    game.run_frame(&mut NoEvents, false).expect("frame");
    assert_eq!(
        game.memory().slice(layout::SECRET_CODE_BCD, 4),
        &[0x44, 0x46, 0x91, 0x75]
    );
}
