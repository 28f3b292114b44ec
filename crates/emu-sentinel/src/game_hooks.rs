//! The game's hook points and their handlers.

#[cfg(debug_assertions)]
use tracing::debug;
use tracing::warn;
use zilog_z80::CF;

use crate::events::InputAction;
use crate::hooks::{HookContext, HookFn};
use crate::layout;
use crate::machine::Machine;

/// One hooked instruction: where it is, the opcode expected there, and
/// what to run in its place.
#[derive(Clone, Copy)]
pub struct GameHook {
    pub address: u16,
    pub opcode: u8,
    pub handler: HookFn,
}

const fn hook(address: u16, opcode: u8, handler: HookFn) -> GameHook {
    GameHook {
        address,
        opcode,
        handler,
    }
}

const INTERRUPT_RETURN: u16 = 0xBD97;
const TITLE_WAIT_KEY: u16 = 0x7FE5;
const LANDSCAPE_PROMPT: u16 = 0x7FF8;
/// Resume point after the secret code has been entered.
const AFTER_CODE_ENTRY: u16 = 0x803A;
/// Seeds the landscape generator from the BCD number in E:C.
const SEED_LANDSCAPE: u16 = 0xAFC9;
const LANDSCAPE_GENERATED: u16 = 0xB1B0;
const PLAYER_VIEW: u16 = 0xB2BC;
#[cfg_attr(not(debug_assertions), allow(dead_code))]
const SECRET_CODE_CHECK: u16 = 0x85A9;
const SECRET_CODE_DIGITS: u16 = 0xAFA9;
const INPUT_ACTION: u16 = 0x822C;
const PLAYER_OBJECT_CHANGE: u16 = 0x839D;
const ENEMY_OBJECT_CHANGE: u16 = 0x9007;
const TARGET_CHECK: u16 = 0x7648;
const HIDE_ENERGY_PANEL: u16 = 0xB342;
const ADD_ENERGY_SYMBOL: u16 = 0xBD64;
const PLAY_TUNE: u16 = 0xBBFD;
const SOUND_EFFECT: u16 = 0xBCAF;
const PLAYER_DEAD: u16 = 0xBB34;

const CALL: u8 = 0xCD;
const RET: u8 = 0xC9;
const LD_A_N: u8 = 0x3E;
const LD_HL_NN: u8 = 0x21;

/// Landscape numbers above DFFF hang the sentry count calculation.
const LANDSCAPE_MSB_LIMIT: u8 = 0xE0;

pub const HOOKS: &[GameHook] = &[
    hook(INTERRUPT_RETURN, RET, end_of_interrupt),
    hook(TITLE_WAIT_KEY, CALL, title_screen),
    hook(LANDSCAPE_PROMPT, LD_A_N, landscape_input),
    hook(SEED_LANDSCAPE, LD_HL_NN, wrap_landscape_number),
    hook(LANDSCAPE_GENERATED, LD_A_N, landscape_generated),
    hook(PLAYER_VIEW, CALL, new_player_view),
    hook(SECRET_CODE_DIGITS, CALL, capture_secret_code),
    hook(INPUT_ACTION, 0xE6, input_action), // AND n
    hook(PLAYER_OBJECT_CHANGE, CALL, player_object_changed),
    hook(ENEMY_OBJECT_CHANGE, CALL, enemy_object_changed),
    hook(TARGET_CHECK, 0x38, target_action_tile), // JR C,e
    hook(HIDE_ENERGY_PANEL, LD_A_N, hide_energy_panel),
    hook(ADD_ENERGY_SYMBOL, LD_HL_NN, add_energy_symbol),
    hook(PLAY_TUNE, 0x32, play_tune), // LD (nn),A
    hook(SOUND_EFFECT, 0xB7, sound_effect), // OR A
    hook(PLAYER_DEAD, CALL, player_dead),
];

/// Hooks installed in debug builds only.
#[cfg(debug_assertions)]
pub const DEBUG_HOOKS: &[GameHook] = &[hook(SECRET_CODE_CHECK, 0x96, log_secret_code)]; // SUB (HL)
#[cfg(not(debug_assertions))]
pub const DEBUG_HOOKS: &[GameHook] = &[];

/// Every hook for this build, in registration order.
pub fn all() -> impl Iterator<Item = &'static GameHook> {
    HOOKS.iter().chain(DEBUG_HOOKS)
}

fn end_of_interrupt(m: &mut Machine, _ctx: &mut HookContext<'_>) {
    m.end_frame();
}

fn title_screen(m: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_title_screen();
    // Skip the wait-for-key CALL.
    m.skip(3);
    m.end_frame();
}

fn landscape_input(m: &mut Machine, ctx: &mut HookContext<'_>) {
    let (landscape, code) = ctx.events.on_landscape_input();

    let memory = m.memory_mut();
    for (address, byte) in (layout::SECRET_CODE_BCD..).zip(code.to_le_bytes()) {
        memory.poke(address, byte);
    }
    // Filler that hides the code from anyone reading memory as ASCII.
    for address in layout::SECRET_CODE_BCD + 4..layout::SECRET_CODE_BCD + 8 {
        memory.poke(address, 0xFF);
    }

    m.jump(AFTER_CODE_ENTRY);
    let [low, high] = landscape.to_le_bytes();
    let regs = m.regs_mut();
    regs.c = low;
    regs.e = high;
    m.call(SEED_LANDSCAPE);
}

fn wrap_landscape_number(m: &mut Machine, _ctx: &mut HookContext<'_>) {
    m.regs_mut().e %= LANDSCAPE_MSB_LIMIT;
}

fn landscape_generated(_m: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_landscape_generated();
}

fn new_player_view(m: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_new_player_view();
    m.end_frame();
}

#[cfg(debug_assertions)]
fn log_secret_code(m: &mut Machine, _ctx: &mut HookContext<'_>) {
    let hl = m.regs().hl();
    if (layout::SECRET_CODE_BCD..=layout::SECRET_CODE_BCD + 3).contains(&hl) {
        debug!(
            address = format_args!("{hl:04X}"),
            digits = format_args!("{:02X}", m.regs().a),
            "expected secret code"
        );
    }
}

fn capture_secret_code(m: &mut Machine, ctx: &mut HookContext<'_>) {
    *ctx.secret_code_bcd = (*ctx.secret_code_bcd << 8) | u32::from(m.regs().a);
}

fn input_action(m: &mut Machine, ctx: &mut HookContext<'_>) {
    let mut action = m.regs().a;
    ctx.events.on_input_action(&mut action);
    m.regs_mut().a = action;

    // Also store it where the preceding LD A,(nn) read it from.
    let source = m.dpeek(m.pc().wrapping_sub(2));
    m.memory_mut().poke(source, action);
}

fn object_changed(m: &mut Machine, ctx: &mut HookContext<'_>, player_initiated: bool) {
    let index = m.memory().peek(layout::PLACED_OBJECT_INDEX);
    ctx.events.on_game_model_changed(index, player_initiated);
    // Skip the drawing CALL.
    m.skip(3);
}

fn player_object_changed(m: &mut Machine, ctx: &mut HookContext<'_>) {
    object_changed(m, ctx, true);
}

fn enemy_object_changed(m: &mut Machine, ctx: &mut HookContext<'_>) {
    object_changed(m, ctx, false);
}

fn target_action_tile(m: &mut Machine, ctx: &mut HookContext<'_>) {
    let code = m.memory().peek(layout::OBJECT_ACTION);
    let target = match InputAction::from_code(code) {
        Some(action) => ctx.events.on_target_action_tile(action),
        None => {
            warn!(code = format_args!("{code:02X}"), "unknown action code");
            None
        }
    };

    // Carry set makes the game reject the target with an error beep.
    match target {
        Some((x, z)) => {
            let memory = m.memory_mut();
            for address in layout::TARGET_TILE_X {
                memory.poke(address, x);
            }
            for address in layout::TARGET_TILE_Z {
                memory.poke(address, z);
            }
            m.regs_mut().f &= !CF;
        }
        None => m.regs_mut().f |= CF,
    }
}

fn hide_energy_panel(_m: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_hide_energy_panel();
}

fn add_energy_symbol(m: &mut Machine, ctx: &mut HookContext<'_>) {
    let regs = m.regs();
    ctx.events.on_add_energy_symbol(regs.c / 8, regs.a);
}

fn play_tune(m: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_play_tune(m.regs().a);
    // Skip the beeper player.
    m.ret();
}

fn sound_effect(m: &mut Machine, ctx: &mut HookContext<'_>) {
    let regs = m.regs();
    ctx.events.on_sound_effect(regs.a, regs.c);
    m.ret();
}

fn player_dead(_m: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_player_dead();
}
