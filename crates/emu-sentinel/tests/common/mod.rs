//! Synthetic Sentinel snapshots for integration tests.
//!
//! The snapshot carries the game's signature, the expected opcode at every
//! hook address and an IM 2 interrupt handler ending in the hooked `RET` at
//! 0xBD97. Everything else is zero (NOPs) apart from what a test pokes in.

#![allow(dead_code)]

use emu_sentinel::{DEBUG_HOOKS, HOOKS, InputAction, SentinelEvents};

pub const ROM_SIZE: usize = 0x4000;
const RAM_BASE: u16 = 0x4000;
const HEADER_SIZE: usize = 27;

/// Idle loop the default snapshot resumes into: `NOP; JR -3`, 16 T-states
/// per pass.
pub const IDLE_LOOP: u16 = 0x5D00;
pub const STACK_TOP: u16 = 0x5B00;

/// IM 2 vector table page; the floating data bus selects 0x5BFF.
const VECTOR_PAGE: u8 = 0x5B;
/// Interrupt handler: ten NOPs, `EI`, then the hooked `RET`.
pub const INT_HANDLER: u16 = 0xBD8C;

pub struct Snapshot {
    ram: Vec<u8>,
    pub pc: u16,
    pub sp: u16,
    pub iff: bool,
    pub im: u8,
    pub i: u8,
}

impl Snapshot {
    pub fn new() -> Self {
        let mut snapshot = Self {
            ram: vec![0; 0xC000],
            pc: IDLE_LOOP,
            sp: STACK_TOP,
            iff: true,
            im: 2,
            i: VECTOR_PAGE,
        };
        snapshot.poke(0xC33D, b"SENTINEL");
        for hook in HOOKS.iter().chain(DEBUG_HOOKS) {
            snapshot.poke(hook.address, &[hook.opcode]);
        }
        snapshot.poke(0x5BFF, &INT_HANDLER.to_le_bytes());
        snapshot.poke(0xBD96, &[0xFB]); // EI, before the RET
        snapshot.poke(IDLE_LOOP, &[0x00, 0x18, 0xFD]);
        snapshot
    }

    /// Resume at `pc` instead of the idle loop.
    pub fn at(pc: u16) -> Self {
        let mut snapshot = Self::new();
        snapshot.pc = pc;
        snapshot
    }

    pub fn poke(&mut self, address: u16, bytes: &[u8]) -> &mut Self {
        let start = usize::from(address - RAM_BASE);
        self.ram[start..start + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address - RAM_BASE)]
    }

    /// SNA file bytes. The resume address is pushed below `sp`.
    pub fn bytes(&self) -> Vec<u8> {
        let mut ram = self.ram.clone();
        let stack = self.sp - 2;
        let offset = usize::from(stack - RAM_BASE);
        ram[offset..offset + 2].copy_from_slice(&self.pc.to_le_bytes());

        let mut data = vec![0u8; HEADER_SIZE];
        data[0] = self.i;
        data[19] = if self.iff { 0x04 } else { 0x00 };
        data[21..23].copy_from_slice(&0xFFFFu16.to_le_bytes());
        data[23..25].copy_from_slice(&stack.to_le_bytes());
        data[25] = self.im;
        data.extend_from_slice(&ram);
        data
    }
}

pub fn rom() -> Vec<u8> {
    vec![0; ROM_SIZE]
}

/// Records every event; answers questions from preset fields.
#[derive(Default)]
pub struct Recorder {
    pub title_screens: u32,
    pub landscape_requests: u32,
    pub generated: u32,
    pub player_views: u32,
    pub dead: u32,
    pub landscape: (u16, u32),
    pub rewrite_action: Option<u8>,
    pub target: Option<(u8, u8)>,
    pub target_checks: Vec<InputAction>,
    pub model_changes: Vec<(u8, bool)>,
    pub panel_hidden: u32,
    pub symbols: Vec<(u8, u8)>,
    pub tunes: Vec<u8>,
    pub effects: Vec<(u8, u8)>,
}

impl SentinelEvents for Recorder {
    fn on_title_screen(&mut self) {
        self.title_screens += 1;
    }

    fn on_landscape_input(&mut self) -> (u16, u32) {
        self.landscape_requests += 1;
        self.landscape
    }

    fn on_landscape_generated(&mut self) {
        self.generated += 1;
    }

    fn on_new_player_view(&mut self) {
        self.player_views += 1;
    }

    fn on_player_dead(&mut self) {
        self.dead += 1;
    }

    fn on_input_action(&mut self, action: &mut u8) {
        if let Some(value) = self.rewrite_action {
            *action = value;
        }
    }

    fn on_game_model_changed(&mut self, index: u8, player_initiated: bool) {
        self.model_changes.push((index, player_initiated));
    }

    fn on_target_action_tile(&mut self, action: InputAction) -> Option<(u8, u8)> {
        self.target_checks.push(action);
        self.target
    }

    fn on_hide_energy_panel(&mut self) {
        self.panel_hidden += 1;
    }

    fn on_add_energy_symbol(&mut self, symbol: u8, x_offset: u8) {
        self.symbols.push((symbol, x_offset));
    }

    fn on_play_tune(&mut self, tune: u8) {
        self.tunes.push(tune);
    }

    fn on_sound_effect(&mut self, effect: u8, object: u8) {
        self.effects.push((effect, object));
    }
}
