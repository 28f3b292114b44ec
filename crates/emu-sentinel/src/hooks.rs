//! Address-triggered code hooks.
//!
//! Each hooked instruction has its first byte replaced by
//! [`BREAKPOINT_OPCODE`]. When the CPU traps on it, the original byte goes
//! back, the handler runs, the real instruction is single-stepped if the
//! handler left PC alone, and the breakpoint is written back.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::events::SentinelEvents;
use crate::machine::{BREAKPOINT_OPCODE, Machine};
use crate::memory::MemoryImage;

/// Host state a hook handler may touch besides the machine itself.
pub struct HookContext<'a> {
    pub events: &'a mut dyn SentinelEvents,
    /// Secret code digits captured while the game generates them.
    pub secret_code_bcd: &'a mut u32,
}

/// A hook handler. It may read and write memory and registers, redirect
/// PC, or end the current frame.
pub type HookFn = fn(&mut Machine, &mut HookContext<'_>);

#[derive(Clone, Copy)]
pub struct HookEntry {
    /// The instruction byte the breakpoint replaced.
    pub original_opcode: u8,
    pub handler: HookFn,
}

/// Hooks keyed by address.
#[derive(Default)]
pub struct HookTable {
    entries: BTreeMap<u16, HookEntry>,
}

impl HookTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a breakpoint at `address`.
    ///
    /// Fails if memory does not hold `expected_opcode` there (the snapshot
    /// is not the version the hook was written for) or if `address` is in
    /// ROM.
    pub fn register(
        &mut self,
        memory: &mut MemoryImage,
        address: u16,
        expected_opcode: u8,
        handler: HookFn,
    ) -> Result<()> {
        if MemoryImage::is_rom(address) {
            return Err(Error::HookInRom { address });
        }
        let found = memory.peek(address);
        if found != expected_opcode {
            return Err(Error::IncompatibleHook {
                address,
                expected: expected_opcode,
                found,
            });
        }

        memory.poke(address, BREAKPOINT_OPCODE);
        self.entries.insert(
            address,
            HookEntry {
                original_opcode: expected_opcode,
                handler,
            },
        );
        debug!(address = format_args!("{address:04X}"), "hook installed");
        Ok(())
    }

    /// Handle a trap on the breakpoint opcode at `address`.
    ///
    /// Unhooked addresses hold a genuine `LD H,H`, which is executed as
    /// the real instruction.
    pub fn trigger(
        &self,
        machine: &mut Machine,
        context: &mut HookContext<'_>,
        address: u16,
    ) -> Result<()> {
        let Some(entry) = self.entries.get(&address) else {
            trace!(address = format_args!("{address:04X}"), "stray breakpoint opcode");
            machine.single_step();
            return Ok(());
        };

        trace!(address = format_args!("{address:04X}"), "hook");
        machine.memory_mut().poke(address, entry.original_opcode);

        (entry.handler)(machine, context);

        if machine.pc() == address {
            machine.single_step();
        }

        machine.memory_mut().poke(address, BREAKPOINT_OPCODE);

        // Instructions that loop on themselves (block repeats) can't be hooked
        if machine.pc() == address {
            return Err(Error::SingleStepStalled { address });
        }
        Ok(())
    }

    #[must_use]
    pub fn original_opcode(&self, address: u16) -> Option<u8> {
        self.entries.get(&address).map(|entry| entry.original_opcode)
    }

    #[must_use]
    pub fn contains(&self, address: u16) -> bool {
        self.entries.contains_key(&address)
    }

    /// Hooked addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
