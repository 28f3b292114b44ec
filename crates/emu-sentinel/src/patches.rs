//! Permanent one-byte edits that automate the game's interactive parts.

use tracing::debug;

use crate::config::SentinelConfig;
use crate::error::{Error, Result};
use crate::memory::MemoryImage;

/// ASCII signature identifying the game in the snapshot.
pub const SIGNATURE: &[u8] = b"SENTINEL";
pub const SIGNATURE_ADDR: u16 = 0xC33D;

/// A single byte replaced at load time and never restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    pub address: u16,
    pub value: u8,
}

const fn patch(address: u16, value: u8) -> Patch {
    Patch { address, value }
}

/// Always applied.
pub const AUTOMATION: [Patch; 8] = [
    patch(0xE22F, 0x18), // select Sinclair joystick from the main menu
    patch(0xB8FF, 0xC9), // skip every wait-for-key call
    patch(0x8375, 0x18), // actions work outside cursor mode
    patch(0xBB58, 0xC9), // skip screen disintegration effect
    patch(0x83B9, 0x3E), // drop the 0.8x game speed multiplier
    patch(0x76BF, 0xFF), // higher pitch error ping
    patch(0x85D8, 0x3E), // ignore invalid secret codes
    patch(0x9C84, 0xC3), // skip the game start code check
];

/// Sentinel and sentries never see the player.
pub const INVISIBLE: [Patch; 1] = [patch(0x9024, 0xC3)];

/// No special case for landscape 0000.
pub const TRUE_0000: [Patch; 1] = [patch(0xAFE3, 0x22)];

/// Replace the DAA instructions used in landscape number arithmetic with
/// NOPs, so landscape numbers may contain hex digits.
pub const HEX_LANDSCAPES: [Patch; 3] = [
    patch(0x92B9, 0x00),
    patch(0x92C0, 0x00),
    patch(0xB064, 0x00),
];

/// Fail unless the snapshot carries the game's signature.
pub fn check_signature(memory: &MemoryImage) -> Result<()> {
    if memory.matches(SIGNATURE_ADDR, SIGNATURE) {
        Ok(())
    } else {
        Err(Error::NotSentinel)
    }
}

/// The patches selected by `config`, in application order.
#[must_use]
pub fn selected(config: &SentinelConfig) -> Vec<Patch> {
    let mut patches = AUTOMATION.to_vec();
    if config.invisible {
        patches.extend(INVISIBLE);
    }
    if config.true_0000 {
        patches.extend(TRUE_0000);
    }
    if config.hex_landscapes {
        patches.extend(HEX_LANDSCAPES);
    }
    patches
}

/// Apply the automation patches plus any optional groups the config
/// enables. Applying twice has no further effect.
pub fn apply(memory: &mut MemoryImage, config: &SentinelConfig) {
    let patches = selected(config);
    for p in &patches {
        memory.poke(p.address, p.value);
    }
    debug!(count = patches.len(), "patches applied");
}
