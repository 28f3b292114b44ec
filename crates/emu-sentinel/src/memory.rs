//! Flat 64K memory image: 16K ROM followed by 48K RAM.

use emu_core::{Bus, IoBus};

use crate::error::{Error, Result};

pub const ROM_SIZE: usize = 0x4000;
pub const RAM_SIZE: usize = 0xC000;
pub const MEM_SIZE: usize = ROM_SIZE + RAM_SIZE;

/// First writable address.
pub const RAM_START: u16 = 0x4000;

/// The emulated address space.
///
/// Writes below [`RAM_START`] are dropped, whether they come from the CPU
/// or from host code. Nothing is attached to the I/O ports: reads return
/// `0xFF` and writes are ignored.
#[derive(Clone)]
pub struct MemoryImage {
    bytes: Vec<u8>,
}

impl MemoryImage {
    /// Build an image from a 16K ROM and up to 48K of RAM contents. Any RAM
    /// not covered by `ram` is zero.
    pub fn new(rom: &[u8], ram: &[u8]) -> Result<Self> {
        if rom.len() != ROM_SIZE {
            return Err(Error::RomSize { len: rom.len() });
        }

        let mut bytes = vec![0; MEM_SIZE];
        bytes[..ROM_SIZE].copy_from_slice(rom);
        let ram = &ram[..ram.len().min(RAM_SIZE)];
        bytes[ROM_SIZE..ROM_SIZE + ram.len()].copy_from_slice(ram);
        Ok(Self { bytes })
    }

    #[must_use]
    pub const fn is_rom(address: u16) -> bool {
        address < RAM_START
    }

    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bytes[usize::from(address)]
    }

    /// Write a byte. ROM addresses are left untouched.
    pub fn poke(&mut self, address: u16, value: u8) {
        if !Self::is_rom(address) {
            self.bytes[usize::from(address)] = value;
        }
    }

    /// Little-endian word read, wrapping at the top of memory.
    #[must_use]
    pub fn peek16(&self, address: u16) -> u16 {
        u16::from_le_bytes([self.peek(address), self.peek(address.wrapping_add(1))])
    }

    pub fn poke16(&mut self, address: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.poke(address, lo);
        self.poke(address.wrapping_add(1), hi);
    }

    /// Up to `len` bytes starting at `address`, truncated at the top of
    /// memory.
    #[must_use]
    pub fn slice(&self, address: u16, len: usize) -> &[u8] {
        let start = usize::from(address);
        let end = (start + len).min(MEM_SIZE);
        &self.bytes[start..end]
    }

    /// True if memory at `address` holds exactly `expected`.
    #[must_use]
    pub fn matches(&self, address: u16, expected: &[u8]) -> bool {
        self.slice(address, expected.len()) == expected
    }
}

impl Bus for MemoryImage {
    fn read(&mut self, address: u16) -> u8 {
        self.peek(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.poke(address, value);
    }
}

impl IoBus for MemoryImage {
    fn read_io(&mut self, _port: u16) -> u8 {
        0xFF
    }

    fn write_io(&mut self, _port: u16, _value: u8) {}
}
