//! Snapshot loading: ROM plus 48K SNA into a ready-to-run machine.

use std::path::Path;

use format_sna::Sna;
use tracing::debug;
use zilog_z80::Registers;

use crate::config::SentinelConfig;
use crate::error::{Error, Result};
use crate::machine::Machine;
use crate::memory::MemoryImage;
use crate::patches;

/// Read a whole file, naming it in the error.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a ROM image and snapshot into memory and registers.
///
/// Nothing is built unless every check passes, so a failed load never
/// leaves a half-initialised machine behind.
pub fn decode(rom: &[u8], snapshot: &[u8]) -> Result<(MemoryImage, Registers)> {
    let sna = Sna::parse(snapshot)?;
    let header = sna.header();
    let memory = MemoryImage::new(rom, sna.ram())?;
    let (pc, sp) = sna
        .pc_from_stack()
        .ok_or(Error::StackInRom { sp: header.sp })?;

    let mut regs = Registers {
        i: header.i,
        r: header.r,
        ix: header.ix,
        iy: header.iy,
        iff1: header.iff,
        iff2: header.iff,
        im: header.im,
        sp,
        pc,
        ..Registers::default()
    };
    regs.set_af(header.af);
    regs.set_bc(header.bc);
    regs.set_de(header.de);
    regs.set_hl(header.hl);
    regs.set_af_alt(header.af_alt);
    regs.set_bc_alt(header.bc_alt);
    regs.set_de_alt(header.de_alt);
    regs.set_hl_alt(header.hl_alt);

    debug!(
        pc = format_args!("{pc:04X}"),
        sp = format_args!("{sp:04X}"),
        im = regs.im,
        iff = regs.iff1,
        "snapshot decoded"
    );

    Ok((memory, regs))
}

impl Machine {
    /// Create a machine from a ROM image and a snapshot.
    pub fn from_snapshot(rom: &[u8], snapshot: &[u8]) -> Result<Self> {
        let (memory, registers) = decode(rom, snapshot)?;
        Ok(Self::with_registers(memory, registers))
    }

    /// Reload memory and registers from a snapshot. On error the machine
    /// is left exactly as it was.
    pub fn load_snapshot(&mut self, rom: &[u8], snapshot: &[u8]) -> Result<()> {
        let (memory, registers) = decode(rom, snapshot)?;
        self.restore(memory, registers);
        Ok(())
    }
}

/// Load the game: decode, check it really is The Sentinel, then apply the
/// automation patches.
pub fn load_program(rom: &[u8], snapshot: &[u8], config: &SentinelConfig) -> Result<Machine> {
    let mut machine = Machine::from_snapshot(rom, snapshot)?;
    patches::check_signature(machine.memory())?;
    patches::apply(machine.memory_mut(), config);
    Ok(machine)
}
