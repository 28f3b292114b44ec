//! ZX Spectrum SNA snapshot parser.
//!
//! **48K format** (49,179 bytes): a 27-byte register header followed by the
//! 49,152 bytes of RAM from $4000 to $FFFF. PC is not in the header; the
//! snapshot was taken inside an interrupt, so the resume address sits on
//! the stack at SP.
//!
//! Header layout (16-bit values little-endian):
//!
//! | offset | field |
//! |--------|-------|
//! | 0 | I |
//! | 1 | HL' |
//! | 3 | DE' |
//! | 5 | BC' |
//! | 7 | AF' |
//! | 9 | HL |
//! | 11 | DE |
//! | 13 | BC |
//! | 15 | IY |
//! | 17 | IX |
//! | 19 | interrupt flags (bit 2 = IFF2) |
//! | 20 | R |
//! | 21 | AF |
//! | 23 | SP |
//! | 25 | interrupt mode |
//! | 26 | border colour |

use thiserror::Error;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 27;

/// RAM dump size (48K from $4000-$FFFF).
pub const RAM_SIZE: usize = 0xC000;

/// Address of the first RAM byte in the dump.
pub const RAM_BASE: u16 = 0x4000;

/// Size of a 48K SNA snapshot file.
pub const SNA_48K_SIZE: usize = HEADER_SIZE + RAM_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnaError {
    #[error("snapshot is {len} bytes, expected at least {expected}")]
    Truncated { len: usize, expected: usize },
}

/// Decoded 27-byte register header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnaHeader {
    pub i: u8,
    pub hl_alt: u16,
    pub de_alt: u16,
    pub bc_alt: u16,
    pub af_alt: u16,
    pub hl: u16,
    pub de: u16,
    pub bc: u16,
    pub iy: u16,
    pub ix: u16,
    /// IFF1 and IFF2 both come from bit 2 of the interrupt byte.
    pub iff: bool,
    pub r: u8,
    pub af: u16,
    pub sp: u16,
    pub im: u8,
    pub border: u8,
}

fn word(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

impl SnaHeader {
    /// Decode a header from the first [`HEADER_SIZE`] bytes of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`SnaError::Truncated`] if `data` is shorter than a header.
    pub fn parse(data: &[u8]) -> Result<Self, SnaError> {
        if data.len() < HEADER_SIZE {
            return Err(SnaError::Truncated {
                len: data.len(),
                expected: HEADER_SIZE,
            });
        }

        Ok(Self {
            i: data[0],
            hl_alt: word(data, 1),
            de_alt: word(data, 3),
            bc_alt: word(data, 5),
            af_alt: word(data, 7),
            hl: word(data, 9),
            de: word(data, 11),
            bc: word(data, 13),
            iy: word(data, 15),
            ix: word(data, 17),
            iff: data[19] & 0x04 != 0,
            r: data[20],
            af: word(data, 21),
            sp: word(data, 23),
            im: data[25] & 0x03,
            border: data[26] & 0x07,
        })
    }

    /// The resume address stored at SP, and the SP left after popping it.
    ///
    /// Returns `None` if SP does not point at two bytes of RAM.
    #[must_use]
    pub fn pc_from_stack(&self, ram: &[u8]) -> Option<(u16, u16)> {
        let offset = usize::from(self.sp.checked_sub(RAM_BASE)?);
        let bytes = ram.get(offset..offset + 2)?;
        let pc = u16::from_le_bytes([bytes[0], bytes[1]]);
        Some((pc, self.sp.wrapping_add(2)))
    }
}

/// A parsed 48K snapshot.
#[derive(Debug, Clone)]
pub struct Sna {
    header: SnaHeader,
    ram: Vec<u8>,
}

impl Sna {
    /// Parse a snapshot. Inputs larger than a 48K snapshot (such as 128K
    /// snapshots) are accepted and only the first 48K of RAM is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SnaError::Truncated`] if `data` is shorter than
    /// [`SNA_48K_SIZE`].
    pub fn parse(data: &[u8]) -> Result<Self, SnaError> {
        if data.len() < SNA_48K_SIZE {
            return Err(SnaError::Truncated {
                len: data.len(),
                expected: SNA_48K_SIZE,
            });
        }

        Ok(Self {
            header: SnaHeader::parse(data)?,
            ram: data[HEADER_SIZE..SNA_48K_SIZE].to_vec(),
        })
    }

    #[must_use]
    pub fn header(&self) -> &SnaHeader {
        &self.header
    }

    /// RAM contents from [`RAM_BASE`] upwards.
    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Resume address popped from the stack, and the SP after the pop.
    #[must_use]
    pub fn pc_from_stack(&self) -> Option<(u16, u16)> {
        self.header.pc_from_stack(&self.ram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_offsets() {
        let mut data = [0u8; HEADER_SIZE];
        data[0] = 0x3F;
        data[1..3].copy_from_slice(&[0x34, 0x12]);
        data[7..9].copy_from_slice(&[0xCD, 0xAB]);
        data[17..19].copy_from_slice(&[0x00, 0x5C]);
        data[19] = 0x04;
        data[21..23].copy_from_slice(&[0x44, 0x11]);
        data[23..25].copy_from_slice(&[0xF0, 0xFF]);
        data[25] = 0x02;
        data[26] = 0x0F;

        let header = SnaHeader::parse(&data).expect("header");
        assert_eq!(header.i, 0x3F);
        assert_eq!(header.hl_alt, 0x1234);
        assert_eq!(header.af_alt, 0xABCD);
        assert_eq!(header.ix, 0x5C00);
        assert!(header.iff);
        assert_eq!(header.af, 0x1144);
        assert_eq!(header.sp, 0xFFF0);
        assert_eq!(header.im, 2);
        assert_eq!(header.border, 7);
    }

    #[test]
    fn interrupt_mode_uses_low_bits() {
        let mut data = [0u8; HEADER_SIZE];
        data[25] = 0xFD;
        data[19] = 0xFB;
        let header = SnaHeader::parse(&data).expect("header");
        assert_eq!(header.im, 1);
        assert!(!header.iff);
    }

    #[test]
    fn pc_from_stack_rejects_rom() {
        let header = SnaHeader {
            sp: 0x3FFF,
            ..SnaHeader::default()
        };
        assert_eq!(header.pc_from_stack(&[0; RAM_SIZE]), None);
    }

    #[test]
    fn pc_from_stack_rejects_last_byte() {
        let header = SnaHeader {
            sp: 0xFFFF,
            ..SnaHeader::default()
        };
        assert_eq!(header.pc_from_stack(&[0; RAM_SIZE]), None);
    }
}
