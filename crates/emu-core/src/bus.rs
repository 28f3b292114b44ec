//! Memory and I/O bus interface.

/// Memory bus interface.
///
/// The CPU reaches memory only through this trait. The bus decides what
/// each address maps to, including which regions ignore writes.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    ///
    /// Writes to read-only regions are dropped by the bus.
    fn write(&mut self, address: u16, value: u8);
}

/// A bus that also decodes a separate I/O port space.
///
/// The Z80 reaches peripherals with IN and OUT instructions on a 16-bit
/// port address. Machines with nothing attached return `0xFF` (a floating,
/// pulled-up data bus) and ignore writes.
pub trait IoBus: Bus {
    /// Read a byte from the given I/O port.
    fn read_io(&mut self, port: u16) -> u8;

    /// Write a byte to the given I/O port.
    fn write_io(&mut self, port: u16, value: u8);

    /// Value placed on the data bus during an interrupt acknowledge.
    fn interrupt_data(&mut self) -> u8 {
        0xFF
    }
}
