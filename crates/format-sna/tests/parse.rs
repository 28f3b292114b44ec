use format_sna::{HEADER_SIZE, RAM_BASE, SNA_48K_SIZE, Sna, SnaError};

fn snapshot_with_stack(sp: u16, pc: u16) -> Vec<u8> {
    let mut data = vec![0u8; SNA_48K_SIZE];
    data[23..25].copy_from_slice(&sp.to_le_bytes());
    let offset = HEADER_SIZE + usize::from(sp - RAM_BASE);
    data[offset..offset + 2].copy_from_slice(&pc.to_le_bytes());
    data
}

#[test]
fn parses_48k_snapshot() {
    let data = snapshot_with_stack(0xFF00, 0x8123);
    let sna = Sna::parse(&data).expect("valid snapshot");

    assert_eq!(sna.ram().len(), 0xC000);
    assert_eq!(sna.header().sp, 0xFF00);
    assert_eq!(sna.pc_from_stack(), Some((0x8123, 0xFF02)));
}

#[test]
fn ram_starts_after_header() {
    let mut data = vec![0u8; SNA_48K_SIZE];
    data[HEADER_SIZE] = 0xAA;
    data[SNA_48K_SIZE - 1] = 0x55;
    let sna = Sna::parse(&data).expect("valid snapshot");

    assert_eq!(sna.ram()[0], 0xAA);
    assert_eq!(sna.ram()[0xBFFF], 0x55);
}

#[test]
fn truncated_snapshot_is_rejected() {
    let data = vec![0u8; SNA_48K_SIZE - 1];
    assert_eq!(
        Sna::parse(&data).unwrap_err(),
        SnaError::Truncated {
            len: SNA_48K_SIZE - 1,
            expected: SNA_48K_SIZE,
        }
    );
}

#[test]
fn header_only_is_rejected() {
    assert!(matches!(
        Sna::parse(&[0u8; HEADER_SIZE]),
        Err(SnaError::Truncated { len: 27, .. })
    ));
}

#[test]
fn larger_snapshot_keeps_first_48k() {
    let mut data = snapshot_with_stack(0x8000, 0x1234);
    data.extend_from_slice(&[0xEE; 4]);
    let sna = Sna::parse(&data).expect("oversized snapshot");

    assert_eq!(sna.ram().len(), 0xC000);
    assert_eq!(sna.pc_from_stack(), Some((0x1234, 0x8002)));
}
