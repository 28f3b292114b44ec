//! Error types for loading and running the emulated program.

use std::path::PathBuf;

use format_sna::SnaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ROM image is {len} bytes, expected 16384")]
    RomSize { len: usize },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnaError),

    #[error("snapshot stack pointer ${sp:04X} cannot hold the resume address")]
    StackInRom { sp: u16 },

    #[error("not a Sentinel snapshot")]
    NotSentinel,

    #[error(
        "snapshot is incompatible with code hooks: ${address:04X} holds {found:02X}, expected {expected:02X}"
    )]
    IncompatibleHook { address: u16, expected: u8, found: u8 },

    #[error("cannot hook ROM address ${address:04X}")]
    HookInRom { address: u16 },

    #[error("failed to single-step past hooked instruction at ${address:04X}")]
    SingleStepStalled { address: u16 },

    #[error("{transition} not reached within {frames} frames")]
    StateTransition { transition: String, frames: u32 },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
