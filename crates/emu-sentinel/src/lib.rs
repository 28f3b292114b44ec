//! The Sentinel on an emulated ZX Spectrum.
//!
//! A 48K snapshot of the game runs on the `zilog-z80` core. Known points in
//! the game's code are hooked so the host sees game events (title screen,
//! landscape generated, objects changing, sounds) and can feed in input,
//! while the game's own data structures are read back as 3D models.
//!
//! ```no_run
//! use emu_sentinel::{NoEvents, Sentinel, SentinelConfig};
//!
//! let mut game = Sentinel::from_config(&SentinelConfig::default())?;
//! game.run_frame(&mut NoEvents, true)?;
//! # Ok::<(), emu_sentinel::Error>(())
//! ```

pub mod angles;
mod config;
mod error;
mod events;
pub mod extract;
mod frame;
mod game_hooks;
pub mod glyph;
mod hooks;
pub mod layout;
mod loader;
mod machine;
mod memory;
mod model;
mod pacer;
pub mod palette;
pub mod patches;
mod sentinel;

pub use config::{DEFAULT_GAME_SPEED, MAX_GAME_SPEED, MIN_GAME_SPEED, SentinelConfig};
pub use error::{Error, Result};
pub use events::{InputAction, LANDSCAPE_0000_CODE, NoEvents, SentinelEvents};
pub use frame::{CPU_CLOCK, CYCLES_BEFORE_INT, CYCLES_PER_FRAME, CYCLES_PER_INT, FRAMES_PER_SECOND};
pub use game_hooks::{DEBUG_HOOKS, GameHook, HOOKS};
pub use hooks::{HookContext, HookEntry, HookFn, HookTable};
pub use loader::{decode, load_program, read_file};
pub use machine::{BREAKPOINT_OPCODE, Machine};
pub use memory::{MEM_SIZE, MemoryImage, RAM_SIZE, RAM_START, ROM_SIZE};
pub use model::{Model, ModelType, Vec3, Vertex};
pub use pacer::InterruptPacer;
pub use sentinel::{MAX_STATE_FRAMES, SeenState, Sentinel};
