//! The emulated game session.

use std::collections::HashMap;

use tracing::debug;

use crate::angles::{radians_to_pitch, radians_to_yaw};
use crate::config::SentinelConfig;
use crate::error::{Error, Result};
use crate::events::SentinelEvents;
use crate::extract;
use crate::game_hooks;
use crate::glyph::glyph_model;
use crate::hooks::{HookContext, HookTable};
use crate::layout;
use crate::loader::{self, load_program};
use crate::machine::Machine;
use crate::memory::MemoryImage;
use crate::model::{Model, ModelType};
use crate::palette::{self, Rgba};

/// Frames to wait for a game state change before giving up.
pub const MAX_STATE_FRAMES: u32 = 1000;

const CHAR_SCALE: (f32, f32) = (0.1, 0.05);
const ICON_SCALE: (f32, f32) = (0.1, 0.1);
const ICON_ROWS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenState {
    Unseen,
    /// Only the player's head or feet are visible to an enemy.
    HalfSeen,
    FullSeen,
}

/// The Sentinel running on an emulated 48K Spectrum.
///
/// Construction loads and patches the snapshot, installs every game hook
/// and extracts the built-in models. Events are delivered to whichever
/// handler is passed to [`run_frame`](Self::run_frame).
pub struct Sentinel {
    machine: Machine,
    hooks: HookTable,
    secret_code_bcd: u32,
    models: Vec<Model>,
    icon_cache: HashMap<(u8, u32), Model>,
}

impl Sentinel {
    pub fn new(rom: &[u8], snapshot: &[u8], config: &SentinelConfig) -> Result<Self> {
        let mut machine = load_program(rom, snapshot, config)?;

        let mut hooks = HookTable::new();
        for hook in game_hooks::all() {
            hooks.register(machine.memory_mut(), hook.address, hook.opcode, hook.handler)?;
        }

        let models = extract::master_models(machine.memory());
        debug!(hooks = hooks.len(), models = models.len(), "game ready");

        Ok(Self {
            machine,
            hooks,
            secret_code_bcd: 0,
            models,
            icon_cache: HashMap::new(),
        })
    }

    /// Load the ROM and snapshot files named in `config`.
    pub fn from_config(config: &SentinelConfig) -> Result<Self> {
        let rom = loader::read_file(&config.rom)?;
        let snapshot = loader::read_file(&config.snapshot)?;
        Self::new(&rom, &snapshot, config)
    }

    /// Start over from a snapshot. On error the current game is untouched.
    pub fn reload(&mut self, rom: &[u8], snapshot: &[u8], config: &SentinelConfig) -> Result<()> {
        *self = Self::new(rom, snapshot, config)?;
        Ok(())
    }

    // === Running ===

    /// Run one frame, with the 50Hz interrupt if `interrupt` is set.
    pub fn run_frame(&mut self, events: &mut dyn SentinelEvents, interrupt: bool) -> Result<()> {
        let Self {
            machine,
            hooks,
            secret_code_bcd,
            ..
        } = self;
        let mut context = HookContext {
            events,
            secret_code_bcd,
        };
        machine.run_frame(interrupt, &mut |m: &mut Machine, address| {
            hooks.trigger(m, &mut context, address)
        })
    }

    /// Run just the interrupt part of a frame.
    pub fn run_interrupt(&mut self, events: &mut dyn SentinelEvents) -> Result<()> {
        let Self {
            machine,
            hooks,
            secret_code_bcd,
            ..
        } = self;
        let mut context = HookContext {
            events,
            secret_code_bcd,
        };
        machine.run_interrupt(&mut |m: &mut Machine, address| {
            hooks.trigger(m, &mut context, address)
        })
    }

    /// Run whole frames until `reached` holds for the event handler,
    /// returning the number of frames it took.
    ///
    /// Fails after [`MAX_STATE_FRAMES`], naming `transition`, since the
    /// game has then stopped somewhere the hooks don't expect.
    pub fn run_until<E, F>(&mut self, events: &mut E, transition: &str, mut reached: F) -> Result<u32>
    where
        E: SentinelEvents,
        F: FnMut(&E) -> bool,
    {
        for frame in 0..MAX_STATE_FRAMES {
            if reached(events) {
                return Ok(frame);
            }
            self.run_frame(events, true)?;
        }
        if reached(events) {
            return Ok(MAX_STATE_FRAMES);
        }
        Err(Error::StateTransition {
            transition: transition.to_owned(),
            frames: MAX_STATE_FRAMES,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    #[must_use]
    pub fn memory(&self) -> &MemoryImage {
        self.machine.memory()
    }

    pub fn memory_mut(&mut self) -> &mut MemoryImage {
        self.machine.memory_mut()
    }

    #[must_use]
    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    /// The landscape being played and the secret code the game generated
    /// for it, both BCD.
    #[must_use]
    pub fn landscape_and_code(&self) -> (u16, u32) {
        let memory = self.memory();
        let landscape = u16::from_le_bytes([
            memory.peek(layout::LANDSCAPE_BCD_LSB),
            memory.peek(layout::LANDSCAPE_BCD_MSB),
        ]);
        (landscape, self.secret_code_bcd)
    }

    #[must_use]
    pub fn player_seen_state(&self) -> SeenState {
        let memory = self.memory();
        if memory.peek(layout::SEEN_INDICATOR_FLAGS) == 0 {
            SeenState::Unseen
        } else if memory.peek(layout::PLAYER_SEEN_FLAGS) != 0x40 {
            SeenState::FullSeen
        } else {
            SeenState::HalfSeen
        }
    }

    #[must_use]
    pub fn player_energy(&self) -> u8 {
        self.memory().peek(layout::PLAYER_ENERGY)
    }

    /// Point the player's view. Rounds down to the game's pitch steps.
    pub fn set_player_pitch(&mut self, radians: f32) {
        let slot = self.memory().peek(layout::PLAYER_OBJECT_INDEX);
        self.memory_mut()
            .poke(layout::OBJECTS_PITCH + u16::from(slot), radians_to_pitch(radians));
    }

    pub fn set_player_yaw(&mut self, radians: f32) {
        let slot = self.memory().peek(layout::PLAYER_OBJECT_INDEX);
        self.memory_mut()
            .poke(layout::OBJECTS_YAW + u16::from(slot), radians_to_yaw(radians));
    }

    // === Models ===

    /// The built-in model for `model_type`, unplaced.
    #[must_use]
    pub fn model(&self, model_type: ModelType) -> Model {
        extract::model_for_type(&self.models, model_type)
    }

    #[must_use]
    pub fn object_model(&self, idx: u8, ignore_under: bool) -> Model {
        extract::object_model(self.memory(), &self.models, idx, ignore_under)
    }

    #[must_use]
    pub fn tile_shape(&self, x: u8, z: u8) -> u8 {
        extract::tile_shape(self.memory(), x, z)
    }

    #[must_use]
    pub fn landscape_vertex_to_tile(vertex_index: usize) -> (u8, u8) {
        extract::landscape_vertex_to_tile(vertex_index)
    }

    #[must_use]
    pub fn extract_landscape(&self) -> Model {
        extract::extract_landscape(self.memory())
    }

    #[must_use]
    pub fn extract_text(&self) -> Vec<Model> {
        extract::extract_text(self.memory(), &self.models)
    }

    #[must_use]
    pub fn extract_placed_models(&self) -> Vec<Model> {
        extract::extract_placed_models(self.memory(), &self.models)
    }

    #[must_use]
    pub fn extract_player_model(&self) -> Model {
        extract::extract_player_model(self.memory(), &self.models)
    }

    /// A character from the game font as a solid model. Characters below
    /// space have no glyph.
    #[must_use]
    pub fn char_to_model(&self, ch: char, colour: u32) -> Model {
        let Some(index) = (ch as u32).checked_sub(u32::from(b' ')) else {
            return Model::default();
        };
        let address = layout::GAME_FONT.wrapping_add((index * 8) as u16);
        let rows = self.memory().slice(address, 8);
        let (scale_x, scale_y) = CHAR_SCALE;
        glyph_model(rows, colour, scale_x, scale_y, ModelType::Letter)
    }

    /// An energy panel icon as a solid model. Models are cached per icon
    /// and colour.
    pub fn icon_to_model(&mut self, icon: u8, colour: u32) -> Model {
        if let Some(model) = self.icon_cache.get(&(icon, colour)) {
            return model.clone();
        }
        let address = layout::PANEL_ICONS + u16::from(icon) * 8;
        let rows = self.machine.memory().slice(address, ICON_ROWS);
        let (scale_x, scale_y) = ICON_SCALE;
        let model = glyph_model(rows, colour, scale_x, scale_y, ModelType::Icon);
        self.icon_cache.insert((icon, colour), model.clone());
        model
    }

    // === Palettes ===

    /// In-game palette for `sentries` sentries, or for the current
    /// landscape's sentry count when `None`.
    #[must_use]
    pub fn game_palette(&self, sentries: Option<u8>) -> Vec<Rgba> {
        let sentries = sentries
            .unwrap_or_else(|| self.memory().peek(layout::SENTRY_COUNT).wrapping_sub(1));
        palette::game_palette(sentries)
    }

    #[must_use]
    pub fn title_palette(&self) -> Vec<Rgba> {
        palette::title_palette()
    }
}
