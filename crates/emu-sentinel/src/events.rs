//! Callbacks fired from code hooks into the host.

/// Secret code the game expects for landscape 0000.
pub const LANDSCAPE_0000_CODE: u32 = 0x7591_4644;

/// Player actions, as stored in the game's object action byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InputAction {
    CreateRobot = 0x00,
    CreateTree = 0x02,
    CreateBoulder = 0x03,
    Absorb = 0x20,
    Transfer = 0x21,
    Hyperspace = 0x22,
    UTurn = 0x23,
}

impl InputAction {
    /// Decode an action byte. Returns `None` for codes the game never
    /// stores.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::CreateRobot),
            0x02 => Some(Self::CreateTree),
            0x03 => Some(Self::CreateBoulder),
            0x20 => Some(Self::Absorb),
            0x21 => Some(Self::Transfer),
            0x22 => Some(Self::Hyperspace),
            0x23 => Some(Self::UTurn),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Events raised by the emulated game.
///
/// Every method has a do-nothing default so hosts implement only what
/// they use. Callbacks run synchronously inside the frame that raised
/// them.
pub trait SentinelEvents {
    /// The title screen is waiting for a key.
    fn on_title_screen(&mut self) {}

    /// The game wants a landscape number. Returns the landscape and its
    /// secret code, both BCD.
    fn on_landscape_input(&mut self) -> (u16, u32) {
        (0x0000, LANDSCAPE_0000_CODE)
    }

    /// Landscape generation has placed its remaining objects.
    fn on_landscape_generated(&mut self) {}

    /// A fresh player view is ready.
    fn on_new_player_view(&mut self) {}

    /// The player has run out of energy.
    fn on_player_dead(&mut self) {}

    /// The game is polling for an action. `action` holds the keyboard
    /// bits the game read and may be rewritten.
    fn on_input_action(&mut self, _action: &mut u8) {}

    /// An object slot changed type or position.
    fn on_game_model_changed(&mut self, _index: u8, _player_initiated: bool) {}

    /// Decide whether `action` may target the tile under the cursor.
    /// Returns the tile's `(x, z)` if it may.
    fn on_target_action_tile(&mut self, _action: InputAction) -> Option<(u8, u8)> {
        None
    }

    fn on_hide_energy_panel(&mut self) {}

    fn on_add_energy_symbol(&mut self, _symbol: u8, _x_offset: u8) {}

    fn on_play_tune(&mut self, _tune: u8) {}

    /// `object` is the slot the sound comes from.
    fn on_sound_effect(&mut self, _effect: u8, _object: u8) {}
}

/// A host that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl SentinelEvents for NoEvents {}
