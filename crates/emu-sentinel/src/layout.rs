//! Fixed RAM addresses of the game's data.

pub const SEEN_INDICATOR_FLAGS: u16 = 0x6004;
pub const PLAYER_ENERGY: u16 = 0x600A;
pub const PLAYER_SEEN_FLAGS: u16 = 0x604F;
pub const OBJECT_ACTION: u16 = 0x6061;
pub const SENTRY_COUNT: u16 = 0x606F;

/// Secret code, 4 BCD bytes least significant first, then 4 filler bytes.
pub const SECRET_CODE_BCD: u16 = 0x60F0;
pub const LANDSCAPE_BCD_LSB: u16 = 0x60FD;
pub const LANDSCAPE_BCD_MSB: u16 = 0x60FE;

/// 32x32 landscape map.
pub const MAP: u16 = 0x6100;

pub const PLACED_OBJECT_INDEX: u16 = 0x6501;
pub const PLAYER_OBJECT_INDEX: u16 = 0x650B;

/// Tile targeted by the current action, stored in two places each.
pub const TARGET_TILE_X: [u16; 2] = [0x6524, 0x6591];
pub const TARGET_TILE_Z: [u16; 2] = [0x6526, 0x6595];

// Built-in 3D models
pub const MODEL_VERTEX_INDICES: u16 = 0x6600;
pub const MODEL_FACE_INDICES: u16 = 0x660B;
/// Three planes of vertex coordinates: angle, height, magnitude.
pub const MODEL_COORDS: u16 = 0x66A0;
pub const FACE_ADDRESS_LSBS: u16 = 0x6920;
pub const FACE_ADDRESS_MSBS: u16 = 0x69C0;

pub const PANEL_ICONS: u16 = 0x6CA0;
pub const GAME_FONT: u16 = 0x7400;

// Object arrays, one byte per slot
pub const OBJECTS_UNDER: u16 = 0x5E00;
pub const OBJECTS_PITCH: u16 = 0x5E40;
pub const OBJECTS_X: u16 = 0xF800;
pub const OBJECTS_Y: u16 = 0xF840;
pub const OBJECTS_Z: u16 = 0xF880;
pub const OBJECTS_YAW: u16 = 0xF8C0;
pub const OBJECTS_Y_FRACTION: u16 = 0xF9C0;
pub const OBJECTS_TYPE: u16 = 0xFAC0;

pub const NUM_MODELS: usize = 10;
pub const NUM_VERTICES: usize = 0xA0;
pub const MAX_OBJECTS: u8 = 0x40;
/// Polygon vertex numbers start here.
pub const BASE_VERTEX_INDEX: u8 = 0x40;

/// 32x32 vertices for 31x31 tiles.
pub const MAP_SIZE: u8 = 32;
pub const VERTICES_PER_TILE: usize = 6;

/// Address of the map entry for vertex `(x, z)`.
#[must_use]
pub const fn map_address(x: u8, z: u8) -> u16 {
    let x = x as u16;
    (MAP + ((x & 3) << 8)) | ((x << 3) & 0xE0) | z as u16
}
