//! Reading landscape and object geometry out of game memory.

use std::f32::consts::PI;

use crate::angles::{pitch_to_radians, yaw_to_radians};
use crate::layout::{
    self, BASE_VERTEX_INDEX, MAP_SIZE, MAX_OBJECTS, NUM_MODELS, NUM_VERTICES, VERTICES_PER_TILE,
    map_address,
};
use crate::memory::MemoryImage;
use crate::model::{Model, ModelType, Vec3, Vertex};

/// Outline colour in the high nibble, fill colour in the low nibble.
#[rustfmt::skip]
const FACE_COLOURS: [u8; NUM_VERTICES] = [
    0x00, 0x00, 0x00, 0x02, 0x02, 0x20, 0x20, 0x99, 0x99, 0xCC, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C,
    0x99, 0x99, 0x0C, 0x00, 0x66, 0x66, 0x99, 0x99, 0x00, 0x00, 0x99, 0x00, 0x00, 0x00, 0x00, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x00, 0x66, 0x00, 0x00, 0x00, 0x00, 0x66, 0x66, 0x00,
    0x09, 0x09, 0x09, 0x09, 0x00, 0x00, 0x00, 0x00, 0xDD, 0xDD, 0x00, 0x44, 0x55, 0x44, 0x55, 0x44,
    0x55, 0x44, 0x55, 0xFF, 0xFF, 0xFF, 0xFF, 0xBB, 0xBB, 0xBB, 0xBB, 0x00, 0xFF, 0x00, 0xDD, 0xDD,
    0x03, 0x03, 0x00, 0x55, 0x55, 0x44, 0x00, 0x00, 0x02, 0x02, 0x02, 0x00, 0x00, 0x99, 0x02, 0x02,
    0x00, 0x00, 0x99, 0x99, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x66, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x00, 0x00, 0x33, 0x33, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x09, 0x09, 0x09, 0x09, 0x00, 0x66, 0x66, 0x00, 0x22, 0x00, 0x22, 0x99, 0x99, 0x99,
    0x99, 0x33, 0x33, 0x33, 0x00, 0x00, 0x22, 0x33, 0x00, 0x00, 0x22, 0x33, 0x00, 0x00, 0x22, 0x33,
];

/// Polygons never have more vertices than this.
const MAX_POLYGON_VERTICES: usize = 16;

const FLAT_COLOURS: [u32; 2] = [0x03, 0x01];
const SLOPE_COLOURS: [u32; 2] = [0x11, 0x10];

const TILES: u8 = MAP_SIZE - 1;

/// Map entries at or above this hold an object stack instead of a height.
const OBJECT_STACK: u8 = 0xC0;

/// Height and shape byte for a map vertex, looking through any stack of
/// objects to the ground beneath.
fn ground_entry(memory: &MemoryImage, x: u8, z: u8) -> u8 {
    let mut map_entry = memory.peek(map_address(x, z));
    if map_entry >= OBJECT_STACK {
        let mut entry = map_entry;
        for _ in 0..MAX_OBJECTS {
            if entry <= 0x40 {
                break;
            }
            let slot = u16::from(entry & 0x3F);
            map_entry = memory.peek(layout::OBJECTS_Y + slot) << 4;
            entry = memory.peek(layout::OBJECTS_UNDER + slot);
        }
    }
    map_entry
}

/// Shape nibble of the tile whose back-left corner is `(x, z)`.
#[must_use]
pub fn tile_shape(memory: &MemoryImage, x: u8, z: u8) -> u8 {
    ground_entry(memory, x, z) & 0x0F
}

/// Tile containing a vertex of the landscape model, assuming six
/// vertices per tile.
#[must_use]
pub fn landscape_vertex_to_tile(vertex_index: usize) -> (u8, u8) {
    let tile = vertex_index / VERTICES_PER_TILE;
    let tiles = usize::from(TILES);
    ((tile % tiles) as u8, (tile / tiles) as u8)
}

/// Triangulated landscape, centred on the origin.
#[must_use]
pub fn extract_landscape(memory: &MemoryImage) -> Model {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let half = f32::from(MAP_SIZE / 2);

    for z in 0..TILES {
        for x in 0..TILES {
            let shape = tile_shape(memory, x, z);
            let alternate = usize::from((x ^ z) & 1);
            let colour = if shape == 0 {
                FLAT_COLOURS[alternate]
            } else {
                SLOPE_COLOURS[alternate]
            };

            let mut corners = [Vertex::default(); 4];
            for zz in 0..2u8 {
                for xx in 0..2u8 {
                    let (map_x, map_z) = (x + xx, z + zz);
                    let height = ground_entry(memory, map_x, map_z) >> 4;
                    corners[usize::from(zz * 2 + xx)] = Vertex::new(
                        f32::from(map_x) - half - 0.5,
                        f32::from(height),
                        f32::from(map_z) - half - 0.5,
                        colour,
                        f32::from(xx),
                        f32::from(zz),
                    );
                }
            }

            let base = vertices.len() as u32;
            match shape {
                // Flat, or sloping along one axis: a shared quad.
                0b0000 | 0b0001 | 0b0101 | 0b1001 | 0b1101 => {
                    vertices.extend_from_slice(&corners);
                    indices.extend([0, 2, 3, 0, 3, 1].map(|i| base + i));
                }
                // Corners split along the 0-3 diagonal.
                0b0010 | 0b0011 | 0b0100 | 0b1010 | 0b1011 | 0b1100 => {
                    vertices.extend([0, 2, 3, 0, 3, 1].map(|i| corners[i]));
                    indices.extend((0..6).map(|i| base + i));
                }
                // Corners split along the 1-2 diagonal.
                0b0110 | 0b0111 | 0b1110 | 0b1111 => {
                    vertices.extend([0, 2, 1, 1, 2, 3].map(|i| corners[i]));
                    indices.extend((0..6).map(|i| base + i));
                }
                _ => {}
            }
        }
    }

    let mut landscape = Model::new(ModelType::Landscape, vertices, indices);
    landscape.pos = Vec3::new(half, 0.0, half);
    landscape
}

/// Model vertex from the game's polar form: angle around the vertical,
/// signed height, and distance from the axis.
#[must_use]
pub fn polar_to_cartesian(yaw: u8, y: u8, magnitude: u8) -> Vertex {
    let angle = yaw_to_radians(yaw);
    let magnitude = f32::from(magnitude);
    let y = f32::from(y);
    let height = if y < 128.0 { y } else { 128.0 - y };
    Vertex::new(
        magnitude * angle.sin() / 256.0,
        height * 2.0 / 256.0,
        magnitude * angle.cos() / 256.0,
        0,
        0.0,
        0.0,
    )
}

/// The ten built-in object models, in object type order.
#[must_use]
pub fn master_models(memory: &MemoryImage) -> Vec<Model> {
    let vertex_indices = memory.slice(layout::MODEL_VERTEX_INDICES, NUM_MODELS + 1);
    let face_indices = memory.slice(layout::MODEL_FACE_INDICES, NUM_MODELS + 1);
    let coords = memory.slice(layout::MODEL_COORDS, NUM_VERTICES * 3);
    let (angles, rest) = coords.split_at(NUM_VERTICES);
    let (ys, mags) = rest.split_at(NUM_VERTICES);
    let lsbs = memory.slice(layout::FACE_ADDRESS_LSBS, NUM_VERTICES);
    let msbs = memory.slice(layout::FACE_ADDRESS_MSBS, NUM_VERTICES);

    let all_vertices: Vec<Vertex> = (0..NUM_VERTICES)
        .map(|i| polar_to_cartesian(angles[i], ys[i], mags[i]))
        .collect();

    (0..NUM_MODELS)
        .map(|m| {
            let mut vertices = Vec::new();
            let mut indices = Vec::new();
            let first_vertex = usize::from(vertex_indices[m]);

            for face in usize::from(face_indices[m])..usize::from(face_indices[m + 1]) {
                let Some(&colours) = FACE_COLOURS.get(face) else {
                    break;
                };
                let address = u16::from_le_bytes([lsbs[face], msbs[face]]);
                let polygon = memory.slice(address, MAX_POLYGON_VERTICES);
                let base = vertices.len();

                for (n, &number) in polygon.iter().enumerate() {
                    if n > 0 && number == polygon[0] {
                        break;
                    }
                    let Some(vertex) = (first_vertex + usize::from(number))
                        .checked_sub(usize::from(BASE_VERTEX_INDEX))
                        .and_then(|i| all_vertices.get(i))
                    else {
                        break;
                    };
                    let mut vertex = *vertex;
                    vertex.colour = u32::from(colours & 0x0F);
                    vertex.texcoord = [f32::from(n as u8 & 1), f32::from((n as u8 & 2) >> 1)];
                    vertices.push(vertex);
                }

                let count = vertices.len() - base;
                if count < 3 {
                    vertices.truncate(base);
                    continue;
                }
                let base = base as u32;
                indices.extend([base, base + 1, base + 2]);
                if count == 4 {
                    indices.extend([base, base + 2, base + 3]);
                }
            }

            Model::new(ModelType::from_object_type(m as u8), vertices, indices)
        })
        .collect()
}

/// Copy of a master model, or the empty model for types without one.
#[must_use]
pub fn model_for_type(models: &[Model], model_type: ModelType) -> Model {
    models
        .get(model_type as usize)
        .cloned()
        .unwrap_or_default()
}

/// The object in slot `idx`, placed in the world. Slots whose "under" byte
/// has bit 7 set are empty unless `ignore_under` is set.
#[must_use]
pub fn object_model(memory: &MemoryImage, models: &[Model], idx: u8, ignore_under: bool) -> Model {
    if !ignore_under && memory.peek(layout::OBJECTS_UNDER + u16::from(idx)) & 0x80 != 0 {
        return Model::default();
    }

    let slot = u16::from(idx & 0x3F);
    let object_type = memory.peek(layout::OBJECTS_TYPE + slot);
    let mut model = models
        .get(usize::from(object_type))
        .cloned()
        .unwrap_or_default();

    model.id = Some(idx);
    model.pos = Vec3::new(
        f32::from(memory.peek(layout::OBJECTS_X + slot)),
        f32::from(memory.peek(layout::OBJECTS_Y + slot))
            + f32::from(memory.peek(layout::OBJECTS_Y_FRACTION + slot)) / 256.0,
        f32::from(memory.peek(layout::OBJECTS_Z + slot)),
    );
    model.rot.y = yaw_to_radians(memory.peek(layout::OBJECTS_YAW + slot));

    // Robots carry the view pitch.
    if model.model_type == ModelType::Robot {
        model.rot.x = pitch_to_radians(memory.peek(layout::OBJECTS_PITCH + slot));
    }
    model
}

/// Title-screen letters: every tile with a non-zero low nibble becomes the
/// master model of that number, raised and turned to face the viewer.
#[must_use]
pub fn extract_text(memory: &MemoryImage, models: &[Model]) -> Vec<Model> {
    let mut letters = Vec::new();
    for z in 0..TILES {
        for x in 0..TILES {
            let entry = memory.peek(map_address(x, z)) & 0x0F;
            if entry != 0 {
                let mut model = models.get(usize::from(entry)).cloned().unwrap_or_default();
                model.pos = Vec3::new(f32::from(x), 2.0, f32::from(z));
                model.rot.y = PI;
                letters.push(model);
            }
        }
    }
    letters
}

/// Every occupied object slot, upright.
#[must_use]
pub fn extract_placed_models(memory: &MemoryImage, models: &[Model]) -> Vec<Model> {
    (0..MAX_OBJECTS)
        .map(|idx| {
            let mut model = object_model(memory, models, idx, false);
            model.rot.x = 0.0;
            model
        })
        .filter(|model| model.model_type != ModelType::Unknown)
        .collect()
}

/// The player's robot, with its view pitch.
#[must_use]
pub fn extract_player_model(memory: &MemoryImage, models: &[Model]) -> Model {
    let idx = memory.peek(layout::PLAYER_OBJECT_INDEX);
    let mut model = object_model(memory, models, idx, true);
    model.rot.x = pitch_to_radians(memory.peek(layout::OBJECTS_PITCH + u16::from(idx & 0x3F)));
    model
}
