//! Solid 3D models built from 1-bit character and icon bitmaps.

use crate::model::{Model, ModelType, Vertex};

/// A filled rectangle of bitmap pixels, `x` counted from the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Depth of an extruded glyph.
const DEPTH: f32 = 0.2;

// Quads as corner numbers: front, top, right, bottom, left, back.
const FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 0, 1],
    [1, 5, 3, 7],
    [2, 3, 6, 7],
    [4, 0, 6, 2],
    [5, 4, 7, 6],
];

const QUAD_TRIANGLES: [u32; 6] = [0, 1, 2, 1, 3, 2];

/// Splits a bitmap (one byte per row, bit 7 leftmost) into rectangles.
///
/// Takes the leftmost run of set bits in the first non-empty row and
/// extends it down over every following row that contains the whole run,
/// clearing the covered bits. Repeats until the bitmap is empty.
#[must_use]
pub fn bits_to_blocks(rows: &[u8]) -> Vec<Block> {
    let mut bits = rows.to_vec();
    let mut blocks = Vec::new();

    while let Some(top) = bits.iter().position(|&row| row != 0) {
        let bitmap = u32::from(bits[top]);

        let mut start = 7i32;
        while start > 0 && bitmap & (1 << start) == 0 {
            start -= 1;
        }
        let mut end = start;
        while end >= 0 && bitmap & (1 << end) != 0 {
            end -= 1;
        }
        let mask = (((1u32 << (start + 1)) - 1) & !((1u32 << (end + 1)) - 1)) as u8;

        let mut bottom = top;
        while bottom < bits.len() && bits[bottom] & mask == mask {
            bits[bottom] &= !mask;
            bottom += 1;
        }

        blocks.push(Block {
            x: (7 - start) as u32,
            y: top as u32,
            w: (start - end) as u32,
            h: (bottom - top) as u32,
        });
    }

    blocks
}

/// Appends a box for `block` to the mesh. The glyph's top row sits at
/// `y = 7 * scale_y` and its front face at `z = 0`.
pub fn append_extruded_block(
    block: Block,
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    colour: u32,
    scale_x: f32,
    scale_y: f32,
) {
    let x = block.x as f32 * scale_x;
    let y = (7.0 - block.y as f32) * scale_y;
    let w = block.w as f32 * scale_x;
    let h = block.h as f32 * scale_y;

    let corners = [
        Vertex::new(x, y, 0.0, colour, 0.0, 1.0),
        Vertex::new(x + w, y, 0.0, colour, 1.0, 1.0),
        Vertex::new(x, y - h, 0.0, colour, 0.0, 0.0),
        Vertex::new(x + w, y - h, 0.0, colour, 1.0, 0.0),
        Vertex::new(x, y, DEPTH, colour, 0.0, 1.0),
        Vertex::new(x + w, y, DEPTH, colour, 1.0, 1.0),
        Vertex::new(x, y - h, DEPTH, colour, 0.0, 0.0),
        Vertex::new(x + w, y - h, DEPTH, colour, 1.0, 0.0),
    ];

    for face in FACES {
        let base = vertices.len() as u32;
        vertices.extend(face.iter().map(|&corner| corners[corner]));
        indices.extend(QUAD_TRIANGLES.iter().map(|i| base + i));
    }
}

/// Extrudes a whole bitmap into a single model.
#[must_use]
pub fn glyph_model(
    rows: &[u8],
    colour: u32,
    scale_x: f32,
    scale_y: f32,
    model_type: ModelType,
) -> Model {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for block in bits_to_blocks(rows) {
        append_extruded_block(block, &mut vertices, &mut indices, colour, scale_x, scale_y);
    }
    Model::new(model_type, vertices, indices)
}
