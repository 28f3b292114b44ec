//! Models extracted from game memory.

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ModelType {
    Robot = 0,
    Sentry,
    Tree,
    Boulder,
    Meanie,
    Sentinel,
    Pedestal,
    Block1,
    Block2,
    Block3,
    Landscape,
    Letter,
    Icon,
    #[default]
    Unknown,
}

impl ModelType {
    /// The built-in model with this object type byte.
    #[must_use]
    pub const fn from_object_type(value: u8) -> Self {
        match value {
            0 => Self::Robot,
            1 => Self::Sentry,
            2 => Self::Tree,
            3 => Self::Boulder,
            4 => Self::Meanie,
            5 => Self::Sentinel,
            6 => Self::Pedestal,
            7 => Self::Block1,
            8 => Self::Block2,
            9 => Self::Block3,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub pos: Vec3,
    /// Palette index.
    pub colour: u32,
    pub texcoord: [f32; 2],
}

impl Vertex {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, colour: u32, u: f32, v: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            colour,
            texcoord: [u, v],
        }
    }
}

/// An indexed triangle mesh with a placement. Geometry is shared between
/// copies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub model_type: ModelType,
    /// Object slot, for models placed in the world.
    pub id: Option<u8>,
    pub vertices: Arc<[Vertex]>,
    pub indices: Arc<[u32]>,
    pub pos: Vec3,
    /// Pitch in `x`, yaw in `y`, radians.
    pub rot: Vec3,
}

impl Model {
    #[must_use]
    pub fn new(model_type: ModelType, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            model_type,
            vertices: vertices.into(),
            indices: indices.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
