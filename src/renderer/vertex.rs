//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.36, 0.58, 0.99, 1.0];
    pub const GROUND_TOP: [f32; 4] = [0.44, 0.72, 0.16, 1.0];
    pub const GROUND_SOIL: [f32; 4] = [0.62, 0.38, 0.20, 1.0];
    pub const GROUND_DEEP: [f32; 4] = [0.47, 0.27, 0.12, 1.0];
    pub const BRICK: [f32; 4] = [0.78, 0.31, 0.13, 1.0];
    pub const BRICK_MORTAR: [f32; 4] = [0.60, 0.22, 0.08, 1.0];
    pub const REWARD_BOX: [f32; 4] = [1.0, 0.65, 0.13, 1.0];
    pub const REWARD_DOT: [f32; 4] = [0.85, 0.45, 0.05, 1.0];
    pub const DEAD_BOX: [f32; 4] = [0.56, 0.44, 0.31, 1.0];
    pub const PIPE: [f32; 4] = [0.0, 0.66, 0.0, 1.0];
    pub const PIPE_SHADE: [f32; 4] = [0.0, 0.45, 0.0, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const COIN_EDGE: [f32; 4] = [0.75, 0.50, 0.0, 1.0];
    pub const MUSHROOM_CAP: [f32; 4] = [0.91, 0.16, 0.13, 1.0];
    pub const MUSHROOM_STEM: [f32; 4] = [1.0, 0.87, 0.68, 1.0];
    pub const STAR: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const PLAYER_SUIT: [f32; 4] = [0.91, 0.16, 0.13, 1.0];
    pub const PLAYER_OVERALLS: [f32; 4] = [0.25, 0.35, 0.90, 1.0];
    pub const ENEMY_BODY: [f32; 4] = [0.69, 0.41, 0.13, 1.0];
    pub const ENEMY_FEET: [f32; 4] = [0.47, 0.25, 0.06, 1.0];
    pub const FLAG_POLE: [f32; 4] = [0.56, 0.56, 0.56, 1.0];
    pub const FLAG_CLOTH: [f32; 4] = [0.0, 0.80, 0.0, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HILL: [f32; 4] = [0.30, 0.62, 0.16, 1.0];
}
