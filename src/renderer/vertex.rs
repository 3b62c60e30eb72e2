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

/// Storybook palette
pub mod colors {
    pub const SKY: [f32; 4] = [0.53, 0.78, 0.92, 1.0];
    pub const NIGHT_SKY: [f32; 4] = [0.1, 0.12, 0.3, 1.0];
    pub const HILLS_FAR: [f32; 4] = [0.36, 0.6, 0.42, 1.0];
    pub const TREES_NEAR: [f32; 4] = [0.12, 0.38, 0.2, 1.0];
    pub const GROUND: [f32; 4] = [0.42, 0.3, 0.18, 1.0];
    pub const GRASS: [f32; 4] = [0.02, 0.31, 0.23, 1.0];
    pub const ROAD: [f32; 4] = [0.32, 0.32, 0.36, 1.0];
    pub const ROAD_STRIPE: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const FINISH: [f32; 4] = [0.95, 0.95, 0.95, 1.0];

    pub const HERO: [f32; 4] = [0.86, 0.15, 0.15, 1.0];
    pub const SKIN: [f32; 4] = [0.98, 0.82, 0.68, 1.0];
    pub const LIMB: [f32; 4] = [0.25, 0.18, 0.12, 1.0];
    pub const PURSUER: [f32; 4] = [0.45, 0.45, 0.5, 1.0];
    pub const ALLY: [f32; 4] = [0.55, 0.35, 0.2, 1.0];
    pub const RIVAL: [f32; 4] = [0.85, 0.85, 0.8, 1.0];
    pub const TORTOISE: [f32; 4] = [0.3, 0.6, 0.25, 1.0];

    pub const LOG: [f32; 4] = [0.47, 0.29, 0.13, 1.0];
    pub const BRANCH: [f32; 4] = [0.33, 0.22, 0.1, 1.0];
    pub const STAR: [f32; 4] = [0.98, 0.8, 0.08, 1.0];
    pub const CARRIAGE: [f32; 4] = [0.92, 0.55, 0.15, 1.0];
    pub const BOOST: [f32; 4] = [0.98, 0.8, 0.08, 1.0];

    pub const TARGET: [f32; 4] = [0.55, 0.38, 0.25, 0.6];
    pub const TARGET_FILL: [f32; 4] = [0.8, 0.3, 0.2, 0.9];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const SQUARE: [f32; 4] = [0.75, 0.28, 0.22, 1.0];
    pub const CIRCLE: [f32; 4] = [0.25, 0.5, 0.85, 1.0];
    pub const TRIANGLE: [f32; 4] = [0.95, 0.75, 0.2, 1.0];
    pub const ROSE: [f32; 4] = [0.9, 0.2, 0.35, 1.0];
    pub const VIOLET: [f32; 4] = [0.55, 0.3, 0.85, 1.0];
    pub const DAISY: [f32; 4] = [0.98, 0.98, 0.9, 1.0];
    pub const WEED: [f32; 4] = [0.4, 0.5, 0.15, 1.0];
    pub const STEM: [f32; 4] = [0.2, 0.55, 0.2, 1.0];

    pub const GOOD: [f32; 4] = [0.2, 0.8, 0.3, 1.0];
    pub const BAD: [f32; 4] = [0.9, 0.2, 0.2, 1.0];

    pub const WIN_BAND: [f32; 4] = [0.2, 0.75, 0.3, 0.35];
    pub const LOSE_BAND: [f32; 4] = [0.8, 0.15, 0.15, 0.35];
    pub const MENU_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const CLEAR: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

/// Same color with a different alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha(colors::HERO, 0.5)[3], 0.5);
        assert_eq!(with_alpha(colors::HERO, 0.5)[0], colors::HERO[0]);
    }
}
