//! Generated mesh data and the vertex formats it is uploaded as.
//!
//! This module holds the CPU-side results of the shape generators:
//!
//! - [`Mesh`]: positions, normals, texture coordinates, colors and optional indices
//! - [`Topology`]: how the renderer must assemble the vertex list into primitives
//! - [`TextureRect`]: the sub-region of a texture atlas a mesh samples from
//! - [`Vertex3d`] / [`LineVertex`]: interleaved GPU vertex formats
//!
//! Meshes are generated once at startup and never change afterwards. Every
//! frame and every part that reuses a shape reads the same [`Mesh`].
//!
//! # Vertex Layout
//!
//! [`Vertex3d`] is 32 bytes per vertex:
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |
//!
//! [`LineVertex`] is 28 bytes: position (location 0) and RGBA color (location 1).

use crate::color::Color;

/// A vertex for lit, textured geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Model-space position.
    pub position: [f32; 3],
    /// Surface normal.
    pub normal: [f32; 3],
    /// Atlas texture coordinates.
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A vertex for unlit, per-vertex colored lines.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

/// Primitive assembly implied by a generator's emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    /// First vertex is the hub, every following pair closes a triangle (Circle).
    TriangleFan,
    /// Each new vertex forms a triangle with the previous two (Cylinder).
    TriangleStrip,
    /// Indexed triangle list (Torus).
    IndexedTriangles,
    /// Plain triangle list, three vertices per triangle (Cube).
    Triangles,
    /// Independent segments, two vertices per line (CoordinateSystem).
    Lines,
}

/// A rectangle `(u0, u1) × (v0, v1)` inside a shared texture atlas.
///
/// The bounds are not required to be ordered; `v0 > v1` flips the region
/// vertically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureRect {
    pub u0: f32,
    pub u1: f32,
    pub v0: f32,
    pub v1: f32,
}

impl Default for TextureRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl TextureRect {
    /// The whole atlas.
    pub const FULL: TextureRect = TextureRect::new([0.0, 1.0], [0.0, 1.0]);

    /// Builds a rectangle from its U range and V range.
    pub const fn new(u: [f32; 2], v: [f32; 2]) -> Self {
        Self {
            u0: u[0],
            u1: u[1],
            v0: v[0],
            v1: v[1],
        }
    }

    pub fn width(&self) -> f32 {
        self.u1 - self.u0
    }

    pub fn height(&self) -> f32 {
        self.v1 - self.v0
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> [f32; 2] {
        [(self.u0 + self.u1) * 0.5, (self.v0 + self.v1) * 0.5]
    }

    /// Maps `(s, t)` in `[0, 1]²` linearly onto the rectangle.
    pub fn lerp(&self, s: f32, t: f32) -> [f32; 2] {
        [self.u0 + self.width() * s, self.v0 + self.height() * t]
    }
}

/// Immutable generated geometry.
///
/// `positions`, `colors` and (for lit shapes) `normals` and `texture_coord`
/// are parallel lists: entry `i` of each describes vertex `i`. Line meshes
/// carry no normals or texture coordinates, so those lists are empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub(crate) positions: Vec<[f32; 3]>,
    pub(crate) normals: Vec<[f32; 3]>,
    pub(crate) texture_coord: Vec<[f32; 2]>,
    pub(crate) colors: Vec<[f32; 4]>,
    pub(crate) indices: Option<Vec<u32>>,
    pub(crate) topology: Topology,
}

impl Mesh {
    /// An empty mesh ready to be filled by a generator.
    pub(crate) fn with_capacity(topology: Topology, vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            texture_coord: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            indices: None,
            topology,
        }
    }

    /// Appends one lit vertex.
    pub(crate) fn push_vertex(
        &mut self,
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
        color: Color,
    ) {
        self.positions.push(position);
        self.normals.push(normal);
        self.texture_coord.push(uv);
        self.colors.push(color.to_array());
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn texture_coord(&self) -> &[[f32; 2]] {
        &self.texture_coord
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Index list, present only for indexed topologies.
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of vertices; the renderer derives draw counts from this.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices, zero for non-indexed meshes.
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    /// Interleaves the lit attributes into GPU vertices.
    ///
    /// Line meshes have no normals or texture coordinates and yield zeros for them.
    pub fn vertices(&self) -> Vec<Vertex3d> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                Vertex3d::new(
                    position,
                    self.normals.get(i).copied().unwrap_or([0.0; 3]),
                    self.texture_coord.get(i).copied().unwrap_or([0.0; 2]),
                )
            })
            .collect()
    }

    /// Interleaves positions and colors into line vertices.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        self.positions
            .iter()
            .zip(self.colors.iter())
            .map(|(&position, &color)| LineVertex { position, color })
            .collect()
    }

    /// Index list that draws this mesh as a plain triangle list.
    ///
    /// Fans are expanded to `[0, i, i + 1]` triangles, indexed meshes return
    /// their own indices, and line or strip meshes return `None`.
    pub fn triangle_list_indices(&self) -> Option<Vec<u32>> {
        match self.topology {
            Topology::TriangleFan => {
                let n = self.vertex_count() as u32;
                Some((1..n.saturating_sub(1)).flat_map(|i| [0, i, i + 1]).collect())
            }
            Topology::IndexedTriangles => self.indices.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan(vertices: usize) -> Mesh {
        let mut mesh = Mesh::with_capacity(Topology::TriangleFan, vertices);
        for i in 0..vertices {
            mesh.push_vertex([i as f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0], Color::WHITE);
        }
        mesh
    }

    #[test]
    fn vertex3d_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex3d>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
    }

    #[test]
    fn texture_rect_helpers() {
        let rect = TextureRect::new([0.1, 0.9], [0.45, 0.55]);
        let c = rect.center();
        assert!((c[0] - 0.5).abs() < 1e-6);
        assert!((c[1] - 0.5).abs() < 1e-6);
        let p = rect.lerp(1.0, 0.0);
        assert!((p[0] - 0.9).abs() < 1e-6);
        assert!((p[1] - 0.45).abs() < 1e-6);
    }

    #[test]
    fn fan_expands_to_triangle_list() {
        let mesh = fan(5);
        assert_eq!(
            mesh.triangle_list_indices().unwrap(),
            vec![0, 1, 2, 0, 2, 3, 0, 3, 4]
        );
    }

    #[test]
    fn degenerate_fan_has_no_triangles() {
        assert!(fan(2).triangle_list_indices().unwrap().is_empty());
        assert!(fan(0).triangle_list_indices().unwrap().is_empty());
    }

    #[test]
    fn interleaved_vertices_follow_attribute_lists() {
        let mesh = fan(3);
        let vertices = mesh.vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[2].position, [2.0, 0.0, 0.0]);
        assert_eq!(vertices[2].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.index_count(), 0);
    }
}
