use crate::color::Color;
use crate::mesh::{Mesh, TextureRect, Topology};

/// Corner of the texture rectangle a cube vertex samples.
#[derive(Clone, Copy)]
enum Corner {
    /// `(u0, v0)`
    LowLow,
    /// `(u1, v0)`
    HighLow,
    /// `(u0, v1)`
    LowHigh,
    /// `(u1, v1)`
    HighHigh,
}

impl Corner {
    fn uv(self, rect: &TextureRect) -> [f32; 2] {
        match self {
            Corner::LowLow => [rect.u0, rect.v0],
            Corner::HighLow => [rect.u1, rect.v0],
            Corner::LowHigh => [rect.u0, rect.v1],
            Corner::HighHigh => [rect.u1, rect.v1],
        }
    }
}

struct Face {
    normal: [f32; 3],
    positions: [[f32; 3]; 6],
    corners: [Corner; 6],
}

use Corner::{HighHigh as HH, HighLow as HL, LowHigh as LH, LowLow as LL};

#[rustfmt::skip]
const FACES: [Face; 6] = [
    // Front (Z+)
    Face {
        normal: [0.0, 0.0, 1.0],
        positions: [
            [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
            [-1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
        ],
        corners: [LH, LL, HL, LH, HL, HH],
    },
    // Right (X+)
    Face {
        normal: [1.0, 0.0, 0.0],
        positions: [
            [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
            [ 1.0,  1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0],
        ],
        corners: [LH, LL, HL, LH, HL, HH],
    },
    // Back (Z-)
    Face {
        normal: [0.0, 0.0, -1.0],
        positions: [
            [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0],
            [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0],
        ],
        corners: [LL, HL, LH, HL, HH, LH],
    },
    // Left (X-)
    Face {
        normal: [-1.0, 0.0, 0.0],
        positions: [
            [-1.0, -1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
            [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0, -1.0],
        ],
        corners: [LL, HH, LH, HL, HH, LL],
    },
    // Top (Y+)
    Face {
        normal: [0.0, 1.0, 0.0],
        positions: [
            [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
            [-1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
        ],
        corners: [LL, HL, LH, LH, HL, HH],
    },
    // Bottom (Y-)
    Face {
        normal: [0.0, -1.0, 0.0],
        positions: [
            [-1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
            [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0],
        ],
        corners: [HH, LL, HL, HH, LH, LL],
    },
];

/// A cube spanning `[-1, 1]` on every axis as a plain triangle list.
///
/// Six faces of two triangles each (36 vertices) with per-face axis-aligned
/// normals. Every face maps the corners of the same atlas rectangle, so the
/// rectangle is reused per face rather than unfolded as a cube map.
pub fn cube(rect: TextureRect, color: Color) -> Mesh {
    let mut mesh = Mesh::with_capacity(Topology::Triangles, 36);

    for face in &FACES {
        for (position, corner) in face.positions.iter().zip(face.corners) {
            mesh.push_vertex(*position, face.normal, corner.uv(&rect), color);
        }
    }

    mesh
}
