use crate::color::Color;
use crate::mesh::{Mesh, Topology};

/// A single colored segment from `start` to `end`.
pub fn line(start: [f32; 3], end: [f32; 3], color: Color) -> Mesh {
    let mut mesh = Mesh::with_capacity(Topology::Lines, 2);
    mesh.positions.extend_from_slice(&[start, end]);
    mesh.colors.extend_from_slice(&[color.to_array(); 2]);
    mesh
}

/// Debug axes: three segments from `-extent` to `+extent` along X, Y and Z.
///
/// Drawn as a line list, six vertices, one uniform color per axis.
pub fn coordinate_system(extent: f32, x_color: Color, y_color: Color, z_color: Color) -> Mesh {
    let axes = [
        line([-extent, 0.0, 0.0], [extent, 0.0, 0.0], x_color),
        line([0.0, -extent, 0.0], [0.0, extent, 0.0], y_color),
        line([0.0, 0.0, -extent], [0.0, 0.0, extent], z_color),
    ];

    let mut mesh = Mesh::with_capacity(Topology::Lines, 6);
    for axis in &axes {
        mesh.positions.extend_from_slice(&axis.positions);
        mesh.colors.extend_from_slice(&axis.colors);
    }
    mesh
}
