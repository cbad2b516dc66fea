use std::f32::consts::TAU;

use crate::color::Color;
use crate::mesh::{Mesh, TextureRect, Topology};

/// A ring torus around the Y axis with an index buffer.
///
/// Vertices are laid out slice-major: for every `slice` in `0..=slices` there
/// is one ring of `loops + 1` vertices, the last of which repeats the first so
/// texture coordinates can reach the rectangle's far edge. With
/// `θs = 2π · slice / slices` and `θl = 2π · loop / loops`:
///
/// - position = `((outer + inner·cos θs)·cos θl, inner·sin θs, (outer + inner·cos θs)·sin θl)`
/// - normal = `(cos θl·sin θs, sin θl·sin θs, cos θs)`
/// - uv = `(u0 + u1 · loop / loops, v0 + v1 · slice / slices)`
///
/// Unlike the other generators, the torus reads `rect` as an offset
/// (`u0`, `v0`) plus a scale (`u1`, `v1`).
///
/// Each slice×loop quad becomes two triangles, `slices × loops × 6` indices.
///
/// ```
/// use flatpack::{shapes, Color, TextureRect};
///
/// let tire = shapes::torus(10, 200, 0.2, 0.9, TextureRect::FULL, Color::RED);
/// assert_eq!(tire.vertex_count(), 2211);
/// assert_eq!(tire.index_count(), 12000);
/// ```
pub fn torus(
    slices: u32,
    loops: u32,
    inner_radius: f32,
    outer_radius: f32,
    rect: TextureRect,
    color: Color,
) -> Mesh {
    let per_slice = loops as usize + 1;
    let mut mesh = Mesh::with_capacity(Topology::IndexedTriangles, (slices as usize + 1) * per_slice);

    let slice_span = slices.max(1) as f32;
    let loop_span = loops.max(1) as f32;

    for slice in 0..=slices {
        let v = slice as f32 / slice_span;
        let (sin_s, cos_s) = (v * TAU).sin_cos();
        let ring_radius = outer_radius + inner_radius * cos_s;

        for lp in 0..=loops {
            let u = lp as f32 / loop_span;
            let (sin_l, cos_l) = (u * TAU).sin_cos();

            mesh.push_vertex(
                [ring_radius * cos_l, inner_radius * sin_s, ring_radius * sin_l],
                [cos_l * sin_s, sin_l * sin_s, cos_s],
                [rect.u0 + u * rect.u1, rect.v0 + v * rect.v1],
                color,
            );
        }
    }

    mesh.indices = Some(grid_indices(slices, loops));
    mesh
}

/// Two triangles per quad over a `(slices + 1) × (loops + 1)` vertex grid.
fn grid_indices(slices: u32, loops: u32) -> Vec<u32> {
    let stride = loops + 1;
    let mut indices = Vec::with_capacity(slices as usize * loops as usize * 6);

    for i in 0..slices {
        for j in 0..loops {
            let v1 = i * stride + j;
            let v2 = v1 + stride;
            indices.extend_from_slice(&[v1, v1 + 1, v2, v2, v1 + 1, v2 + 1]);
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_for_the_bike_tire() {
        let mesh = torus(10, 200, 0.2, 0.9, TextureRect::FULL, Color::RED);
        assert_eq!(mesh.vertex_count(), 11 * 201);
        assert_eq!(mesh.normals().len(), 2211);
        assert_eq!(mesh.texture_coord().len(), 2211);
        assert_eq!(mesh.index_count(), 12000);
        assert_eq!(mesh.topology(), Topology::IndexedTriangles);
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = torus(10, 200, 0.2, 0.9, TextureRect::FULL, Color::RED);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices().unwrap().iter().all(|&i| i < n));
    }

    #[test]
    fn first_quad_uses_grid_stride() {
        let mesh = torus(2, 3, 0.2, 0.9, TextureRect::FULL, Color::RED);
        let idx = mesh.indices().unwrap();
        assert_eq!(&idx[..6], &[0, 1, 4, 4, 1, 5]);
        // second quad in the first slice ring
        assert_eq!(&idx[6..12], &[1, 2, 5, 5, 2, 6]);
        // first quad of the second slice ring
        assert_eq!(&idx[18..24], &[4, 5, 8, 8, 5, 9]);
    }

    #[test]
    fn first_vertex_sits_on_outer_edge() {
        let mesh = torus(10, 200, 0.2, 0.9, TextureRect::FULL, Color::RED);
        let p = mesh.positions()[0];
        assert!((p[0] - 1.1).abs() < 1e-6);
        assert_eq!(p[1], 0.0);
        assert_eq!(p[2], 0.0);
        assert_eq!(mesh.normals()[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn seam_vertices_repeat_positions() {
        let mesh = torus(4, 8, 0.2, 0.9, TextureRect::FULL, Color::RED);
        let p = mesh.positions();
        let last_in_ring = p[8];
        assert!((last_in_ring[0] - p[0][0]).abs() < 1e-5);
        assert!((last_in_ring[2] - p[0][2]).abs() < 1e-5);
    }

    #[test]
    fn uvs_offset_then_scale() {
        let rect = TextureRect::new([0.0, 1.0], [0.73633, 0.26367]);
        let mesh = torus(10, 200, 0.2, 0.9, rect, Color::RED);
        let uv = mesh.texture_coord();
        assert_eq!(uv[0], [0.0, 0.73633]);
        let last = uv[uv.len() - 1];
        assert!((last[0] - 1.0).abs() < 1e-6);
        assert!((last[1] - 1.0).abs() < 1e-5);
        // Tire samples stay above the rim's region of the wheel atlas
        assert!(uv.iter().all(|t| t[1] >= 0.73633 - 1e-6));
    }
}
