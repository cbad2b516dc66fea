use glam::Vec3;

use crate::color::Color;
use crate::mesh::{Mesh, TextureRect, Topology};

use super::sector_step;

/// An open unit cylinder of radius 1 running from `z = 0` to `z = 1`,
/// emitted as a triangle strip.
///
/// The list starts with the bottom and top centers on the axis, then walks
/// the ring at `phi = k * step` for `k = 1..=sectors + 2`, emitting a bottom
/// and a top vertex for every step. Like [`circle`](super::circle), the ring
/// over-generates by two steps so the strip always closes.
///
/// Normals are `normalize(x, 0, z)` taken at the ring's base (`z = 0`) and
/// shared by both vertices of a pair; the axis pair gets the zero vector.
/// U runs across `rect` by sector fraction, V is `v0` at the bottom and `v1`
/// at the top.
pub fn cylinder(sectors: u32, rect: TextureRect, color: Color) -> Mesh {
    let ring = sectors as usize + 2;
    let mut mesh = Mesh::with_capacity(Topology::TriangleStrip, 2 + ring * 2);

    let axis_normal = base_normal(0.0);
    let corner = [rect.u0, rect.v0];
    mesh.push_vertex([0.0, 0.0, 0.0], axis_normal, corner, color);
    mesh.push_vertex([0.0, 0.0, 1.0], axis_normal, corner, color);

    let step = sector_step(sectors);
    let fraction_of = sectors.max(1) as f32;

    for k in 1..=sectors + 2 {
        let phi = k as f32 * step;
        let x = phi.cos();
        let y = phi.sin();
        let normal = base_normal(x);

        let u = rect.u0 + rect.width() * (k as f32 / fraction_of);
        mesh.push_vertex([x, y, 0.0], normal, [u, rect.v0], color);
        mesh.push_vertex([x, y, 1.0], normal, [u, rect.v1], color);
    }

    mesh
}

fn base_normal(x: f32) -> [f32; 3] {
    Vec3::new(x, 0.0, 0.0).normalize_or_zero().to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_is_two_plus_paired_ring() {
        let mesh = cylinder(36, TextureRect::FULL, Color::BLUE);
        assert_eq!(mesh.vertex_count(), 2 + 2 * 38);
        assert_eq!(mesh.topology(), Topology::TriangleStrip);
        assert!(mesh.indices().is_none());
    }

    #[test]
    fn starts_with_axis_pair() {
        let rect = TextureRect::new([0.1, 0.9], [0.45, 0.55]);
        let mesh = cylinder(36, rect, Color::BLUE);
        assert_eq!(mesh.positions()[0], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.positions()[1], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.normals()[0], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.texture_coord()[0], [0.1, 0.45]);
        assert_eq!(mesh.texture_coord()[1], [0.1, 0.45]);
    }

    #[test]
    fn ring_pairs_share_xy_and_span_height() {
        let mesh = cylinder(12, TextureRect::FULL, Color::BLUE);
        let p = mesh.positions();
        for pair in p[2..].chunks(2) {
            assert_eq!(pair[0][0], pair[1][0]);
            assert_eq!(pair[0][1], pair[1][1]);
            assert_eq!(pair[0][2], 0.0);
            assert_eq!(pair[1][2], 1.0);
            let r = (pair[0][0].powi(2) + pair[0][1].powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn v_is_fixed_to_rect_bounds() {
        let rect = TextureRect::new([0.1, 0.9], [0.45, 0.55]);
        let mesh = cylinder(36, rect, Color::BLUE);
        for pair in mesh.texture_coord()[2..].chunks(2) {
            assert_eq!(pair[0][1], 0.45);
            assert_eq!(pair[1][1], 0.55);
            assert_eq!(pair[0][0], pair[1][0]);
        }
    }

    #[test]
    fn u_advances_by_sector_fraction() {
        let mesh = cylinder(4, TextureRect::FULL, Color::BLUE);
        let uv = mesh.texture_coord();
        // k = 1 at index 2, k = 4 at index 8
        assert!((uv[2][0] - 0.25).abs() < 1e-6);
        assert!((uv[8][0] - 1.0).abs() < 1e-6);
        // over-generated steps run past the rect
        assert!((uv[12][0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn normals_are_axis_perpendicular_unit_or_zero() {
        let mesh = cylinder(36, TextureRect::FULL, Color::BLUE);
        for n in mesh.normals() {
            assert_eq!(n[1], 0.0);
            assert_eq!(n[2], 0.0);
            let len = n[0].abs();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-6);
        }
    }
}
