use crate::color::Color;
use crate::mesh::{Mesh, TextureRect, Topology};

use super::sector_step;

/// A flat disc in the XZ plane facing +Y, emitted as a triangle fan.
///
/// The first vertex is the hub at `center`, followed by `sectors + 2` ring
/// vertices at `phi = k * step` for `k = 1..=sectors + 2`. The two extra ring
/// vertices overlap the start of the ring and keep the fan closed when the
/// accumulated angle drifts; the redundancy is intended.
///
/// Texture coordinates are centered on the midpoint of `rect` and the disc's
/// diameter spans the rectangle's width and height.
///
/// ```
/// use flatpack::{shapes, Color, TextureRect};
///
/// let rim = shapes::circle([0.0; 3], 1.0, 50, TextureRect::FULL, Color::YELLOW);
/// assert_eq!(rim.vertex_count(), 53);
/// ```
pub fn circle(center: [f32; 3], radius: f32, sectors: u32, rect: TextureRect, color: Color) -> Mesh {
    let ring = sectors as usize + 2;
    let mut mesh = Mesh::with_capacity(Topology::TriangleFan, ring + 1);

    let up = [0.0, 1.0, 0.0];
    let [mid_u, mid_v] = rect.center();
    mesh.push_vertex(center, up, [mid_u, mid_v], color);

    let step = sector_step(sectors);
    let diameter = 2.0 * radius;

    for k in 1..=sectors + 2 {
        let phi = k as f32 * step;
        let x = radius * phi.cos();
        let z = radius * phi.sin();

        let uv = if diameter != 0.0 {
            [
                mid_u + x / diameter * rect.width(),
                mid_v + z / diameter * rect.height(),
            ]
        } else {
            [mid_u, mid_v]
        };

        mesh.push_vertex([center[0] + x, center[1], center[2] + z], up, uv, color);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(sectors: u32) -> Mesh {
        circle([0.0; 3], 1.0, sectors, TextureRect::FULL, Color::WHITE)
    }

    #[test]
    fn fifty_sectors_give_fifty_three_vertices() {
        let mesh = unit(50);
        assert_eq!(mesh.vertex_count(), 53);
        assert_eq!(mesh.normals().len(), 53);
        assert_eq!(mesh.texture_coord().len(), 53);
        assert_eq!(mesh.topology(), Topology::TriangleFan);
        assert!(mesh.indices().is_none());
    }

    #[test]
    fn hub_is_center_with_rect_midpoint_uv() {
        let rect = TextureRect::new([0.0, 0.52734], [0.0, 0.52734]);
        let mesh = circle([0.0; 3], 1.0, 50, rect, Color::WHITE);
        assert_eq!(mesh.positions()[0], [0.0, 0.0, 0.0]);
        assert!((mesh.texture_coord()[0][0] - 0.26367).abs() < 1e-6);
        assert!((mesh.texture_coord()[0][1] - 0.26367).abs() < 1e-6);
    }

    #[test]
    fn ring_vertices_lie_on_radius_facing_up() {
        let mesh = circle([0.0; 3], 2.5, 12, TextureRect::FULL, Color::WHITE);
        for (p, n) in mesh.positions()[1..].iter().zip(&mesh.normals()[1..]) {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - 2.5).abs() < 1e-5);
            assert_eq!(p[1], 0.0);
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn ring_starts_one_step_in_and_overlaps_its_start() {
        let mesh = unit(4);
        let p = mesh.positions();
        // k = 1 sits a quarter turn in
        assert!(p[1][0].abs() < 1e-6);
        assert!((p[1][2] - 1.0).abs() < 1e-6);
        // k = sectors + 1 and + 2 repeat k = 1 and k = 2
        assert!((p[5][0] - p[1][0]).abs() < 1e-5 && (p[5][2] - p[1][2]).abs() < 1e-5);
        assert!((p[6][0] - p[2][0]).abs() < 1e-5 && (p[6][2] - p[2][2]).abs() < 1e-5);
    }

    #[test]
    fn ring_uvs_stay_inside_rect() {
        let rect = TextureRect::new([0.1, 0.9], [0.45, 0.55]);
        let mesh = circle([0.0; 3], 1.0, 50, rect, Color::WHITE);
        for uv in mesh.texture_coord() {
            assert!(uv[0] >= 0.1 - 1e-5 && uv[0] <= 0.9 + 1e-5);
            assert!(uv[1] >= 0.45 - 1e-5 && uv[1] <= 0.55 + 1e-5);
        }
    }

    #[test]
    fn dense_sector_count_uses_minimum_step() {
        let mesh = unit(360);
        assert_eq!(mesh.vertex_count(), 363);
        let p = mesh.positions()[1];
        let angle = p[2].atan2(p[0]).to_degrees();
        assert!((angle - 3.0).abs() < 1e-3);
    }

    #[test]
    fn zero_radius_collapses_to_center_uv() {
        let mesh = circle([1.0, 2.0, 3.0], 0.0, 8, TextureRect::FULL, Color::WHITE);
        assert!(mesh.texture_coord().iter().all(|uv| *uv == [0.5, 0.5]));
        assert!(mesh.positions().iter().all(|p| *p == [1.0, 2.0, 3.0]));
    }
}
