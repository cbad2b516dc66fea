//! Look-at camera that orbits the origin from the keyboard.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::input::{InputSnapshot, Key};
use crate::matrix::Matrix4;

/// A perspective camera looking at a fixed target.
///
/// Orbit keys rotate the camera position about the world axes through the
/// origin; zoom keys scale it toward or away from the origin. The target and
/// up vector never change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_step_degrees: f32,
    pub zoom_out_factor: f32,
    pub zoom_in_factor: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            look_at: config.look_at,
            up: config.up,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            orbit_step_degrees: config.orbit_step_degrees,
            zoom_out_factor: config.zoom_out_factor,
            zoom_in_factor: config.zoom_in_factor,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn looking_at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.look_at = [x, y, z];
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// World to camera space.
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::from_mat4(Mat4::look_at_rh(
            Vec3::from(self.position),
            Vec3::from(self.look_at),
            Vec3::from(self.up),
        ))
    }

    /// Camera space to clip space for a viewport of the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4 {
        Matrix4::from_mat4(Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            aspect,
            self.near,
            self.far,
        ))
    }

    /// Applies one frame of held camera keys.
    pub fn handle_keys(&mut self, input: &InputSnapshot) {
        let step = self.orbit_step_degrees;
        let orbits = [
            (Key::OrbitLeft, -step, [0.0, 0.0, 1.0]),
            (Key::OrbitRight, step, [0.0, 0.0, 1.0]),
            (Key::OrbitDown, -step, [1.0, 0.0, 0.0]),
            (Key::OrbitUp, step, [1.0, 0.0, 0.0]),
        ];

        for (key, degrees, [ax, ay, az]) in orbits {
            if input.is_held(key) {
                self.position = Matrix4::identity()
                    .rotate(degrees, ax, ay, az)
                    .transform_point(self.position);
            }
        }

        if input.is_held(Key::ZoomOut) {
            self.position = (Vec3::from(self.position) * self.zoom_out_factor).to_array();
        }
        if input.is_held(Key::ZoomIn) {
            self.position = (Vec3::from(self.position) * self.zoom_in_factor).to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        Vec3::from(v).length()
    }

    #[test]
    fn starts_from_config() {
        let camera = Camera::new();
        assert_eq!(camera.position, [10.0, 13.0, 7.0]);
        assert_eq!(camera.look_at, [0.0, 0.0, 3.0]);
        assert_eq!(camera.fov_degrees, 45.0);
    }

    #[test]
    fn view_matrix_moves_target_onto_negative_z() {
        let camera = Camera::new();
        let target = camera.view_matrix().transform_point(camera.look_at);
        assert!(target[0].abs() < 1e-4);
        assert!(target[1].abs() < 1e-4);
        assert!(target[2] < 0.0);
    }

    #[test]
    fn orbit_about_z_keeps_height_and_distance() {
        let mut camera = Camera::new();
        let before = camera.position;
        camera.handle_keys(&InputSnapshot::new().with_key(Key::OrbitRight));
        assert!((camera.position[2] - before[2]).abs() < 1e-5);
        assert!((length(camera.position) - length(before)).abs() < 1e-4);
        assert_ne!(camera.position, before);
    }

    #[test]
    fn opposite_orbits_cancel() {
        let mut camera = Camera::new();
        let before = camera.position;
        camera.handle_keys(&InputSnapshot::new().with_key(Key::OrbitUp));
        camera.handle_keys(&InputSnapshot::new().with_key(Key::OrbitDown));
        for i in 0..3 {
            assert!((camera.position[i] - before[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn zoom_scales_position() {
        let mut camera = Camera::new().at(10.0, 0.0, 0.0);
        camera.handle_keys(&InputSnapshot::new().with_key(Key::ZoomOut));
        assert!((camera.position[0] - 10.2).abs() < 1e-5);
        camera.handle_keys(&InputSnapshot::new().with_key(Key::ZoomIn));
        assert!((camera.position[0] - 9.996).abs() < 1e-4);
    }

    #[test]
    fn driving_keys_do_not_move_the_camera() {
        let mut camera = Camera::new();
        camera.handle_keys(&InputSnapshot::new().with_key(Key::Up).with_key(Key::Left));
        assert_eq!(camera.position, Camera::new().position);
    }

    #[test]
    fn projection_depends_on_aspect() {
        let camera = Camera::new();
        let wide = camera.projection_matrix(2.0).elements();
        let square = camera.projection_matrix(1.0).elements();
        assert!((wide[0] * 2.0 - square[0]).abs() < 1e-5);
        assert_eq!(wide[5], square[5]);
    }
}
