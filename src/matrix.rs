//! 4×4 transform value type used for hierarchical part placement.
//!
//! [`Matrix4`] is a thin `Copy` wrapper around [`glam::Mat4`] that exposes the
//! operations the part hierarchy is written in: translate, rotate about an
//! arbitrary axis (degrees), scale and multiply. Every operation composes on
//! the right, so a chain reads in the order the transforms are applied to the
//! model:
//!
//! ```
//! use flatpack::Matrix4;
//!
//! // new = current × T × R × S
//! let m = Matrix4::identity()
//!     .translate(1.0, 0.0, 0.0)
//!     .rotate(90.0, 0.0, 0.0, 1.0)
//!     .scale(2.0, 2.0, 2.0);
//!
//! let p = m.transform_point([1.0, 0.0, 0.0]);
//! assert!((p[0] - 1.0).abs() < 1e-5);
//! assert!((p[1] - 2.0).abs() < 1e-5);
//! ```
//!
//! # Conventions
//!
//! - Storage is column-major, matching WGSL `mat4x4<f32>` and glam.
//! - Angles are in degrees.
//! - The rotation axis does not need to be normalized; it is normalized
//!   internally. A zero-length axis leaves the matrix unchanged.

use glam::{Mat3, Mat4, Vec3};

/// A 4×4 transformation matrix with value semantics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4(Mat4);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self(Mat4::IDENTITY)
    }

    /// Wraps a glam matrix.
    pub fn from_mat4(mat: Mat4) -> Self {
        Self(mat)
    }

    /// Builds a matrix from 16 column-major elements.
    pub fn from_cols_array(elements: &[f32; 16]) -> Self {
        Self(Mat4::from_cols_array(elements))
    }

    /// Returns `self × translation(dx, dy, dz)`.
    pub fn translate(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self(self.0 * Mat4::from_translation(Vec3::new(dx, dy, dz)))
    }

    /// Returns `self × rotation(angle_degrees, axis)`.
    pub fn rotate(self, angle_degrees: f32, axis_x: f32, axis_y: f32, axis_z: f32) -> Self {
        let axis = Vec3::new(axis_x, axis_y, axis_z);
        let Some(axis) = axis.try_normalize() else {
            return self;
        };
        Self(self.0 * Mat4::from_axis_angle(axis, angle_degrees.to_radians()))
    }

    /// Returns `self × scale(sx, sy, sz)`.
    pub fn scale(self, sx: f32, sy: f32, sz: f32) -> Self {
        Self(self.0 * Mat4::from_scale(Vec3::new(sx, sy, sz)))
    }

    /// Returns `self × other`.
    pub fn multiply(self, other: Matrix4) -> Matrix4 {
        Matrix4(self.0 * other.0)
    }

    /// The 16 elements in column-major order.
    pub fn elements(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    /// Columns as nested arrays, ready for a uniform buffer.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.0.to_cols_array_2d()
    }

    /// The underlying glam matrix.
    pub fn as_mat4(&self) -> Mat4 {
        self.0
    }

    /// Inverse-transpose of the upper 3×3, used to carry normals into world space.
    ///
    /// Returned padded to 4×4 so it can share the std140 layout of the other
    /// per-draw matrices.
    pub fn normal_matrix(&self) -> Matrix4 {
        let upper = Mat3::from_mat4(self.0);
        Matrix4(Mat4::from_mat3(upper.inverse().transpose()))
    }

    /// Transforms a point (w = 1).
    pub fn transform_point(&self, point: [f32; 3]) -> [f32; 3] {
        self.0.transform_point3(Vec3::from(point)).to_array()
    }

    /// Transforms a direction (w = 0).
    pub fn transform_vector(&self, vector: [f32; 3]) -> [f32; 3] {
        self.0.transform_vector3(Vec3::from(vector)).to_array()
    }

    /// Element-wise comparison within `epsilon`.
    pub fn abs_diff_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.0.abs_diff_eq(other.0, epsilon)
    }
}

impl std::ops::Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(rhs)
    }
}

impl From<Mat4> for Matrix4 {
    fn from(mat: Mat4) -> Self {
        Self(mat)
    }
}

impl From<Matrix4> for Mat4 {
    fn from(mat: Matrix4) -> Self {
        mat.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Matrix4::identity().transform_point([1.0, -2.0, 3.0]);
        assert_eq!(p, [1.0, -2.0, 3.0]);
    }

    #[test]
    fn translate_moves_points() {
        let m = Matrix4::identity().translate(1.0, 2.0, 3.0);
        assert!(approx(m.transform_point([0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]));
        // Directions ignore translation
        assert!(approx(m.transform_vector([1.0, 0.0, 0.0]), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn rotate_about_z_in_degrees() {
        let m = Matrix4::identity().rotate(90.0, 0.0, 0.0, 1.0);
        assert!(approx(m.transform_point([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn rotate_normalizes_axis() {
        let a = Matrix4::identity().rotate(30.0, 0.0, 5.0, 0.0);
        let b = Matrix4::identity().rotate(30.0, 0.0, 1.0, 0.0);
        assert!(a.abs_diff_eq(&b, 1e-6));
    }

    #[test]
    fn rotate_with_zero_axis_is_noop() {
        let m = Matrix4::identity().translate(1.0, 2.0, 3.0);
        assert_eq!(m.rotate(45.0, 0.0, 0.0, 0.0), m);
    }

    #[test]
    fn rotate_by_zero_degrees_is_identity() {
        let m = Matrix4::identity().rotate(0.0, 0.0, 1.0, 0.0);
        assert!(m.abs_diff_eq(&Matrix4::identity(), 0.0));
    }

    #[test]
    fn operations_compose_on_the_right() {
        // Scale is applied to the point first, then the translation
        let m = Matrix4::identity().translate(10.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);
        assert!(approx(m.transform_point([1.0, 0.0, 0.0]), [12.0, 0.0, 0.0]));

        let explicit = Matrix4::identity()
            .translate(10.0, 0.0, 0.0)
            .multiply(Matrix4::identity().scale(2.0, 2.0, 2.0));
        assert!(m.abs_diff_eq(&explicit, 1e-6));
    }

    #[test]
    fn multiply_operator_matches_method() {
        let a = Matrix4::identity().rotate(20.0, 1.0, 0.0, 0.0);
        let b = Matrix4::identity().translate(0.0, 1.0, 0.0);
        assert_eq!(a * b, a.multiply(b));
    }

    #[test]
    fn elements_are_column_major() {
        let m = Matrix4::identity().translate(4.0, 5.0, 6.0);
        let e = m.elements();
        assert_eq!(&e[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(Matrix4::from_cols_array(&e), m);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let m = Matrix4::identity().scale(2.0, 1.0, 1.0);
        let n = m.normal_matrix().transform_vector([1.0, 0.0, 0.0]);
        assert!(approx(n, [0.5, 0.0, 0.0]));
    }
}
