//! Procedural shape generators.
//!
//! Each generator is a pure function of a handful of numeric parameters that
//! returns an immutable [`Mesh`](crate::Mesh). Vertex counts and emission order
//! are part of the contract: the renderer derives its draw counts and its
//! primitive assembly from them.
//!
//! | Generator | Vertices | Topology |
//! |-----------|----------|----------|
//! | [`circle`] | `1 + (sectors + 2)` | triangle fan |
//! | [`cylinder`] | `2 + 2 × (sectors + 2)` | triangle strip |
//! | [`torus`] | `(slices + 1) × (loops + 1)`, `slices × loops × 6` indices | indexed triangles |
//! | [`cube`] | 36 | triangles |
//! | [`coordinate_system`] | 6 | lines |

mod circle;
mod coordinate_system;
mod cube;
mod cylinder;
mod torus;

pub use circle::circle;
pub use coordinate_system::{coordinate_system, line};
pub use cube::cube;
pub use cylinder::cylinder;
pub use torus::torus;

/// Smallest angular step, in degrees, a round shape may advance by.
pub const MIN_SECTOR_STEP_DEGREES: f32 = 3.0;

/// Angular step in radians for `sectors` subdivisions of a full turn.
///
/// A step of 2° or less (very high or zero sector counts) is replaced by
/// [`MIN_SECTOR_STEP_DEGREES`].
pub(crate) fn sector_step(sectors: u32) -> f32 {
    let degrees = 360.0 / sectors as f32;
    if degrees <= 2.0 || !degrees.is_finite() {
        MIN_SECTOR_STEP_DEGREES.to_radians()
    } else {
        degrees.to_radians()
    }
}
