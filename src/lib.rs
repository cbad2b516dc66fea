//! # Flatpack
//!
//! **A folding bicycle built from procedural primitives and a matrix stack.**
//!
//! The bike is assembled from a handful of generated meshes (torus tires,
//! circle rims, cylinder tubes) that are positioned every frame by walking a
//! part hierarchy against a [`MatrixStack`]. Key input drives an
//! [`AnimationState`] that steers, rolls and folds the bike flat.
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatpack::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     run(ViewerConfig::new().title("Flatpack").size(1024, 768))
//! }
//! ```
//!
//! ## Headless composition
//!
//! Everything up to the GPU works without a window, which is how the bike is
//! tested:
//!
//! ```
//! use flatpack::{InputSnapshot, Key, Rig};
//!
//! let mut rig = Rig::new();
//! let draws = rig.tick(&InputSnapshot::new().with_key(Key::Up)).unwrap();
//! assert_eq!(draws.len(), 22);
//! assert!(rig.state().bike_position > 0.0);
//! ```

pub mod animation;
mod app;
mod bike_pass;
mod camera;
mod color;
mod config;
mod gpu;
mod input;
mod matrix;
mod mesh;
pub mod model;
mod scene;
pub mod shapes;
mod stack;
mod texture;

pub use animation::{AnimationPhase, AnimationState};
pub use app::{flatpack_label, run};
pub use bike_pass::{BikePass, DrawUniforms, FrameUniforms};
pub use camera::Camera;
pub use color::Color;
pub use config::{
    CameraConfig, ConfigError, LightConfig, TextureConfig, ViewerConfig, WindowConfig,
};
pub use gpu::{GpuContext, ViewerError};
pub use input::{Input, InputSnapshot, Key, TOGGLE_FLATPACK_KEY};
pub use matrix::Matrix4;
pub use mesh::{LineVertex, Mesh, TextureRect, Topology, Vertex3d};
pub use model::{
    Angle, BikeMeshes, MeshEntry, MeshId, MeshLibrary, Offset, PartNode, PartOp, TextureSlot,
    bike_hierarchy,
};
pub use scene::{ComposeError, DrawInstruction, Rig, SceneComposer};
pub use stack::{MatrixStack, StackOp, StackUnderflow};
pub use texture::Texture;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3, Vec4};

// Re-export winit key codes for custom bindings
pub use winit::keyboard::KeyCode;
