//! Per-frame composition of the part hierarchy into draw instructions.
//!
//! [`SceneComposer`] walks a [`PartNode`] tree on a [`MatrixStack`]. A part
//! with children pushes its resolved frame, draws its own mesh, walks its
//! children and pops again, so the stack is balanced by construction. A leaf
//! part only draws. Every draw reads its parent's frame with `peek`, so an
//! empty stack surfaces as [`ComposeError::Underflow`] and the frame's draw
//! list is abandoned.
//!
//! [`Rig`] bundles the mesh set, the hierarchy, the animation state and the
//! stack into the frame tick the viewer drives:
//!
//! ```
//! use flatpack::{InputSnapshot, Key, Rig};
//!
//! let mut rig = Rig::new();
//! let draws = rig.tick(&InputSnapshot::new().with_key(Key::Up)).unwrap();
//! assert_eq!(draws.len(), 22);
//! assert_eq!(draws[0].part, "axes");
//! ```

use crate::animation::AnimationState;
use crate::input::InputSnapshot;
use crate::matrix::Matrix4;
use crate::model::{BikeMeshes, MeshId, MeshLibrary, PartNode, bike_hierarchy};
use crate::stack::{MatrixStack, StackUnderflow};

/// One part to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawInstruction {
    pub mesh: MeshId,
    /// Name of the part in the hierarchy.
    pub part: &'static str,
    /// Model space to world space.
    pub world: Matrix4,
}

impl DrawInstruction {
    /// `view × world`.
    pub fn model_view(&self, view: &Matrix4) -> Matrix4 {
        view.multiply(self.world)
    }

    /// Carries this part's normals into world space.
    pub fn normal_matrix(&self) -> Matrix4 {
        self.world.normal_matrix()
    }
}

/// Why a frame's composition was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Underflow(#[from] StackUnderflow),

    #[error("matrix stack left with {remaining} entries after composition")]
    Unbalanced { remaining: usize },
}

/// Resolves a part hierarchy against an animation state.
#[derive(Clone, Debug)]
pub struct SceneComposer {
    root: PartNode,
}

impl SceneComposer {
    pub fn new(root: PartNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PartNode {
        &self.root
    }

    /// Produces the ordered draw list for `state`.
    ///
    /// `stack` is cleared first; it is empty again on success.
    pub fn compose(
        &self,
        state: &AnimationState,
        stack: &mut MatrixStack,
    ) -> Result<Vec<DrawInstruction>, ComposeError> {
        let mut draws = Vec::with_capacity(self.root.draw_count());
        self.compose_into(state, stack, &mut draws)?;
        Ok(draws)
    }

    /// Like [`compose`](Self::compose) but reuses `draws`, which is cleared
    /// first and left empty on error.
    pub fn compose_into(
        &self,
        state: &AnimationState,
        stack: &mut MatrixStack,
        draws: &mut Vec<DrawInstruction>,
    ) -> Result<(), ComposeError> {
        stack.clear();
        draws.clear();

        let result = Self::walk_root(&self.root, state, stack, draws);
        if result.is_err() {
            draws.clear();
        }
        result
    }

    fn walk_root(
        root: &PartNode,
        state: &AnimationState,
        stack: &mut MatrixStack,
        draws: &mut Vec<DrawInstruction>,
    ) -> Result<(), ComposeError> {
        stack.push(Matrix4::identity());
        walk(root, state, stack, draws)?;
        stack.pop()?;

        if !stack.is_empty() {
            return Err(ComposeError::Unbalanced {
                remaining: stack.len(),
            });
        }
        Ok(())
    }
}

fn walk(
    node: &PartNode,
    state: &AnimationState,
    stack: &mut MatrixStack,
    draws: &mut Vec<DrawInstruction>,
) -> Result<(), ComposeError> {
    let world = node
        .ops
        .iter()
        .fold(stack.peek()?, |matrix, op| op.apply(matrix, state));

    let emit = |draws: &mut Vec<DrawInstruction>| {
        if let Some(mesh) = node.mesh {
            draws.push(DrawInstruction {
                mesh,
                part: node.name,
                world,
            });
        }
    };

    if node.children.is_empty() {
        emit(draws);
        return Ok(());
    }

    stack.push(world);
    emit(draws);
    for child in &node.children {
        walk(child, state, stack, draws)?;
    }
    stack.pop()?;
    Ok(())
}

/// One frame loop's worth of core state: meshes, hierarchy, animation and
/// the transform stack.
pub struct Rig {
    library: MeshLibrary,
    meshes: BikeMeshes,
    composer: SceneComposer,
    state: AnimationState,
    stack: MatrixStack,
    draws: Vec<DrawInstruction>,
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}

impl Rig {
    /// Generates the bike's meshes and hierarchy with a default animation state.
    pub fn new() -> Self {
        let mut library = MeshLibrary::new();
        let meshes = BikeMeshes::generate(&mut library);
        let composer = SceneComposer::new(bike_hierarchy(&meshes));
        let stack = MatrixStack::with_capacity(composer.root().depth() + 1);
        let draws = Vec::with_capacity(composer.root().draw_count());

        Self {
            library,
            meshes,
            composer,
            state: AnimationState::default(),
            stack,
            draws,
        }
    }

    /// Advances the animation by one frame and composes its draw list.
    pub fn tick(&mut self, input: &InputSnapshot) -> Result<&[DrawInstruction], ComposeError> {
        self.state.update(input);
        self.composer
            .compose_into(&self.state, &mut self.stack, &mut self.draws)?;
        Ok(&self.draws)
    }

    /// The draw list of the last successful tick.
    pub fn draws(&self) -> &[DrawInstruction] {
        &self.draws
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn library(&self) -> &MeshLibrary {
        &self.library
    }

    pub fn meshes(&self) -> &BikeMeshes {
        &self.meshes
    }
}
