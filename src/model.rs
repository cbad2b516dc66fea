//! The bicycle: its startup mesh set and its fixed part hierarchy.
//!
//! [`BikeMeshes::generate`] runs every shape generator once and stores the
//! results in a [`MeshLibrary`]. [`bike_hierarchy`] describes how the parts
//! are placed relative to each other; [`SceneComposer`](crate::SceneComposer)
//! walks it every frame.

use crate::animation::AnimationState;
use crate::color::Color;
use crate::matrix::Matrix4;
use crate::mesh::{Mesh, TextureRect};
use crate::shapes;

/// Type-safe handle to a mesh stored in a [`MeshLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    /// Position of the mesh in its library.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which atlas image a mesh samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Wheel,
    Metal,
    Black,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [TextureSlot::Wheel, TextureSlot::Metal, TextureSlot::Black];

    pub fn index(self) -> usize {
        match self {
            TextureSlot::Wheel => 0,
            TextureSlot::Metal => 1,
            TextureSlot::Black => 2,
        }
    }
}

/// A generated mesh plus the texture it is drawn with.
#[derive(Clone, Debug)]
pub struct MeshEntry {
    pub name: &'static str,
    pub mesh: Mesh,
    /// `None` for unlit meshes such as the debug axes.
    pub texture: Option<TextureSlot>,
}

/// Owns every mesh generated at startup. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct MeshLibrary {
    entries: Vec<MeshEntry>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a mesh and returns its handle.
    pub fn add(&mut self, name: &'static str, mesh: Mesh, texture: Option<TextureSlot>) -> MeshId {
        let id = MeshId(self.entries.len());
        self.entries.push(MeshEntry {
            name,
            mesh,
            texture,
        });
        id
    }

    pub fn get(&self, id: MeshId) -> Option<&MeshEntry> {
        self.entries.get(id.0)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.get(id).map(|entry| &entry.mesh)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &MeshEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (MeshId(i), entry))
    }
}

/// Tire region of the wheel texture, as a `(u, v)` offset and scale pair.
pub const TIRE_RECT: TextureRect = TextureRect::new([0.0, 1.0], [0.73633, 0.26367]);
/// Atlas region of the spoked rim on the wheel texture.
pub const RIM_RECT: TextureRect = TextureRect::new([0.0, 0.52734], [0.0, 0.52734]);
/// Atlas region used by every metal tube and its caps.
pub const TUBE_RECT: TextureRect = TextureRect::new([0.1, 0.9], [0.45, 0.55]);

/// Handles to the bike's startup mesh set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BikeMeshes {
    pub axes: MeshId,
    pub tire: MeshId,
    pub rim: MeshId,
    pub frame: MeshId,
    pub tube: MeshId,
    pub tube_cap: MeshId,
    pub grip: MeshId,
    pub grip_cap: MeshId,
}

impl BikeMeshes {
    /// Generates every mesh the bike uses into `library`.
    pub fn generate(library: &mut MeshLibrary) -> Self {
        let meshes = Self {
            axes: library.add(
                "axes",
                shapes::coordinate_system(100.0, Color::RED, Color::BLUE, Color::GREEN),
                None,
            ),
            tire: library.add(
                "tire",
                shapes::torus(10, 200, 0.2, 0.9, TIRE_RECT, Color::RED),
                Some(TextureSlot::Wheel),
            ),
            rim: library.add(
                "rim",
                shapes::circle([0.0; 3], 1.0, 50, RIM_RECT, Color::YELLOW),
                Some(TextureSlot::Wheel),
            ),
            frame: library.add(
                "frame",
                shapes::cube(TextureRect::FULL, Color::YELLOW),
                Some(TextureSlot::Metal),
            ),
            tube: library.add(
                "tube",
                shapes::cylinder(36, TUBE_RECT, Color::BLUE),
                Some(TextureSlot::Metal),
            ),
            tube_cap: library.add(
                "tube cap",
                shapes::circle([0.0; 3], 1.0, 50, TUBE_RECT, Color::YELLOW),
                Some(TextureSlot::Metal),
            ),
            grip: library.add(
                "grip",
                shapes::cylinder(36, TextureRect::FULL, Color::BLUE),
                Some(TextureSlot::Black),
            ),
            grip_cap: library.add(
                "grip cap",
                shapes::circle([0.0; 3], 1.0, 50, TextureRect::FULL, Color::YELLOW),
                Some(TextureSlot::Black),
            ),
        };

        for (_, entry) in library.iter() {
            tracing::debug!(
                mesh = entry.name,
                vertices = entry.mesh.vertex_count(),
                indices = entry.mesh.index_count(),
                topology = ?entry.mesh.topology(),
                "generated mesh"
            );
        }

        meshes
    }
}

/// A rotation angle, either fixed or read from the animation state.
///
/// Animated angles can be absent for the current state, in which case the
/// rotation is skipped altogether.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Angle {
    Fixed(f32),
    /// The wheel spin.
    Wheel,
    /// Fork steering; absent in flatpack mode.
    Steering,
    /// Head-tube angle: the fold angle in flatpack mode, 25° otherwise.
    FoldBase,
    /// Handlebar fold; present only in flatpack mode.
    FoldSteer,
}

impl Angle {
    pub fn resolve(self, state: &AnimationState) -> Option<f32> {
        match self {
            Angle::Fixed(degrees) => Some(degrees),
            Angle::Wheel => Some(state.wheel_angle),
            Angle::Steering => (!state.is_flatpack()).then_some(state.steering_angle),
            Angle::FoldBase => Some(if state.is_flatpack() {
                state.flat_pack_base_angle
            } else {
                crate::animation::UNPACKED_BASE_ANGLE
            }),
            Angle::FoldSteer => state.is_flatpack().then_some(state.flat_pack_steer_angle),
        }
    }
}

/// Distance along world X, read from the animation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    Fixed(f32),
    BikePosition,
}

impl Offset {
    pub fn resolve(self, state: &AnimationState) -> f32 {
        match self {
            Offset::Fixed(value) => value,
            Offset::BikePosition => state.bike_position,
        }
    }
}

/// One step of a part's local transform recipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartOp {
    Translate(Offset, f32, f32),
    Rotate(Angle, [f32; 3]),
    Scale(f32, f32, f32),
}

impl PartOp {
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        PartOp::Translate(Offset::Fixed(x), y, z)
    }

    pub fn rotate_x(degrees: f32) -> Self {
        PartOp::Rotate(Angle::Fixed(degrees), X)
    }

    pub fn rotate_y(degrees: f32) -> Self {
        PartOp::Rotate(Angle::Fixed(degrees), Y)
    }

    pub fn rotate_z(degrees: f32) -> Self {
        PartOp::Rotate(Angle::Fixed(degrees), Z)
    }

    pub fn uniform_scale(s: f32) -> Self {
        PartOp::Scale(s, s, s)
    }

    /// Applies this step on the right of `matrix`.
    pub fn apply(self, matrix: Matrix4, state: &AnimationState) -> Matrix4 {
        match self {
            PartOp::Translate(x, y, z) => matrix.translate(x.resolve(state), y, z),
            PartOp::Rotate(angle, [ax, ay, az]) => match angle.resolve(state) {
                Some(degrees) => matrix.rotate(degrees, ax, ay, az),
                None => matrix,
            },
            PartOp::Scale(sx, sy, sz) => matrix.scale(sx, sy, sz),
        }
    }
}

const X: [f32; 3] = [1.0, 0.0, 0.0];
const Y: [f32; 3] = [0.0, 1.0, 0.0];
const Z: [f32; 3] = [0.0, 0.0, 1.0];

/// A named part: a local recipe, an optional mesh, and child parts that are
/// placed relative to this part's frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PartNode {
    pub name: &'static str,
    pub ops: Vec<PartOp>,
    pub mesh: Option<MeshId>,
    pub children: Vec<PartNode>,
}

impl PartNode {
    /// A frame with no mesh of its own.
    pub fn group(name: &'static str) -> Self {
        Self {
            name,
            ops: Vec::new(),
            mesh: None,
            children: Vec::new(),
        }
    }

    /// A drawn part.
    pub fn part(name: &'static str, mesh: MeshId) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::group(name)
        }
    }

    pub fn op(mut self, op: PartOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn child(mut self, child: PartNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of drawn parts in this subtree.
    pub fn draw_count(&self) -> usize {
        usize::from(self.mesh.is_some()) + self.children.iter().map(PartNode::draw_count).sum::<usize>()
    }

    /// Deepest chain of frames with children, i.e. how many stack slots a walk needs.
    pub fn depth(&self) -> usize {
        if self.children.is_empty() {
            0
        } else {
            1 + self.children.iter().map(PartNode::depth).max().unwrap_or(0)
        }
    }
}

/// The fixed part tree of the bike, rooted at an identity frame.
///
/// Draw order: axes, base, rear struts, rear wheel and rim, head tube and
/// cap, fork tubes and caps, front wheel and rim, steering pole, handlebar
/// crossbar, grips and grip caps.
pub fn bike_hierarchy(meshes: &BikeMeshes) -> PartNode {
    use PartOp as Op;

    let rear_frame = PartNode::group("rear_frame")
        .op(Op::translate(-1.6, 0.0, 1.35))
        .op(Op::rotate_y(45.0))
        .child(PartNode::part("rear_strut_upper", meshes.frame).op(Op::Scale(0.7, 0.1, 0.1)))
        .child(
            PartNode::part("rear_strut_lower", meshes.frame)
                .op(Op::translate(-1.4, 0.0, 0.0))
                .op(Op::rotate_y(-45.0))
                .op(Op::translate(-0.1, 0.0, -0.55))
                .op(Op::Scale(0.7, 0.1, 0.1)),
        );

    let rear_wheel = wheel("rear_wheel", "rear_rim", meshes, Op::translate(-3.2, 0.0, 0.8));
    let front_wheel = wheel("front_wheel", "front_rim", meshes, Op::translate(0.0, -0.2, 1.8));

    let right_grip_frame = PartNode::group("right_grip_frame")
        .op(Op::translate(0.0, 0.0, 1.5))
        .child(PartNode::part("right_grip", meshes.grip).op(Op::Scale(0.11, 0.11, 0.5)))
        .child(
            PartNode::part("right_grip_cap", meshes.grip_cap)
                .op(Op::translate(0.0, 0.0, 0.5))
                .op(Op::rotate_x(90.0))
                .op(Op::uniform_scale(0.11)),
        );

    let handlebar_frame = PartNode::group("handlebar_frame")
        .op(Op::translate(-1.0, 0.0, 0.0))
        .op(Op::rotate_y(90.0))
        .child(PartNode::part("crossbar", meshes.tube).op(Op::Scale(0.1, 0.1, 2.0)))
        .child(PartNode::part("left_grip", meshes.grip).op(Op::Scale(0.11, 0.11, 0.5)))
        .child(
            PartNode::part("left_grip_cap", meshes.grip_cap)
                .op(Op::rotate_x(90.0))
                .op(Op::uniform_scale(0.11)),
        )
        .child(right_grip_frame);

    let steering_frame = PartNode::group("steering_frame")
        .op(Op::Rotate(Angle::FoldSteer, Y))
        .op(Op::translate(-1.35, -0.2, -3.55))
        .op(Op::rotate_y(20.0))
        .op(Op::rotate_z(90.0))
        .child(PartNode::part("steering_pole", meshes.tube).op(Op::Scale(0.1, 0.1, 4.0)))
        .child(handlebar_frame);

    let fork_frame = PartNode::group("fork_frame")
        .op(Op::translate(0.0, 0.2, 1.4))
        .op(Op::rotate_y(120.0))
        .op(Op::Rotate(Angle::Steering, Z))
        .child(PartNode::part("right_fork_tube", meshes.tube).op(Op::Scale(0.08, 0.08, 1.5)))
        .child(fork_cap("right_fork_cap_lower", meshes, 0.0, 0.0))
        .child(fork_cap("right_fork_cap_upper", meshes, 0.0, 1.5))
        .child(front_wheel)
        .child(
            PartNode::part("left_fork_tube", meshes.tube)
                .op(Op::translate(0.0, -0.4, 0.0))
                .op(Op::Scale(0.08, 0.08, 1.5)),
        )
        .child(fork_cap("left_fork_cap_lower", meshes, -0.4, 0.0))
        .child(fork_cap("left_fork_cap_upper", meshes, -0.4, 1.5))
        .child(steering_frame);

    let head_frame = PartNode::group("head_frame")
        .op(Op::translate(1.1, 0.0, 0.58))
        .op(Op::Rotate(Angle::FoldBase, Y))
        .child(PartNode::part("head_tube", meshes.tube).op(Op::Scale(0.25, 0.25, 1.5)))
        .child(
            PartNode::part("head_tube_cap", meshes.tube_cap)
                .op(Op::translate(0.0, 0.0, 1.5))
                .op(Op::rotate_x(90.0))
                .op(Op::uniform_scale(0.25)),
        )
        .child(fork_frame);

    let bike = PartNode::group("bike")
        .op(Op::Translate(Offset::BikePosition, 0.0, 0.0))
        .child(
            PartNode::part("base", meshes.frame)
                .op(Op::translate(-0.6, 0.0, 0.7))
                .op(Op::Scale(2.0, 0.4, 0.2)),
        )
        .child(rear_frame)
        .child(rear_wheel)
        .child(head_frame);

    PartNode::group("scene")
        .child(PartNode::part("axes", meshes.axes))
        .child(bike)
}

/// A spinning tire with its rim drawn in the same frame.
fn wheel(name: &'static str, rim: &'static str, meshes: &BikeMeshes, offset: PartOp) -> PartNode {
    PartNode::part(name, meshes.tire)
        .op(PartOp::uniform_scale(0.8))
        .op(offset)
        .op(PartOp::Rotate(Angle::Wheel, Y))
        .child(PartNode::part(rim, meshes.rim))
}

/// A cap closing one end of a fork tube.
fn fork_cap(name: &'static str, meshes: &BikeMeshes, y: f32, z: f32) -> PartNode {
    PartNode::part(name, meshes.tube_cap)
        .op(PartOp::translate(0.0, y, z))
        .op(PartOp::rotate_x(90.0))
        .op(PartOp::uniform_scale(0.08))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated() -> (MeshLibrary, BikeMeshes) {
        let mut library = MeshLibrary::new();
        let meshes = BikeMeshes::generate(&mut library);
        (library, meshes)
    }

    #[test]
    fn library_holds_the_eight_startup_meshes() {
        let (library, meshes) = generated();
        assert_eq!(library.len(), 8);
        assert_eq!(library.mesh(meshes.tire).unwrap().vertex_count(), 2211);
        assert_eq!(library.mesh(meshes.rim).unwrap().vertex_count(), 53);
        assert_eq!(library.mesh(meshes.frame).unwrap().vertex_count(), 36);
        assert_eq!(library.mesh(meshes.tube).unwrap().vertex_count(), 78);
        assert_eq!(library.mesh(meshes.axes).unwrap().vertex_count(), 6);
        assert_eq!(library.get(meshes.axes).unwrap().texture, None);
        assert_eq!(library.get(meshes.grip).unwrap().texture, Some(TextureSlot::Black));
    }

    #[test]
    fn hierarchy_draws_twenty_two_parts() {
        let (_, meshes) = generated();
        let root = bike_hierarchy(&meshes);
        assert_eq!(root.draw_count(), 22);
        // scene > bike > head > fork > steering > handlebar > right grip
        assert_eq!(root.depth(), 7);
    }

    #[test]
    fn angles_follow_flatpack_mode() {
        let mut state = AnimationState::default();
        state.steering_angle = 10.0;
        assert_eq!(Angle::Steering.resolve(&state), Some(10.0));
        assert_eq!(Angle::FoldBase.resolve(&state), Some(25.0));
        assert_eq!(Angle::FoldSteer.resolve(&state), None);

        state.flat_pack_active = true;
        state.flat_pack_base_angle = 12.5;
        state.flat_pack_steer_angle = -20.0;
        assert_eq!(Angle::Steering.resolve(&state), None);
        assert_eq!(Angle::FoldBase.resolve(&state), Some(12.5));
        assert_eq!(Angle::FoldSteer.resolve(&state), Some(-20.0));
    }

    #[test]
    fn skipped_rotation_leaves_matrix_unchanged() {
        let state = AnimationState {
            flat_pack_active: true,
            ..AnimationState::default()
        };
        let m = Matrix4::identity().translate(1.0, 2.0, 3.0);
        assert_eq!(PartOp::Rotate(Angle::Steering, Z).apply(m, &state), m);
    }

    #[test]
    fn translate_reads_bike_position() {
        let state = AnimationState {
            bike_position: 2.5,
            ..AnimationState::default()
        };
        let m = PartOp::Translate(Offset::BikePosition, 0.0, 0.0).apply(Matrix4::identity(), &state);
        assert_eq!(m.transform_point([0.0; 3]), [2.5, 0.0, 0.0]);
    }
}
