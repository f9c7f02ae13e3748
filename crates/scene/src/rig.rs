//! Humanoid stick-figure rig.
//!
//! The rig is a [`Node`] tree of cylinders (bones) and spheres (joints).
//! Its root is the spine, turned a quarter about X so the figure's local Z
//! axis runs from head (-Z) to pelvis (+Z). Every limb hangs off a socket
//! joint (shoulder or hip) as a chain:
//!
//! ```text
//! socket ── upper bone ── middle joint ── lower bone ── end joint
//! ```
//!
//! The drawables come from a [`PrimitiveFactory`] so the tree can be built
//! against a real renderer or against a test double.

use glam::{Mat4, Vec3};
use tracing::debug;

use crate::node::{Drawable, Node, NodePath};
use crate::transform::{rotation_degrees, translation};

const SPINE_LENGTH: f32 = 3.25;
const CLAVICLE_LENGTH: f32 = 2.0;
const PELVIS_LENGTH: f32 = 1.0;
const BONE_LENGTH: f32 = 1.5;

/// Offset between consecutive pieces of a limb chain.
const LIMB_STEP: f32 = BONE_LENGTH / 2.0;

/// Builds the drawables a rig is made of.
pub trait PrimitiveFactory {
    type Error;

    /// Cylinder centred on the origin, its axis along Z.
    fn cylinder(
        &mut self,
        height: f32,
        radius: f32,
        slices: u32,
    ) -> Result<Box<dyn Drawable>, Self::Error>;

    /// Sphere centred on the origin.
    fn sphere(&mut self, radius: f32, slices: u32) -> Result<Box<dyn Drawable>, Self::Error>;
}

/// Rig proportions and tessellation.
#[derive(Clone, Debug, PartialEq)]
pub struct RigConfig {
    /// Radius of every bone cylinder
    pub bone_radius: f32,
    /// Radius of shoulder, elbow, wrist, hip, knee and ankle spheres
    pub joint_radius: f32,
    pub head_radius: f32,
    /// Tessellation for every primitive
    pub slices: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            bone_radius: 0.1,
            joint_radius: 0.15,
            head_radius: 0.4,
            slices: 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// The joints the walk cycle drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    Shoulder(Side),
    Elbow(Side),
    Hip(Side),
    Knee(Side),
}

/// Paths from the rig root to each animated joint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RigJoints {
    left_shoulder: NodePath,
    right_shoulder: NodePath,
    left_elbow: NodePath,
    right_elbow: NodePath,
    left_hip: NodePath,
    right_hip: NodePath,
    left_knee: NodePath,
    right_knee: NodePath,
}

impl RigJoints {
    pub fn path(&self, joint: Joint) -> &NodePath {
        match joint {
            Joint::Shoulder(Side::Left) => &self.left_shoulder,
            Joint::Shoulder(Side::Right) => &self.right_shoulder,
            Joint::Elbow(Side::Left) => &self.left_elbow,
            Joint::Elbow(Side::Right) => &self.right_elbow,
            Joint::Hip(Side::Left) => &self.left_hip,
            Joint::Hip(Side::Right) => &self.right_hip,
            Joint::Knee(Side::Left) => &self.left_knee,
            Joint::Knee(Side::Right) => &self.right_knee,
        }
    }
}

/// Names of the five pieces of a limb chain.
struct LimbNames {
    socket: &'static str,
    upper: &'static str,
    middle: &'static str,
    lower: &'static str,
    end: &'static str,
}

const ARM: LimbNames = LimbNames {
    socket: "shoulder",
    upper: "upper_arm",
    middle: "elbow",
    lower: "forearm",
    end: "wrist",
};

const LEG: LimbNames = LimbNames {
    socket: "hip",
    upper: "upper_leg",
    middle: "knee",
    lower: "lower_leg",
    end: "ankle",
};

/// An assembled stick figure.
#[derive(Debug)]
pub struct Rig {
    root: Node,
    joints: RigJoints,
}

impl Rig {
    /// Assemble the figure.
    pub fn build<F: PrimitiveFactory>(config: &RigConfig, factory: &mut F) -> Result<Self, F::Error> {
        let slices = config.slices;
        let quarter_y = rotation_degrees(Vec3::Y, 90.0);

        let mut clavicle = Node::named("clavicle", translation(0.0, 0.0, -1.125) * quarter_y);
        clavicle.add(factory.cylinder(CLAVICLE_LENGTH, config.bone_radius, slices)?);
        let (left_arm, left_elbow) = limb(
            Side::Left,
            &ARM,
            translation(0.0, 0.0, 1.0),
            config,
            factory,
        )?;
        let left_shoulder_ix = clavicle.add_child(left_arm);
        let (right_arm, right_elbow) = limb(
            Side::Right,
            &ARM,
            translation(0.0, 0.0, -1.0),
            config,
            factory,
        )?;
        let right_shoulder_ix = clavicle.add_child(right_arm);

        let mut head = Node::named("head", translation(0.0, 0.0, -1.875));
        head.add(factory.sphere(config.head_radius, slices)?);

        let mut pelvis = Node::named("pelvis", translation(0.0, 0.0, 1.625) * quarter_y);
        pelvis.add(factory.cylinder(PELVIS_LENGTH, config.bone_radius, slices)?);
        let (right_leg, right_knee) = limb(
            Side::Right,
            &LEG,
            translation(0.0, 0.0, -0.5),
            config,
            factory,
        )?;
        let right_hip_ix = pelvis.add_child(right_leg);
        let (left_leg, left_knee) = limb(
            Side::Left,
            &LEG,
            translation(0.0, 0.0, 0.5),
            config,
            factory,
        )?;
        let left_hip_ix = pelvis.add_child(left_leg);

        let mut root = Node::named("spine", rotation_degrees(Vec3::X, 90.0));
        root.add(factory.cylinder(SPINE_LENGTH, config.bone_radius, slices)?);
        let clavicle_ix = root.add_child(clavicle);
        root.add(head);
        let pelvis_ix = root.add_child(pelvis);

        let left_shoulder = NodePath::from([clavicle_ix, left_shoulder_ix]);
        let right_shoulder = NodePath::from([clavicle_ix, right_shoulder_ix]);
        let left_hip = NodePath::from([pelvis_ix, left_hip_ix]);
        let right_hip = NodePath::from([pelvis_ix, right_hip_ix]);

        let joints = RigJoints {
            left_elbow: join(&left_shoulder, &left_elbow),
            right_elbow: join(&right_shoulder, &right_elbow),
            left_knee: join(&left_hip, &left_knee),
            right_knee: join(&right_hip, &right_knee),
            left_shoulder,
            right_shoulder,
            left_hip,
            right_hip,
        };

        debug!(
            nodes = root.node_count(),
            drawables = root.drawable_count(),
            depth = root.depth(),
            "rig assembled"
        );

        Ok(Self { root, joints })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn joints(&self) -> &RigJoints {
        &self.joints
    }

    pub fn joint(&self, joint: Joint) -> Option<&Node> {
        self.root.get(self.joints.path(joint))
    }

    /// Compose `delta` onto a joint's local transform.
    pub fn transform_joint(&mut self, joint: Joint, delta: Mat4) {
        if let Some(node) = self.root.get_mut(self.joints.path(joint)) {
            node.transform(delta);
        }
    }

    /// Draw the whole figure with the root at the world origin.
    pub fn draw(&self, view: &Mat4, projection: &Mat4) {
        self.root.draw(&Mat4::IDENTITY, view, projection);
    }
}

/// Build a socket joint with its limb chain. Returns the socket node and the
/// path from the socket to the middle joint.
fn limb<F: PrimitiveFactory>(
    side: Side,
    names: &LimbNames,
    socket_offset: Mat4,
    config: &RigConfig,
    factory: &mut F,
) -> Result<(Node, NodePath), F::Error> {
    let slices = config.slices;
    let name = |piece: &str| format!("{}_{}", side.name(), piece);
    let step = translation(0.0, 0.0, -LIMB_STEP);

    let mut end = Node::named(name(names.end), step);
    end.add(factory.sphere(config.joint_radius, slices)?);

    let mut lower = Node::named(name(names.lower), step);
    lower.add(factory.cylinder(BONE_LENGTH, config.bone_radius, slices)?);
    lower.add(end);

    let mut middle = Node::named(name(names.middle), step);
    middle.add(factory.sphere(config.joint_radius, slices)?);
    middle.add(lower);

    let mut upper = Node::named(
        name(names.upper),
        translation(-LIMB_STEP, 0.0, 0.0) * rotation_degrees(Vec3::Y, 90.0),
    );
    upper.add(factory.cylinder(BONE_LENGTH, config.bone_radius, slices)?);
    let middle_ix = upper.add_child(middle);

    let mut socket = Node::named(name(names.socket), socket_offset);
    socket.add(factory.sphere(config.joint_radius, slices)?);
    let upper_ix = socket.add_child(upper);

    Ok((socket, NodePath::from([upper_ix, middle_ix])))
}

fn join(prefix: &NodePath, suffix: &NodePath) -> NodePath {
    let mut indices = prefix.indices().to_vec();
    indices.extend_from_slice(suffix.indices());
    NodePath::new(indices)
}
