//! Procedural walk cycle for the [`Rig`].
//!
//! Arms and legs swing in opposition: while the right arm moves forward the
//! left leg does too, then both return as the other pair swings out. Each
//! [`WalkCycle::advance`] call is one frame; every frame also pushes the rig
//! forward by a fixed stride.

use glam::Vec3;

use crate::rig::{Joint, Rig, Side};
use crate::transform::{rotation_degrees, translation};

/// Which half of the cycle is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalkPhase {
    /// First swing out of the rest pose: right arm and left leg only.
    #[default]
    Starting,
    /// Right arm and left leg return while the left arm and right leg swing.
    RightSwing,
    /// Mirror of [`WalkPhase::RightSwing`].
    LeftSwing,
}

/// Step sizes and bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkConfig {
    /// Arm rotation per frame, in degrees
    pub arm_step_degrees: f32,
    /// Leg rotation per frame, in degrees
    pub leg_step_degrees: f32,
    /// Arm angle at which a swing reverses
    pub swing_limit_degrees: f32,
    /// Root translation per frame, along the root's local Y
    pub stride: f32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            arm_step_degrees: 1.0,
            leg_step_degrees: 1.5,
            swing_limit_degrees: 30.0,
            stride: 0.1,
        }
    }
}

/// Shoulders and hips swing about -Z in their local frames.
const SOCKET_AXIS: Vec3 = Vec3::NEG_Z;
const ELBOW_AXIS: Vec3 = Vec3::X;
const KNEE_AXIS: Vec3 = Vec3::NEG_X;

/// Animation state for one rig.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkCycle {
    config: WalkConfig,
    phase: WalkPhase,
    right_arm: f32,
    left_arm: f32,
    right_leg: f32,
    left_leg: f32,
}

impl WalkCycle {
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> WalkPhase {
        self.phase
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Accumulated swing of an arm, in degrees.
    pub fn arm_angle(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left_arm,
            Side::Right => self.right_arm,
        }
    }

    /// Accumulated swing of a leg, in degrees.
    pub fn leg_angle(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left_leg,
            Side::Right => self.right_leg,
        }
    }

    /// Advance one frame, posing `rig` accordingly.
    pub fn advance(&mut self, rig: &mut Rig) {
        let arm = self.config.arm_step_degrees;
        let leg = self.config.leg_step_degrees;
        let limit = self.config.swing_limit_degrees;

        match self.phase {
            WalkPhase::Starting => {
                self.swing_arm(rig, Side::Right, arm);
                self.swing_leg(rig, Side::Left, leg);
                if self.right_arm >= limit {
                    self.phase = WalkPhase::RightSwing;
                }
            }
            WalkPhase::RightSwing => {
                self.swing_arm(rig, Side::Right, -arm);
                self.swing_leg(rig, Side::Left, -leg);
                self.swing_arm(rig, Side::Left, arm);
                self.swing_leg(rig, Side::Right, leg);
                if self.right_arm <= 0.0 {
                    self.phase = WalkPhase::LeftSwing;
                }
            }
            WalkPhase::LeftSwing => {
                self.swing_arm(rig, Side::Right, arm);
                self.swing_leg(rig, Side::Left, leg);
                self.swing_arm(rig, Side::Left, -arm);
                self.swing_leg(rig, Side::Right, -leg);
                if self.right_arm >= limit {
                    self.phase = WalkPhase::RightSwing;
                }
            }
        }

        rig.root_mut()
            .transform(translation(0.0, self.config.stride, 0.0));
    }

    fn swing_arm(&mut self, rig: &mut Rig, side: Side, degrees: f32) {
        match side {
            Side::Left => self.left_arm += degrees,
            Side::Right => self.right_arm += degrees,
        }
        rig.transform_joint(Joint::Shoulder(side), rotation_degrees(SOCKET_AXIS, degrees));
        rig.transform_joint(Joint::Elbow(side), rotation_degrees(ELBOW_AXIS, degrees));
    }

    fn swing_leg(&mut self, rig: &mut Rig, side: Side, degrees: f32) {
        match side {
            Side::Left => self.left_leg += degrees,
            Side::Right => self.right_leg += degrees,
        }
        rig.transform_joint(Joint::Hip(side), rotation_degrees(SOCKET_AXIS, degrees));
        rig.transform_joint(Joint::Knee(side), rotation_degrees(KNEE_AXIS, degrees));
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use glam::Mat4;

    use super::*;
    use crate::node::Drawable;
    use crate::rig::{PrimitiveFactory, RigConfig};
    use crate::transform::Transform;

    struct Silent;

    impl Drawable for Silent {
        fn draw(&self, _: &Mat4, _: &Mat4, _: &Mat4) {}
    }

    struct SilentFactory;

    impl PrimitiveFactory for SilentFactory {
        type Error = Infallible;

        fn cylinder(&mut self, _: f32, _: f32, _: u32) -> Result<Box<dyn Drawable>, Infallible> {
            Ok(Box::new(Silent))
        }

        fn sphere(&mut self, _: f32, _: u32) -> Result<Box<dyn Drawable>, Infallible> {
            Ok(Box::new(Silent))
        }
    }

    fn rig() -> Rig {
        let Ok(rig) = Rig::build(&RigConfig::default(), &mut SilentFactory);
        rig
    }

    fn run(cycle: &mut WalkCycle, rig: &mut Rig, frames: usize) {
        for _ in 0..frames {
            cycle.advance(rig);
        }
    }

    fn joint_angle(rig: &Rig, joint: Joint) -> f32 {
        let node = rig.joint(joint).expect("joint exists");
        Transform::from_matrix(node.local_transform()).rotation_angle_degrees()
    }

    #[test]
    fn test_starting_phase_lasts_until_limit() {
        let mut rig = rig();
        let mut cycle = WalkCycle::default();

        run(&mut cycle, &mut rig, 29);
        assert_eq!(cycle.phase(), WalkPhase::Starting);

        cycle.advance(&mut rig);
        assert_eq!(cycle.phase(), WalkPhase::RightSwing);
        assert_eq!(cycle.arm_angle(Side::Right), 30.0);
        assert_eq!(cycle.leg_angle(Side::Left), 45.0);
        assert_eq!(cycle.arm_angle(Side::Left), 0.0);
        assert_eq!(cycle.leg_angle(Side::Right), 0.0);
    }

    #[test]
    fn test_phases_alternate() {
        let mut rig = rig();
        let mut cycle = WalkCycle::default();

        run(&mut cycle, &mut rig, 60);
        assert_eq!(cycle.phase(), WalkPhase::LeftSwing);
        assert_eq!(cycle.arm_angle(Side::Right), 0.0);
        assert_eq!(cycle.arm_angle(Side::Left), 30.0);
        assert_eq!(cycle.leg_angle(Side::Right), 45.0);
        assert_eq!(cycle.leg_angle(Side::Left), 0.0);

        run(&mut cycle, &mut rig, 30);
        assert_eq!(cycle.phase(), WalkPhase::RightSwing);
        assert_eq!(cycle.arm_angle(Side::Right), 30.0);
        assert_eq!(cycle.arm_angle(Side::Left), 0.0);
    }

    #[test]
    fn test_joint_transforms_follow_angles() {
        let mut rig = rig();
        let mut cycle = WalkCycle::default();

        run(&mut cycle, &mut rig, 30);
        assert!((joint_angle(&rig, Joint::Shoulder(Side::Right)) - 30.0).abs() < 0.1);
        assert!((joint_angle(&rig, Joint::Elbow(Side::Right)) - 30.0).abs() < 0.1);
        assert!((joint_angle(&rig, Joint::Hip(Side::Left)) - 45.0).abs() < 0.1);
        assert!((joint_angle(&rig, Joint::Knee(Side::Left)) - 45.0).abs() < 0.1);
        assert!(joint_angle(&rig, Joint::Shoulder(Side::Left)) < 0.1);

        // Back through the rest pose for the right arm
        run(&mut cycle, &mut rig, 30);
        assert!(joint_angle(&rig, Joint::Shoulder(Side::Right)) < 0.5);
        assert!((joint_angle(&rig, Joint::Shoulder(Side::Left)) - 30.0).abs() < 0.1);
    }

    #[test]
    fn test_socket_offsets_survive_swing() {
        let mut rig = rig();
        let mut cycle = WalkCycle::default();
        let shoulder = rig
            .joint(Joint::Shoulder(Side::Right))
            .expect("shoulder")
            .local_transform();

        run(&mut cycle, &mut rig, 17);

        let after = rig
            .joint(Joint::Shoulder(Side::Right))
            .expect("shoulder")
            .local_transform();
        assert!(
            after
                .w_axis
                .truncate()
                .abs_diff_eq(shoulder.w_axis.truncate(), 1e-5)
        );
    }

    #[test]
    fn test_root_advances_by_stride() {
        let mut rig = rig();
        let mut cycle = WalkCycle::new(WalkConfig {
            stride: 0.25,
            ..WalkConfig::default()
        });
        let start = rig.root().local_transform();

        run(&mut cycle, &mut rig, 4);

        let expected = start * translation(0.0, 1.0, 0.0);
        assert!(rig.root().local_transform().abs_diff_eq(expected, 1e-5));
    }
}
