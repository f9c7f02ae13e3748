//! Integration tests for the rig driven by the walk cycle.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use marionette_scene::{
    Camera, Drawable, Joint, PrimitiveFactory, Rig, RigConfig, Side, WalkCycle, WalkPhase,
};

/// Records the model matrix of every draw into a shared log.
struct Recorder {
    log: Rc<RefCell<Vec<Mat4>>>,
}

impl Drawable for Recorder {
    fn draw(&self, model: &Mat4, _view: &Mat4, _projection: &Mat4) {
        self.log.borrow_mut().push(*model);
    }
}

#[derive(Default)]
struct RecordingFactory {
    log: Rc<RefCell<Vec<Mat4>>>,
}

impl RecordingFactory {
    fn recorder(&self) -> Box<dyn Drawable> {
        Box::new(Recorder {
            log: Rc::clone(&self.log),
        })
    }
}

impl PrimitiveFactory for RecordingFactory {
    type Error = Infallible;

    fn cylinder(&mut self, _: f32, _: f32, _: u32) -> Result<Box<dyn Drawable>, Infallible> {
        Ok(self.recorder())
    }

    fn sphere(&mut self, _: f32, _: u32) -> Result<Box<dyn Drawable>, Infallible> {
        Ok(self.recorder())
    }
}

fn setup() -> (Rig, Rc<RefCell<Vec<Mat4>>>) {
    let mut factory = RecordingFactory::default();
    let Ok(rig) = Rig::build(&RigConfig::default(), &mut factory);
    (rig, factory.log)
}

fn draw(rig: &Rig, log: &Rc<RefCell<Vec<Mat4>>>) -> Vec<Mat4> {
    log.borrow_mut().clear();
    let camera = Camera::default();
    rig.draw(&camera.view_matrix(), &camera.projection_matrix());
    log.borrow().clone()
}

fn world_origin(rig: &Rig, name: &str) -> Vec3 {
    let path = rig.root().find(name).expect("node exists");
    rig.root()
        .world_transform_of(&path, &Mat4::IDENTITY)
        .expect("valid path")
        .transform_point3(Vec3::ZERO)
}

#[test]
fn test_every_drawable_drawn_once_per_frame() {
    let (mut rig, log) = setup();
    let mut cycle = WalkCycle::default();

    assert_eq!(draw(&rig, &log).len(), 24);
    for _ in 0..45 {
        cycle.advance(&mut rig);
    }
    assert_eq!(draw(&rig, &log).len(), 24);
}

#[test]
fn test_drawing_does_not_mutate() {
    let (mut rig, log) = setup();
    let mut cycle = WalkCycle::default();
    for _ in 0..10 {
        cycle.advance(&mut rig);
    }

    let first = draw(&rig, &log);
    let second = draw(&rig, &log);
    assert_eq!(first, second);
}

#[test]
fn test_swinging_right_arm_moves_only_that_arm() {
    let (mut rig, _) = setup();
    let left_wrist = world_origin(&rig, "left_wrist");
    let right_wrist = world_origin(&rig, "right_wrist");
    let right_shoulder = world_origin(&rig, "right_shoulder");
    let root = rig.root().local_transform();

    // Undo the stride so only the limb motion is compared
    let mut cycle = WalkCycle::default();
    for _ in 0..10 {
        cycle.advance(&mut rig);
    }
    rig.root_mut().set_local_transform(root);

    assert_eq!(cycle.phase(), WalkPhase::Starting);
    assert!((world_origin(&rig, "left_wrist") - left_wrist).length() < 1e-4);
    assert!((world_origin(&rig, "right_wrist") - right_wrist).length() > 0.1);
    // Shoulder sockets stay put while the limb below them turns
    assert!((world_origin(&rig, "right_shoulder") - right_shoulder).length() < 1e-4);
}

#[test]
fn test_whole_figure_advances_together() {
    let (mut rig, _) = setup();
    let head = world_origin(&rig, "head");
    let pelvis = world_origin(&rig, "pelvis");
    let mut cycle = WalkCycle::default();

    for _ in 0..20 {
        cycle.advance(&mut rig);
    }

    let head_moved = world_origin(&rig, "head") - head;
    let pelvis_moved = world_origin(&rig, "pelvis") - pelvis;
    assert!(head_moved.length() > 1.0);
    assert!((head_moved - pelvis_moved).length() < 1e-4);
}

#[test]
fn test_cycle_returns_to_rest_pose_for_right_arm() {
    let (mut rig, _) = setup();
    let mut cycle = WalkCycle::default();

    for _ in 0..60 {
        cycle.advance(&mut rig);
    }

    assert_eq!(cycle.phase(), WalkPhase::LeftSwing);
    assert_eq!(cycle.arm_angle(Side::Right), 0.0);
    let shoulder = rig
        .joint(Joint::Shoulder(Side::Right))
        .expect("joint exists")
        .local_transform();
    let (_, rotation, _) = shoulder.to_scale_rotation_translation();
    assert!(rotation.w.abs() > 1.0 - 1e-4);
}
