//! Perspective camera and a fly-through controller.

use glam::{Mat4, Quat, Vec2, Vec3};

/// A perspective camera described by a position and a view direction.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Unit view direction
    pub orientation: Vec3,
    /// World up
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Viewport width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            orientation: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Camera at `position` looking down -Z.
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
            ..Self::default()
        }
    }

    /// Update the aspect ratio from a viewport size. Zero-sized viewports
    /// (minimized windows) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    /// Get the projection matrix in OpenGL clip space (depth in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.orientation.cross(self.up).normalize_or_zero()
    }

    /// Point the camera at a target position.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(direction) = (target - self.position).try_normalize() {
            self.orientation = direction;
        }
    }
}

/// One frame of fly-controller input.
///
/// Axis values are in `[-1, 1]`; `look` is the mouse movement in pixels while
/// the look button is held.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlyInput {
    /// +1 forward, -1 backward
    pub forward: f32,
    /// +1 right, -1 left
    pub right: f32,
    /// +1 up, -1 down
    pub up: f32,
    pub look: Option<Vec2>,
}

/// Keyboard-and-mouse fly controller.
///
/// Movement is a fixed distance per frame along the view direction, its
/// right vector, and world up. Mouse drags rotate the view: vertical motion
/// pitches about the right vector, horizontal motion yaws about world up.
#[derive(Clone, Debug)]
pub struct FlyController {
    /// Distance per frame
    pub speed: f32,
    /// Degrees for a drag spanning the viewport height
    pub sensitivity: f32,
    /// Pitch that would bring the view within this many degrees of straight
    /// up or down is dropped
    pub pole_margin_degrees: f32,
    viewport_height: f32,
}

impl Default for FlyController {
    fn default() -> Self {
        Self {
            speed: 0.1,
            sensitivity: 100.0,
            pole_margin_degrees: 5.0,
            viewport_height: 1000.0,
        }
    }
}

impl FlyController {
    pub fn new(speed: f32, sensitivity: f32, pole_margin_degrees: f32) -> Self {
        Self {
            speed,
            sensitivity,
            pole_margin_degrees,
            ..Self::default()
        }
    }

    /// Mouse deltas are scaled by the viewport height.
    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    /// Apply one frame of input to the camera.
    pub fn update(&self, camera: &mut Camera, input: &FlyInput) {
        let right = camera.right();
        camera.position += self.speed
            * (input.forward * camera.orientation + input.right * right + input.up * camera.up);

        if let Some(look) = input.look {
            self.look(camera, look);
        }
    }

    fn look(&self, camera: &mut Camera, delta: Vec2) {
        let pitch = self.sensitivity * delta.y / self.viewport_height;
        let yaw = self.sensitivity * delta.x / self.viewport_height;

        let right = camera.right();
        if right != Vec3::ZERO {
            let pitched = Quat::from_axis_angle(right, (-pitch).to_radians()) * camera.orientation;
            let margin = self.pole_margin_degrees.to_radians();
            let up = camera.up.normalize_or_zero();
            if pitched.angle_between(up) > margin && pitched.angle_between(-up) > margin {
                camera.orientation = pitched;
            }
        }

        if let Some(up) = camera.up.try_normalize() {
            camera.orientation = Quat::from_axis_angle(up, (-yaw).to_radians()) * camera.orientation;
        }
        camera.orientation = camera.orientation.normalize_or_zero();
    }
}
