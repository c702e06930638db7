//! Camera types shared with the web frontend.
//!
//! These avoid platform-specific APIs so picking math can be tested on the
//! host. The web frontend builds matrices from them and turns pointer drags
//! into orbit steps.

use crate::constants::{camera_start_position, CAMERA_FAR, CAMERA_FOVY_DEGREES, CAMERA_NEAR};
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// World-space ray through normalized device coordinates (`x`, `y` in [-1, 1]).
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> (Vec3, Vec3) {
        let inv = self.view_proj().inverse();
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        (self.eye, (far - self.eye).normalize_or_zero())
    }

    /// Project a world point to normalized device coordinates; `None` when
    /// the point is behind the camera.
    pub fn world_to_ndc(&self, p: Vec3) -> Option<Vec3> {
        let clip = self.view_proj() * p.extend(1.0);
        (clip.w > 0.0).then(|| clip.truncate() / clip.w)
    }
}

/// Orbit controller around a fixed target; zoom is disabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation about +Y, radians.
    pub yaw: f32,
    /// Elevation above the XZ plane, radians.
    pub pitch: f32,
}

const PITCH_LIMIT: f32 = PI / 2.0 - 1e-3;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(camera_start_position(), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-3);
        Self {
            target,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.distance
    }

    /// Rotate by a pointer drag of `dx`, `dy` pixels in a viewport `height` pixels tall.
    /// A drag across the full height turns the camera once around.
    pub fn orbit(&mut self, dx: f32, dy: f32, height: f32) {
        let h = height.max(1.0);
        self.yaw -= TAU * dx / h;
        self.pitch = (self.pitch + TAU * dy / h).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}
