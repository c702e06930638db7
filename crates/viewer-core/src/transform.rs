use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Scale, position and rotation applied to the loaded model as a whole.
///
/// Rotation is kept in turns (one turn is a full revolution), which is what
/// the sliders and the exported document carry. Setters overwrite without
/// validation; slider bounds are a widget concern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn set_position(&mut self, axis: Axis, value: f32) {
        self.position[axis.index()] = value;
    }

    pub fn set_rotation(&mut self, axis: Axis, turns: f32) {
        self.rotation[axis.index()] = turns;
    }

    #[inline]
    pub fn position_on(&self, axis: Axis) -> f32 {
        self.position[axis.index()]
    }

    #[inline]
    pub fn rotation_on(&self, axis: Axis) -> f32 {
        self.rotation[axis.index()]
    }

    /// Rotation converted from turns to radians.
    #[inline]
    pub fn rotation_radians(&self) -> Vec3 {
        self.rotation * TAU
    }

    /// World matrix for the model: translate, then scale, then rotate (XYZ Euler).
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation_radians();
        let rotation = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_quat(rotation)
    }
}
