use crate::input;
use glam::{Vec2, Vec3};
use viewer_core::OrbitCamera;
use web_sys as web;

#[inline]
pub fn aspect(canvas: &web::HtmlCanvasElement) -> f32 {
    canvas.width().max(1) as f32 / canvas.height().max(1) as f32
}

/// Compute a world-space ray from canvas backing-store coordinates.
///
/// Returns `(ray_origin, ray_direction)` in world space.
pub fn screen_to_world_ray(
    canvas: &web::HtmlCanvasElement,
    orbit: &OrbitCamera,
    px: Vec2,
) -> (Vec3, Vec3) {
    let ndc = input::px_to_ndc(px, canvas.width() as f32, canvas.height() as f32);
    orbit.camera(aspect(canvas)).ray_from_ndc(ndc.x, ndc.y)
}
