use glam::{Vec2, Vec3};
use web_sys as web;

#[derive(Default, Clone, Copy, Debug)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
}

/// What a pointer press turned into.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub enum DragMode {
    #[default]
    Idle,
    /// Pressed but not moved past the threshold yet; `hit` is the marker under the pointer.
    Pressed { hit: Option<usize>, start: Vec2 },
    Orbit { last: Vec2 },
    /// Moving a marker on the plane through `anchor` facing the camera.
    Marker { index: usize, anchor: Vec3, normal: Vec3, grab: Vec3 },
}

#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub mode: DragMode,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Distance along the ray to the plane through `point` with `normal`.
#[inline]
pub fn ray_plane(ray_origin: Vec3, ray_dir: Vec3, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = normal.dot(ray_dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (point - ray_origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
}

/// Index of the closest sphere hit along the ray.
pub fn pick_nearest(
    ray_origin: Vec3,
    ray_dir: Vec3,
    centers: impl IntoIterator<Item = Vec3>,
    radius: f32,
) -> Option<usize> {
    let mut best = None::<(usize, f32)>;
    for (i, c) in centers.into_iter().enumerate() {
        if let Some(t) = ray_sphere(ray_origin, ray_dir, c, radius) {
            match best {
                Some((_, bt)) if t >= bt => {}
                _ => best = Some((i, t)),
            }
        }
    }
    best.map(|(i, _)| i)
}

/// Canvas backing-store pixels to normalized device coordinates.
#[inline]
pub fn px_to_ndc(px: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        2.0 * px.x / width.max(1.0) - 1.0,
        1.0 - 2.0 * px.y / height.max(1.0),
    )
}

/// Normalized device coordinates to css pixels inside an element of the given size.
#[inline]
pub fn ndc_to_css(ndc: Vec2, css_width: f32, css_height: f32) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * css_width,
        (0.5 - ndc.y * 0.5) * css_height,
    )
}

/// Slider and text inputs hand values over as strings.
#[inline]
pub fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

#[inline]
pub fn exceeds_threshold(start: Vec2, now: Vec2, threshold: f32) -> bool {
    start.distance_squared(now) > threshold * threshold
}

// ---------------- Pointer helpers ----------------
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width() as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height() as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}
