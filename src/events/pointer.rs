use crate::app::AppHandles;
use crate::camera::screen_to_world_ray;
use crate::constants::{DRAG_THRESHOLD_PX, PICK_RADIUS_SCALE};
use crate::dom;
use crate::input::{self, DragMode};
use crate::render::scene::marker_positions;
use glam::{Vec2, Vec3};
use instant::Instant;
use viewer_core::{Command, MarkerId, MarkerPosition, MARKER_RADIUS};
use web_sys as web;

pub fn wire_input_handlers(handles: AppHandles) {
    wire_pointerdown(&handles);
    wire_pointermove(&handles);
    wire_pointerup(&handles);
}

/// Marker under the canvas pixel `px`, if any.
fn pick(h: &AppHandles, px: Vec2) -> Option<usize> {
    let (ro, rd) = screen_to_world_ray(&h.canvas, &h.orbit.borrow(), px);
    let store = h.store.borrow();
    let positions = marker_positions(&store.state().markers, &h.edits.borrow());
    input::pick_nearest(ro, rd, positions, MARKER_RADIUS * PICK_RADIUS_SCALE)
}

fn marker_at(h: &AppHandles, index: usize) -> Option<(MarkerId, Vec3)> {
    let store = h.store.borrow();
    let marker = store.state().markers.as_slice().get(index)?;
    let position = h
        .edits
        .borrow()
        .pending_position(&marker.id)
        .unwrap_or(marker.position);
    Some((marker.id.clone(), position.into()))
}

fn is_active(h: &AppHandles, index: usize) -> bool {
    let store = h.store.borrow();
    let markers = &store.state().markers;
    markers
        .as_slice()
        .get(index)
        .map(|m| markers.active() == Some(&m.id))
        .unwrap_or(false)
}

fn wire_pointerdown(h: &AppHandles) {
    let h = h.clone();
    let canvas = h.canvas.clone();
    dom::on_event(&canvas, "pointerdown", move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        let px = input::pointer_canvas_px(&ev, &h.canvas);
        let hit = pick(&h, px);
        h.drag.borrow_mut().mode = DragMode::Pressed { hit, start: px };
        {
            let mut ms = h.mouse.borrow_mut();
            ms.x = px.x;
            ms.y = px.y;
            ms.down = true;
        }
        _ = h.canvas.set_pointer_capture(ev.pointer_id());
    });
}

fn wire_pointermove(h: &AppHandles) {
    let h = h.clone();
    let canvas = h.canvas.clone();
    dom::on_event(&canvas, "pointermove", move |ev: web::PointerEvent| {
        let px = input::pointer_canvas_px(&ev, &h.canvas);
        {
            let mut ms = h.mouse.borrow_mut();
            ms.x = px.x;
            ms.y = px.y;
        }

        let mode = h.drag.borrow().mode;
        let next = match mode {
            DragMode::Idle => {
                let cursor = if pick(&h, px).is_some() { "pointer" } else { "grab" };
                _ = h.canvas.style().set_property("cursor", cursor);
                DragMode::Idle
            }
            DragMode::Pressed { hit, start } => {
                if !input::exceeds_threshold(start, px, DRAG_THRESHOLD_PX) {
                    return;
                }
                match hit.filter(|&i| is_active(&h, i)).and_then(|i| begin_marker_drag(&h, i, start)) {
                    Some(mode) => mode,
                    None => {
                        orbit_step(&h, start, px);
                        DragMode::Orbit { last: px }
                    }
                }
            }
            DragMode::Orbit { last } => {
                orbit_step(&h, last, px);
                DragMode::Orbit { last: px }
            }
            DragMode::Marker {
                index,
                anchor,
                normal,
                grab,
            } => {
                let (ro, rd) = screen_to_world_ray(&h.canvas, &h.orbit.borrow(), px);
                if let Some(t) = input::ray_plane(ro, rd, anchor, normal) {
                    let target = ro + rd * t - grab;
                    if let Some((id, _)) = marker_at(&h, index) {
                        h.edits.borrow_mut().stage(&id, Instant::now(), |p| {
                            p.position = Some(MarkerPosition::from(target))
                        });
                    }
                }
                mode
            }
        };
        h.drag.borrow_mut().mode = next;
    });
}

/// Start moving marker `index` on the camera-facing plane through it.
fn begin_marker_drag(h: &AppHandles, index: usize, start: Vec2) -> Option<DragMode> {
    let (id, anchor) = marker_at(h, index)?;
    let orbit = *h.orbit.borrow();
    let normal = (orbit.eye() - orbit.target).normalize_or_zero();
    let (ro, rd) = screen_to_world_ray(&h.canvas, &orbit, start);
    let t = input::ray_plane(ro, rd, anchor, normal)?;
    log::info!("[drag] begin drag on marker {}", id);
    Some(DragMode::Marker {
        index,
        anchor,
        normal,
        grab: ro + rd * t - anchor,
    })
}

fn orbit_step(h: &AppHandles, from: Vec2, to: Vec2) {
    let d = to - from;
    let height = h.canvas.height() as f32;
    h.orbit.borrow_mut().orbit(d.x, d.y, height);
    _ = h.canvas.style().set_property("cursor", "grabbing");
}

fn wire_pointerup(h: &AppHandles) {
    let h = h.clone();
    let canvas = h.canvas.clone();
    dom::on_event(&canvas, "pointerup", move |ev: web::PointerEvent| {
        let mode = std::mem::take(&mut h.drag.borrow_mut().mode);
        match mode {
            DragMode::Pressed { hit: Some(i), .. } => {
                let id = marker_at(&h, i).map(|(id, _)| id);
                if let Some(id) = id {
                    log::info!("[drag] click toggles marker {}", id);
                    h.dispatch_logged(Command::ToggleActiveMarker(id));
                }
            }
            DragMode::Marker { index, .. } => {
                if let Some((id, _)) = marker_at(&h, index) {
                    h.flush_marker(&id);
                }
            }
            _ => {}
        }
        h.mouse.borrow_mut().down = false;
        _ = h.canvas.style().set_property("cursor", "grab");
        _ = h.canvas.release_pointer_capture(ev.pointer_id());
    });
}
