// Host-side tests for the CPU half of the renderer: vertex building and marker instances.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod scene {
    include!("../src/render/scene.rs");
}

use glam::Vec3;
use instant::Instant;
use scene::*;
use viewer_core::{
    Marker, MarkerCollection, MarkerEdits, MarkerPosition, TriangleMesh, BASE_SIZE,
    GRID_DIVISIONS, MARKER_RADIUS,
};

fn marker(id: &str, x: f32) -> Marker {
    let mut m = Marker::blank();
    m.id = id.into();
    m.position = MarkerPosition::from(Vec3::new(x, 0.0, 0.0));
    m
}

fn collection() -> MarkerCollection {
    let mut markers = MarkerCollection::default();
    markers.add(marker("a", 1.0));
    markers.add(marker("b", 2.0));
    markers
}

#[test]
fn vertex_layouts_match_shader_strides() {
    assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    assert_eq!(std::mem::size_of::<LineVertex>(), 28);
    assert_eq!(std::mem::size_of::<MarkerInstance>(), 32);
}

#[test]
fn helper_lines_cover_grid_and_box() {
    let lines = helper_lines();
    let grid = 4 * (GRID_DIVISIONS as usize + 1);
    assert_eq!(lines.len(), grid + 24);
    let half = BASE_SIZE * 0.5;
    assert!(lines[..grid].iter().all(|v| v.position[1] == 0.0));
    for v in &lines {
        assert!(v.position.iter().all(|c| c.abs() <= half + 1e-4));
    }
}

#[test]
fn srgb_conversion_endpoints() {
    assert_eq!(srgb_to_linear(0.0), 0.0);
    assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    assert!(srgb_to_linear(0.5) < 0.5);
    assert_eq!(linear_rgba([1.0, 1.0, 1.0], 0.25)[3], 0.25);
}

#[test]
fn mesh_vertices_fall_back_to_up_normal() {
    let mesh = TriangleMesh {
        positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![],
        indices: vec![0, 1, 2],
    };
    let verts = mesh_vertices(&mesh);
    assert_eq!(verts.len(), 3);
    assert!(verts.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
}

#[test]
fn marker_positions_prefer_pending_drag() {
    let markers = collection();
    let mut edits = MarkerEdits::default();
    let b = markers.as_slice()[1].id.clone();
    edits.stage(&b, Instant::now(), |p| {
        p.position = Some(MarkerPosition::from(Vec3::new(9.0, 8.0, 7.0)))
    });
    let positions = marker_positions(&markers, &edits);
    assert_eq!(positions, vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(9.0, 8.0, 7.0)]);
}

#[test]
fn active_marker_gets_its_own_colour() {
    let mut markers = collection();
    let a = markers.as_slice()[0].id.clone();
    markers.set_active(Some(a));
    let positions = marker_positions(&markers, &MarkerEdits::default());
    let instances = marker_instances(&markers, &positions);
    assert_eq!(instances.len(), 2);
    assert_ne!(instances[0].color, instances[1].color);
    assert!(instances.iter().all(|i| i.radius == MARKER_RADIUS));
    assert_eq!(instances[1].position, [2.0, 0.0, 0.0]);
}
