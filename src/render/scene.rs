use crate::constants::{GRID_LINE_ALPHA, HELPER_LINE_COLOR};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use viewer_core::{
    MarkerCollection, MarkerEdits, TriangleMesh, ACTIVE_MARKER_COLOR, BASE_SIZE, GRID_DIVISIONS,
    MARKER_COLOR, MARKER_RADIUS,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

/// Two triangles covering [-0.5, 0.5]²; billboarded per marker instance.
pub const QUAD: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
pub fn linear_rgba(srgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [
        srgb_to_linear(srgb[0]),
        srgb_to_linear(srgb[1]),
        srgb_to_linear(srgb[2]),
        alpha,
    ]
}

pub fn mesh_vertices(mesh: &TriangleMesh) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: *p,
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
        })
        .collect()
}

/// Grid on the XZ plane plus the wireframe reference cube, both `BASE_SIZE` wide
/// and centred on the origin.
pub fn helper_lines() -> Vec<LineVertex> {
    let half = BASE_SIZE * 0.5;
    let mut grid_color = HELPER_LINE_COLOR;
    grid_color[3] *= GRID_LINE_ALPHA;
    let mut out = Vec::with_capacity(4 * (GRID_DIVISIONS as usize + 1) + 24);

    let step = BASE_SIZE / GRID_DIVISIONS as f32;
    for i in 0..=GRID_DIVISIONS {
        let o = -half + step * i as f32;
        for (a, b) in [
            ([o, 0.0, -half], [o, 0.0, half]),
            ([-half, 0.0, o], [half, 0.0, o]),
        ] {
            out.push(LineVertex { position: a, color: grid_color });
            out.push(LineVertex { position: b, color: grid_color });
        }
    }

    let c = |x: f32, y: f32, z: f32| [x * half, y * half, z * half];
    let corners = [
        c(-1.0, -1.0, -1.0),
        c(1.0, -1.0, -1.0),
        c(1.0, 1.0, -1.0),
        c(-1.0, 1.0, -1.0),
        c(-1.0, -1.0, 1.0),
        c(1.0, -1.0, 1.0),
        c(1.0, 1.0, 1.0),
        c(-1.0, 1.0, 1.0),
    ];
    const EDGES: [(usize, usize); 12] = [
        (0, 1), (1, 2), (2, 3), (3, 0),
        (4, 5), (5, 6), (6, 7), (7, 4),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];
    for (a, b) in EDGES {
        out.push(LineVertex { position: corners[a], color: HELPER_LINE_COLOR });
        out.push(LineVertex { position: corners[b], color: HELPER_LINE_COLOR });
    }
    out
}

/// Where each marker is drawn, in list order: the position being dragged to
/// when an uncommitted edit exists, else the stored one.
pub fn marker_positions(markers: &MarkerCollection, edits: &MarkerEdits) -> Vec<Vec3> {
    markers
        .iter()
        .map(|m| edits.pending_position(&m.id).unwrap_or(m.position).into())
        .collect()
}

pub fn marker_instances(markers: &MarkerCollection, positions: &[Vec3]) -> Vec<MarkerInstance> {
    let normal = linear_rgba(MARKER_COLOR, 1.0);
    let active = linear_rgba(ACTIVE_MARKER_COLOR, 1.0);
    markers
        .iter()
        .zip(positions)
        .map(|(m, p)| MarkerInstance {
            position: p.to_array(),
            radius: MARKER_RADIUS,
            color: if markers.active() == Some(&m.id) {
                active
            } else {
                normal
            },
        })
        .collect()
}
