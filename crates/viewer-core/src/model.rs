//! Binary glTF intake.
//!
//! Parsing is delegated to the `gltf` crate. This module only checks the
//! container magic, summarises the document and flattens the default scene's
//! triangle primitives into a single world-space mesh for display.
//! Compressed geometry (Draco, meshopt) and KTX2 textures are reported as
//! unsupported rather than decoded.

use crate::error::ModelError;
use glam::{Mat3, Mat4, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;

const GLB_MAGIC: &[u8; 4] = b"glTF";

const UNSUPPORTED_EXTENSIONS: &[&str] = &[
    "KHR_draco_mesh_compression",
    "EXT_meshopt_compression",
    "KHR_meshopt_compression",
    "KHR_texture_basisu",
];

/// File-picker hints for the dropzone.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["glb"];
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "model/gltf-binary",
    "model/gltf_binary",
    "application/octet-stream",
];

/// Whether a dropped file looks like something we should try to decode.
pub fn is_accepted_file(name: &str, mime: &str) -> bool {
    let ext_ok = name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);
    ext_ok || ACCEPTED_MIME_TYPES.contains(&mime)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }
}

/// Summary of a decoded model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInfo {
    pub byte_len: usize,
    pub mesh_count: usize,
    pub node_count: usize,
    pub primitive_count: usize,
    pub material_count: usize,
    pub animation_count: usize,
    pub extensions_required: Vec<String>,
    pub bounds: Option<Aabb>,
}

/// Indexed triangle list in model space (node transforms already applied).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub info: ModelInfo,
    pub mesh: TriangleMesh,
}

/// Decode GLB bytes.
pub fn decode_glb(bytes: &[u8]) -> Result<LoadedModel, ModelError> {
    if bytes.is_empty() {
        return Err(ModelError::Empty);
    }
    if bytes.len() < GLB_MAGIC.len() || &bytes[..GLB_MAGIC.len()] != GLB_MAGIC {
        return Err(ModelError::NotBinaryGltf);
    }

    let gltf = gltf::Gltf::from_slice(bytes)?;
    let extensions_required: Vec<String> =
        gltf.extensions_required().map(str::to_owned).collect();
    if let Some(ext) = extensions_required
        .iter()
        .find(|e| UNSUPPORTED_EXTENSIONS.contains(&e.as_str()))
    {
        return Err(ModelError::UnsupportedExtension(ext.clone()));
    }

    let blob = gltf.blob.as_deref();
    let mut mesh = TriangleMesh::default();
    let scene = gltf.default_scene().or_else(|| gltf.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, blob, &mut mesh);
        }
    } else {
        log::warn!("[model] document has no scene; nothing to display");
    }

    let bounds = Aabb::from_points(mesh.positions.iter().copied().map(Vec3::from));
    let info = ModelInfo {
        byte_len: bytes.len(),
        mesh_count: gltf.meshes().len(),
        node_count: gltf.nodes().len(),
        primitive_count: gltf.meshes().map(|m| m.primitives().len()).sum(),
        material_count: gltf.materials().len(),
        animation_count: gltf.animations().len(),
        extensions_required,
        bounds,
    };
    log::info!(
        "[model] decoded {} bytes: meshes={} nodes={} triangles={}",
        info.byte_len,
        info.mesh_count,
        info.node_count,
        mesh.triangle_count()
    );
    Ok(LoadedModel { info, mesh })
}

fn collect_node(node: &gltf::Node<'_>, parent: Mat4, blob: Option<&[u8]>, out: &mut TriangleMesh) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::debug!("[model] skipping {:?} primitive", primitive.mode());
                continue;
            }
            let reader = primitive.reader(|buffer| match buffer.source() {
                Source::Bin => blob,
                Source::Uri(_) => None,
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(ix) => ix.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            if indices.iter().any(|&i| i as usize >= positions.len()) {
                log::warn!("[model] primitive has out-of-range indices; skipped");
                continue;
            }
            let normals: Vec<Vec3> = match reader.read_normals() {
                Some(n) => n.map(Vec3::from).collect(),
                None => vertex_normals(&positions, &indices),
            };

            let base = out.positions.len() as u32;
            out.positions
                .extend(positions.iter().map(|p| world.transform_point3(*p).to_array()));
            out.normals.extend(
                normals
                    .iter()
                    .map(|n| (normal_matrix * *n).normalize_or_zero().to_array()),
            );
            out.indices
                .extend(indices.chunks_exact(3).flatten().map(|i| base + i));
        }
    }
    for child in node.children() {
        collect_node(&child, world, blob, out);
    }
}

/// Area-weighted vertex normals for primitives that ship without them.
fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals.into_iter().map(Vec3::normalize_or_zero).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_glb_by_extension_or_listed_mime() {
        assert!(is_accepted_file("Fox.GLB", ""));
        assert!(is_accepted_file("blob", "model/gltf-binary"));
        assert!(is_accepted_file("blob", "model/gltf_binary"));
        // Browsers often report .glb files as plain binary.
        assert!(is_accepted_file("download", "application/octet-stream"));
        assert!(!is_accepted_file("scene.gltf", "model/gltf+json"));
        assert!(!is_accepted_file("notes.txt", "text/plain"));
        assert!(!is_accepted_file("noext", ""));
    }

    #[test]
    fn flat_normals_for_ccw_triangle_point_up_z() {
        let p = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let n = vertex_normals(&p, &[0, 1, 2]);
        assert!(n.iter().all(|n| (*n - Vec3::Z).length() < 1e-6));
    }
}
