pub mod camera;
pub mod collection;
pub mod constants;
pub mod document;
pub mod edit;
pub mod error;
pub mod marker;
pub mod model;
pub mod store;
pub mod transform;

pub use camera::*;
pub use collection::*;
pub use constants::*;
pub use document::{export, ImportReport, SceneDocument, ScenePatch};
pub use edit::*;
pub use error::*;
pub use marker::*;
pub use model::*;
pub use store::*;
pub use transform::*;

// Shaders bundled as string constants
pub static MESH_WGSL: &str = include_str!("../shaders/mesh.wgsl");
pub static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");
pub static MARKERS_WGSL: &str = include_str!("../shaders/markers.wgsl");
