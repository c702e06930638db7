/// DOM ids and interaction tuning for the web front-end.
///
/// Scene geometry (sizes, colours, camera limits) lives in `viewer_core::constants`;
/// these only concern how the page is wired.
// Elements expected in index.html
pub const CANVAS_ID: &str = "app-canvas";
pub const PANELS_ID: &str = "panels";
pub const LABELS_ID: &str = "labels";

// Status lines inside the Model and Import panels
pub const MODEL_STATUS_ID: &str = "model-status";
pub const IMPORT_STATUS_ID: &str = "import-status";

// Pointer travel (canvas px) before a press turns into a drag
pub const DRAG_THRESHOLD_PX: f32 = 4.0;

// Picking sphere is a little larger than the drawn one so small markers stay clickable
pub const PICK_RADIUS_SCALE: f32 = 1.5;

// Marker label offset from the projected centre (css px)
pub const LABEL_OFFSET_PX: [f32; 2] = [10.0, -10.0];

// Grid and reference box line colour (rgba)
pub const HELPER_LINE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const GRID_LINE_ALPHA: f32 = 0.35;
