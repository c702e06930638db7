//! DOM side panels. Built once at start-up; refreshed from the frame loop
//! with the set of state areas that changed since the last frame.

use crate::app::AppHandles;
use viewer_core::{AppState, Changes, MarkerEdits};
use wasm_bindgen::JsValue;
use web_sys as web;

mod io;
mod markers;
mod model;
mod panels;
mod transform;

pub struct Ui {
    model: model::ModelPanel,
    transform: transform::TransformPanel,
    markers: markers::MarkerList,
    export: io::ExportPanel,
}

impl Ui {
    pub fn build(
        document: &web::Document,
        root: &web::Element,
        handles: &AppHandles,
    ) -> Result<Self, JsValue> {
        let model = model::ModelPanel::build(document, root, handles)?;
        let transform = transform::TransformPanel::build(document, root, handles)?;
        let markers = markers::MarkerList::build(document, root, handles)?;
        let export = io::ExportPanel::build(document, root)?;
        io::build_import(document, root, handles)?;
        Ok(Self {
            model,
            transform,
            markers,
            export,
        })
    }

    pub fn refresh(&mut self, changes: Changes, state: &AppState, edits: &MarkerEdits) {
        if changes.contains(Changes::VISIBILITY) {
            self.model.refresh_visibility(state);
        }
        if changes.contains(Changes::MODEL) {
            self.model.refresh_model(state);
        }
        if changes.contains(Changes::TRANSFORM) {
            self.transform.refresh(&state.transform);
        }
        if changes.intersects(Changes::MARKERS | Changes::ACTIVE) {
            self.markers.refresh(&state.markers, edits);
        }
        if changes.intersects(Changes::TRANSFORM | Changes::MARKERS) {
            self.export.refresh(state);
        }
    }
}
