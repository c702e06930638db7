use super::panels;
use crate::app::AppHandles;
use crate::constants::MODEL_STATUS_ID;
use crate::dom;
use crate::dropzone;
use viewer_core::{AppState, Command};
use wasm_bindgen::JsValue;
use web_sys as web;

pub struct ModelPanel {
    hidden: web::HtmlInputElement,
    info: web::HtmlElement,
}

impl ModelPanel {
    pub fn build(
        document: &web::Document,
        parent: &web::Element,
        handles: &AppHandles,
    ) -> Result<Self, JsValue> {
        let body = panels::panel(document, parent, "Model", false)?;

        let zone = dom::text_element(
            document,
            "div",
            "dropzone",
            "Drop a .glb file here, or click to choose one",
        )?;
        let picker: web::HtmlInputElement = dom::element(document, "input", "")?;
        picker.set_type("file");
        picker.set_accept(&dropzone::accept_attribute());
        _ = picker.style().set_property("display", "none");
        zone.append_child(&picker)?;
        dropzone::wire(&zone, &picker, handles);

        let status = dom::text_element(document, "p", "status", "")?;
        status.set_id(MODEL_STATUS_ID);
        let info = dom::text_element(document, "p", "model-info", "")?;

        let hidden: web::HtmlInputElement = dom::element(document, "input", "")?;
        hidden.set_type("checkbox");
        let h = handles.clone();
        let c = hidden.clone();
        dom::on(&hidden, "change", move || {
            h.dispatch_logged(Command::SetModelHidden(c.checked()));
        });

        body.append_child(&zone)?;
        body.append_child(&status)?;
        body.append_child(&info)?;
        body.append_child(&panels::labelled(document, "Hide model", &hidden)?)?;
        Ok(Self { hidden, info })
    }

    pub fn refresh_visibility(&self, state: &AppState) {
        self.hidden.set_checked(state.model_hidden);
    }

    pub fn refresh_model(&self, state: &AppState) {
        let text = match &state.model {
            Some(m) => {
                let size = m
                    .info
                    .bounds
                    .map(|b| {
                        let s = b.size();
                        format!(", size {:.2} × {:.2} × {:.2}", s.x, s.y, s.z)
                    })
                    .unwrap_or_default();
                format!(
                    "{} meshes, {} triangles, {} materials{}",
                    m.info.mesh_count,
                    m.mesh.triangle_count(),
                    m.info.material_count,
                    size
                )
            }
            None => String::new(),
        };
        self.info.set_text_content(Some(&text));
    }
}
