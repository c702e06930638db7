use super::panels;
use crate::app::AppHandles;
use crate::constants::IMPORT_STATUS_ID;
use crate::dom;
use instant::Instant;
use viewer_core::AppState;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Read-only JSON of the current scene.
pub struct ExportPanel {
    output: web::HtmlTextAreaElement,
}

impl ExportPanel {
    pub fn build(document: &web::Document, parent: &web::Element) -> Result<Self, JsValue> {
        let body = panels::panel(document, parent, "Export", true)?;
        let output: web::HtmlTextAreaElement = dom::element(document, "textarea", "json")?;
        output.set_read_only(true);
        output.set_rows(16);
        _ = output.set_attribute("spellcheck", "false");
        body.append_child(&output)?;

        let select = output.clone();
        dom::on(&output, "focus", move || select.select());
        Ok(Self { output })
    }

    pub fn refresh(&self, state: &AppState) {
        match viewer_core::export(state) {
            Ok(text) => self.output.set_value(&text),
            Err(e) => log::error!("[export] {}", e),
        }
    }
}

/// Paste area; the text is imported after typing settles or when the field loses focus.
pub fn build_import(
    document: &web::Document,
    parent: &web::Element,
    handles: &AppHandles,
) -> Result<(), JsValue> {
    let body = panels::panel(document, parent, "Import", true)?;
    let input: web::HtmlTextAreaElement = dom::element(document, "textarea", "json")?;
    input.set_rows(8);
    input.set_placeholder("Paste an exported scene here");
    _ = input.set_attribute("spellcheck", "false");
    let status = dom::text_element(document, "p", "status", "")?;
    status.set_id(IMPORT_STATUS_ID);
    body.append_child(&input)?;
    body.append_child(&status)?;

    let h = handles.clone();
    let source = input.clone();
    dom::on(&input, "input", move || {
        h.import_text
            .borrow_mut()
            .stage(source.value(), Instant::now());
    });
    let h = handles.clone();
    dom::on(&input, "blur", move || h.flush_import());
    Ok(())
}
