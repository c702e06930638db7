use crate::app::AppHandles;
use crate::constants::MODEL_STATUS_ID;
use crate::dom;
use js_sys::Uint8Array;
use viewer_core::{is_accepted_file, Command, ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// `accept` attribute for the hidden file input.
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .chain(ACCEPTED_MIME_TYPES.iter().map(|m| m.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Wire drag-and-drop on `zone` and clicks through to `picker`.
pub fn wire(zone: &web::HtmlElement, picker: &web::HtmlInputElement, handles: &AppHandles) {
    let z = zone.clone();
    dom::on_event(zone, "dragover", move |ev: web::DragEvent| {
        ev.prevent_default();
        dom::set_class(&z, "dragging", true);
    });
    let z = zone.clone();
    dom::on(zone, "dragleave", move || dom::set_class(&z, "dragging", false));

    let z = zone.clone();
    let h = handles.clone();
    dom::on_event(zone, "drop", move |ev: web::DragEvent| {
        ev.prevent_default();
        dom::set_class(&z, "dragging", false);
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        match file {
            Some(file) => load_file(file, h.clone()),
            None => log::debug!("[dropzone] drop without files"),
        }
    });

    let p = picker.clone();
    dom::on(zone, "click", move || p.click());

    let p = picker.clone();
    let h = handles.clone();
    dom::on(picker, "change", move || {
        if let Some(file) = p.files().and_then(|files| files.get(0)) {
            load_file(file, h.clone());
        }
        // Allow picking the same file again.
        p.set_value("");
    });
}

fn load_file(file: web::File, handles: AppHandles) {
    let name = file.name();
    if !is_accepted_file(&name, &file.type_()) {
        log::warn!("[dropzone] rejected {} ({})", name, file.type_());
        dom::set_status(MODEL_STATUS_ID, &format!("{name} is not a .glb file"), true);
        return;
    }
    dom::set_status(MODEL_STATUS_ID, &format!("Loading {name}…"), false);
    spawn_local(async move {
        let buffer = match JsFuture::from(file.array_buffer()).await {
            Ok(b) => b,
            Err(e) => {
                log::error!("[dropzone] reading {}: {:?}", name, e);
                dom::set_status(MODEL_STATUS_ID, &format!("Could not read {name}"), true);
                return;
            }
        };
        let bytes = Uint8Array::new(&buffer).to_vec();
        log::info!("[dropzone] {} ({} bytes)", name, bytes.len());
        if handles.dispatch_logged(Command::SetBuffer(bytes)).is_some() {
            dom::set_status(MODEL_STATUS_ID, &name, false);
        }
    });
}
