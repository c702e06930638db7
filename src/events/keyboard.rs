use crate::app::AppHandles;
use crate::constants::PANELS_ID;
use crate::dom;
use viewer_core::Command;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys the viewer reacts to when no text field has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ClearActive,
    TogglePanels,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "Escape" => Some(KeyAction::ClearActive),
        "h" | "H" => Some(KeyAction::TogglePanels),
        _ => None,
    }
}

fn typing_into_field(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
        .unwrap_or(false)
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, handles: &AppHandles) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() || typing_into_field(ev) {
        return;
    }
    match action_for_key(&ev.key()) {
        Some(KeyAction::ClearActive) => {
            handles.dispatch_logged(Command::SetActiveMarker(None));
        }
        Some(KeyAction::TogglePanels) => {
            if let Some(el) = dom::window_document().and_then(|d| d.get_element_by_id(PANELS_ID)) {
                _ = el.class_list().toggle("hidden");
                log::info!("[keys] toggled panels");
            }
        }
        None => {}
    }
}

pub fn wire_global_keydown(handles: AppHandles) {
    if let Some(window) = web::window() {
        dom::on_event(&window, "keydown", move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &handles)
        });
    }
}
