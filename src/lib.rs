#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod camera;
mod constants;
mod dispatch;
mod dom;
mod dropzone;
mod events;
mod frame;
mod input;
mod labels;
mod render;
mod ui;

use constants::{CANVAS_ID, LABELS_ID, PANELS_ID};

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<T>()
        .map_err(|e| anyhow::anyhow!(format!("#{} has the wrong type: {:?}", id, e)))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("glb-markers viewer starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = element_by_id(&document, CANVAS_ID)?;
    wire_canvas_resize(&canvas);

    let handles = app::AppHandles::new(canvas.clone());

    let panels: web::Element = element_by_id(&document, PANELS_ID)?;
    let ui = ui::Ui::build(&document, &panels, &handles)
        .map_err(|e| anyhow::anyhow!(format!("building panels: {:?}", e)))?;
    let labels = labels::LabelLayer::new(&document, element_by_id(&document, LABELS_ID)?);

    events::wire_input_handlers(handles.clone());
    events::wire_global_keydown(handles.clone());

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        handles,
        ui,
        labels,
        gpu,
    }));
    frame::start_loop(frame_ctx);
    log::info!("[init] ready");
    Ok(())
}
