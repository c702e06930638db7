use crate::app::AppHandles;
use crate::camera;
use crate::labels::LabelLayer;
use crate::render::{self, scene, SceneFrame};
use crate::ui::Ui;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use viewer_core::Changes;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub handles: AppHandles,
    pub ui: Ui,
    pub labels: LabelLayer,
    pub gpu: Option<render::GpuState>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let h = self.handles.clone();
        h.commit_due(Instant::now());

        let changes = h.dirty.replace(Changes::NONE);
        let (Ok(store), Ok(edits)) = (h.store.try_borrow(), h.edits.try_borrow()) else {
            h.mark_dirty(changes);
            return;
        };
        let state = store.state();

        if !changes.is_empty() {
            self.ui.refresh(changes, state, &edits);
        }

        let camera = h.orbit.borrow().camera(camera::aspect(&h.canvas));
        let positions = scene::marker_positions(&state.markers, &edits);

        if let Some(gpu) = self.gpu.as_mut() {
            if changes.contains(Changes::MODEL) {
                gpu.upload_model(state.model.as_ref().map(|m| &m.mesh));
            }
            gpu.resize_if_needed(h.canvas.width(), h.canvas.height());

            let instances = scene::marker_instances(&state.markers, &positions);
            let model = state
                .model
                .as_ref()
                .filter(|_| !state.model_hidden)
                .map(|_| state.transform.model_matrix());
            match gpu.render(&SceneFrame {
                camera: &camera,
                model,
                markers: &instances,
            }) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("[gpu] surface lost; reconfiguring next frame");
                }
                Err(e) => log::error!("[gpu] render error: {:?}", e),
            }
        }

        self.labels
            .update(&state.markers, &positions, &camera, h.label_language.get());
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState> {
    match render::GpuState::new(canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] init failed, markers stay editable without a 3D view: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
