use crate::constants::{IMPORT_STATUS_ID, MODEL_STATUS_ID};
use crate::dispatch::{self, DispatchError};
use crate::dom;
use crate::input::{DragState, MouseState};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use viewer_core::{
    Changes, Command, Language, MarkerEdits, MarkerId, OrbitCamera, PendingEdit, Store,
};
use web_sys as web;

/// Shared state cloned into every event closure and the frame loop.
///
/// Handlers never refresh the DOM themselves. The store subscriber only
/// accumulates `dirty`; the frame loop redraws what it names. No borrow may be
/// held across a dispatch.
#[derive(Clone)]
pub struct AppHandles {
    pub store: Rc<RefCell<Store>>,
    pub edits: Rc<RefCell<MarkerEdits>>,
    pub import_text: Rc<RefCell<PendingEdit<String>>>,
    pub dirty: Rc<Cell<Changes>>,
    pub orbit: Rc<RefCell<OrbitCamera>>,
    pub drag: Rc<RefCell<DragState>>,
    pub mouse: Rc<RefCell<MouseState>>,
    pub label_language: Rc<Cell<Language>>,
    pub canvas: web::HtmlCanvasElement,
}

impl AppHandles {
    pub fn new(canvas: web::HtmlCanvasElement) -> Self {
        let dirty = Rc::new(Cell::new(Changes::ALL));
        let mut store = Store::new();
        let sink = dirty.clone();
        store.subscribe(move |_, changes| sink.set(sink.get() | changes));
        Self {
            store: Rc::new(RefCell::new(store)),
            edits: Rc::new(RefCell::new(MarkerEdits::default())),
            import_text: Rc::new(RefCell::new(PendingEdit::default())),
            dirty,
            orbit: Rc::new(RefCell::new(OrbitCamera::default())),
            drag: Rc::new(RefCell::new(DragState::default())),
            mouse: Rc::new(RefCell::new(MouseState::default())),
            label_language: Rc::new(Cell::new(Language::En)),
            canvas,
        }
    }

    /// Ask the frame loop to redraw `changes` even though the store did not change.
    pub fn mark_dirty(&self, changes: Changes) {
        self.dirty.set(self.dirty.get() | changes);
    }

    pub fn dispatch(&self, command: Command) -> Result<Changes, DispatchError> {
        let name = command_name(&command);
        let result = dispatch::try_dispatch(&self.store, command);
        if let Err(DispatchError::Busy) = result {
            log::warn!("[store] dispatch while busy; dropped {}", name);
        }
        result
    }

    /// Dispatch and report failures in the model status line.
    pub fn dispatch_logged(&self, command: Command) -> Option<Changes> {
        match self.dispatch(command) {
            Ok(changes) => Some(changes),
            Err(e) => {
                log::warn!("[store] {}", e);
                dom::set_status(MODEL_STATUS_ID, &e.to_string(), true);
                None
            }
        }
    }

    /// Commit one marker's staged edit now (on blur or drag release).
    pub fn flush_marker(&self, id: &MarkerId) {
        let command = {
            let (Ok(store), Ok(mut edits)) = (self.store.try_borrow(), self.edits.try_borrow_mut())
            else {
                return;
            };
            edits.flush(id, &store.state().markers)
        };
        if let Some(c) = command {
            self.dispatch_logged(c);
        }
    }

    pub fn flush_edits(&self) {
        let commands = {
            let (Ok(store), Ok(mut edits)) = (self.store.try_borrow(), self.edits.try_borrow_mut())
            else {
                return;
            };
            edits.flush_all(&store.state().markers)
        };
        for c in commands {
            self.dispatch_logged(c);
        }
    }

    /// Commit staged edits whose quiet period has elapsed. Called once per frame.
    pub fn commit_due(&self, now: Instant) {
        let commands = {
            let store = self.store.borrow();
            self.edits
                .borrow_mut()
                .take_due(now, &store.state().markers)
        };
        for c in commands {
            self.dispatch_logged(c);
        }
        let text = self.import_text.borrow_mut().take_due(now);
        if let Some(text) = text {
            self.import(text);
        }
    }

    pub fn flush_import(&self) {
        let text = match self.import_text.try_borrow_mut() {
            Ok(mut pending) => pending.flush(),
            Err(_) => None,
        };
        if let Some(text) = text {
            self.import(text);
        }
    }

    /// Merge a JSON document into the scene. Staged marker edits land first so
    /// the import has the last word.
    pub fn import(&self, text: String) {
        if text.trim().is_empty() {
            dom::set_status(IMPORT_STATUS_ID, "", false);
            return;
        }
        self.flush_edits();
        match self.dispatch(Command::Import(text)) {
            Ok(_) => {
                let summary = self
                    .store
                    .try_borrow()
                    .ok()
                    .and_then(|s| s.last_import().cloned())
                    .map(|r| {
                        if r.ignored.is_empty() {
                            format!("Imported {}", r.applied.join(", "))
                        } else {
                            format!(
                                "Imported {}; ignored {}",
                                r.applied.join(", "),
                                r.ignored.join(", ")
                            )
                        }
                    })
                    .unwrap_or_default();
                dom::set_status(IMPORT_STATUS_ID, &summary, false);
            }
            Err(e) => {
                log::error!("[import] {}", e);
                dom::set_status(IMPORT_STATUS_ID, &e.to_string(), true);
            }
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::SetScale(_) => "SetScale",
        Command::SetPosition(..) => "SetPosition",
        Command::SetRotation(..) => "SetRotation",
        Command::SetModelHidden(_) => "SetModelHidden",
        Command::AddMarker(_) => "AddMarker",
        Command::RemoveMarker(_) => "RemoveMarker",
        Command::UpdateMarker { .. } => "UpdateMarker",
        Command::MoveMarker { .. } => "MoveMarker",
        Command::SetMarkers(_) => "SetMarkers",
        Command::SetActiveMarker(_) => "SetActiveMarker",
        Command::ToggleActiveMarker(_) => "ToggleActiveMarker",
        Command::Import(_) => "Import",
        Command::SetBuffer(_) => "SetBuffer",
    }
}
