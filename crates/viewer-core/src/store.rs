//! Application state and the command dispatcher that mutates it.
//!
//! Front-ends own a single [`Store`] and send it [`Command`]s; each dispatch
//! reports which parts of the state changed so views can refresh only what
//! they show.

use crate::collection::MarkerCollection;
use crate::document::{self, ImportReport, ScenePatch};
use crate::error::{ExportError, StoreError};
use crate::marker::{Marker, MarkerId};
use crate::model::{self, LoadedModel};
use crate::transform::{Axis, Transform};
use std::ops::{BitOr, BitOrAssign};

/// Set of state areas touched by a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Changes(u8);

impl Changes {
    pub const NONE: Changes = Changes(0);
    pub const TRANSFORM: Changes = Changes(1 << 0);
    pub const VISIBILITY: Changes = Changes(1 << 1);
    pub const MARKERS: Changes = Changes(1 << 2);
    pub const ACTIVE: Changes = Changes(1 << 3);
    pub const MODEL: Changes = Changes(1 << 4);
    pub const ALL: Changes = Changes(0b1_1111);

    #[inline]
    pub fn contains(self, other: Changes) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: Changes) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    fn when(flag: bool, changes: Changes) -> Changes {
        if flag {
            changes
        } else {
            Changes::NONE
        }
    }
}

impl BitOr for Changes {
    type Output = Changes;
    fn bitor(self, rhs: Changes) -> Changes {
        Changes(self.0 | rhs.0)
    }
}

impl BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Changes) {
        self.0 |= rhs.0;
    }
}

/// Everything the viewer edits.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub transform: Transform,
    pub model_hidden: bool,
    pub markers: MarkerCollection,
    /// Raw bytes of the model currently shown.
    pub buffer: Option<Vec<u8>>,
    pub model: Option<LoadedModel>,
}

/// Every mutation the view layer can request.
#[derive(Clone, Debug)]
pub enum Command {
    SetScale(f32),
    SetPosition(Axis, f32),
    SetRotation(Axis, f32),
    SetModelHidden(bool),
    AddMarker(Marker),
    RemoveMarker(MarkerId),
    UpdateMarker { id: MarkerId, marker: Marker },
    MoveMarker { from: usize, to: usize },
    SetMarkers(Vec<Marker>),
    SetActiveMarker(Option<MarkerId>),
    ToggleActiveMarker(MarkerId),
    Import(String),
    SetBuffer(Vec<u8>),
}

type Subscriber = Box<dyn FnMut(&AppState, Changes)>;

#[derive(Default)]
pub struct Store {
    state: AppState,
    subscribers: Vec<Subscriber>,
    revision: u64,
    last_import: Option<ImportReport>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    #[inline]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bumped once per dispatch that changed something.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Keys touched by the most recent successful import.
    pub fn last_import(&self) -> Option<&ImportReport> {
        self.last_import.as_ref()
    }

    /// Register a callback run after every dispatch that changed something.
    /// Callbacks receive the state read-only and must not dispatch.
    pub fn subscribe(&mut self, f: impl FnMut(&AppState, Changes) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Changes, StoreError> {
        let changes = self.apply(command)?;
        if !changes.is_empty() {
            self.revision += 1;
            for s in &mut self.subscribers {
                s(&self.state, changes);
            }
        }
        Ok(changes)
    }

    pub fn export(&self) -> Result<String, ExportError> {
        document::export(&self.state)
    }

    fn apply(&mut self, command: Command) -> Result<Changes, StoreError> {
        let state = &mut self.state;
        let changes = match command {
            Command::SetScale(v) => {
                state.transform.set_scale(v);
                Changes::TRANSFORM
            }
            Command::SetPosition(axis, v) => {
                state.transform.set_position(axis, v);
                Changes::TRANSFORM
            }
            Command::SetRotation(axis, v) => {
                state.transform.set_rotation(axis, v);
                Changes::TRANSFORM
            }
            Command::SetModelHidden(hidden) => {
                let changed = state.model_hidden != hidden;
                state.model_hidden = hidden;
                Changes::when(changed, Changes::VISIBILITY)
            }
            Command::AddMarker(marker) => Changes::when(state.markers.add(marker), Changes::MARKERS),
            Command::RemoveMarker(id) => {
                let was_active = state.markers.active() == Some(&id);
                let removed = state.markers.remove(&id);
                Changes::when(removed, Changes::MARKERS)
                    | Changes::when(removed && was_active, Changes::ACTIVE)
            }
            Command::UpdateMarker { id, marker } => {
                Changes::when(state.markers.update(&id, marker), Changes::MARKERS)
            }
            Command::MoveMarker { from, to } => {
                Changes::when(state.markers.move_to(from, to), Changes::MARKERS)
            }
            Command::SetMarkers(markers) => {
                let before = state.markers.active().cloned();
                state.markers.set(markers);
                Changes::MARKERS
                    | Changes::when(state.markers.active() != before.as_ref(), Changes::ACTIVE)
            }
            Command::SetActiveMarker(id) => {
                Changes::when(state.markers.set_active(id), Changes::ACTIVE)
            }
            Command::ToggleActiveMarker(id) => {
                Changes::when(state.markers.toggle_active(&id), Changes::ACTIVE)
            }
            Command::Import(text) => {
                let patch = ScenePatch::parse(&text)?;
                let (changes, report) = patch.apply(state);
                log::info!(
                    "[import] applied {:?}, ignored {:?}",
                    report.applied,
                    report.ignored
                );
                self.last_import = Some(report);
                changes
            }
            Command::SetBuffer(bytes) => {
                let loaded = model::decode_glb(&bytes)?;
                state.buffer = Some(bytes);
                state.model = Some(loaded);
                Changes::MODEL
            }
        };
        Ok(changes)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("revision", &self.revision)
            .finish()
    }
}
