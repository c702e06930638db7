//! Staged edits with an explicit commit boundary.
//!
//! Text fields and marker drags stage their changes here instead of writing
//! the store on every keystroke or pointer move. The owner polls
//! [`PendingEdit::take_due`] (the web frontend does so once per animation
//! frame) or forces a commit with [`PendingEdit::flush`].

use crate::collection::MarkerCollection;
use crate::constants::EDIT_DEBOUNCE_MS;
use crate::marker::{Language, Marker, MarkerId, MarkerPosition};
use crate::store::Command;
use fnv::FnvHashMap;
use instant::Instant;
use std::time::Duration;

#[inline]
pub fn default_delay() -> Duration {
    Duration::from_millis(EDIT_DEBOUNCE_MS)
}

/// One staged value plus the instant it last changed.
#[derive(Clone, Debug)]
pub struct PendingEdit<T> {
    value: Option<T>,
    touched_at: Option<Instant>,
    delay: Duration,
}

impl<T> Default for PendingEdit<T> {
    fn default() -> Self {
        Self::new(default_delay())
    }
}

impl<T> PendingEdit<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            value: None,
            touched_at: None,
            delay,
        }
    }

    /// Replace the staged value and restart the quiet period.
    pub fn stage(&mut self, value: T, now: Instant) {
        self.value = Some(value);
        self.touched_at = Some(now);
    }

    /// Modify the staged value in place (starting from `T::default()` when
    /// nothing is staged) and restart the quiet period.
    pub fn modify(&mut self, now: Instant, f: impl FnOnce(&mut T))
    where
        T: Default,
    {
        f(self.value.get_or_insert_with(T::default));
        self.touched_at = Some(now);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.value.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match (&self.value, self.touched_at) {
            (Some(_), Some(at)) => now >= at && now - at >= self.delay,
            _ => false,
        }
    }

    /// Hand out the staged value once the quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.is_due(now) {
            self.flush()
        } else {
            None
        }
    }

    /// Hand out the staged value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.touched_at = None;
        self.value.take()
    }

    pub fn cancel(&mut self) {
        self.touched_at = None;
        self.value = None;
    }
}

/// Field-level changes to one marker, applied onto whatever the marker looks
/// like at commit time so concurrent edits to different fields don't clobber
/// each other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerPatch {
    pub position: Option<MarkerPosition>,
    pub titles: [Option<String>; 2],
    pub descriptions: [Option<String>; 2],
}

impl MarkerPatch {
    pub fn set_title(&mut self, language: Language, title: impl Into<String>) {
        self.titles[language.index()] = Some(title.into());
    }

    pub fn set_description(&mut self, language: Language, description: impl Into<String>) {
        self.descriptions[language.index()] = Some(description.into());
    }

    pub fn title(&self, language: Language) -> Option<&str> {
        self.titles[language.index()].as_deref()
    }

    pub fn description(&self, language: Language) -> Option<&str> {
        self.descriptions[language.index()].as_deref()
    }

    pub fn apply_to(&self, marker: &Marker) -> Marker {
        let mut out = marker.clone();
        if let Some(p) = self.position {
            out.position = p;
        }
        for language in Language::ALL {
            let text = out.content.get_mut(language);
            if let Some(t) = &self.titles[language.index()] {
                text.title.clone_from(t);
            }
            if let Some(d) = &self.descriptions[language.index()] {
                text.description.clone_from(d);
            }
        }
        out
    }
}

/// Pending marker edits keyed by marker id.
#[derive(Debug)]
pub struct MarkerEdits {
    pending: FnvHashMap<MarkerId, PendingEdit<MarkerPatch>>,
    delay: Duration,
}

impl Default for MarkerEdits {
    fn default() -> Self {
        Self::new(default_delay())
    }
}

impl MarkerEdits {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: FnvHashMap::default(),
            delay,
        }
    }

    pub fn stage(&mut self, id: &MarkerId, now: Instant, f: impl FnOnce(&mut MarkerPatch)) {
        let delay = self.delay;
        self.pending
            .entry(id.clone())
            .or_insert_with(|| PendingEdit::new(delay))
            .modify(now, f);
    }

    pub fn pending(&self, id: &MarkerId) -> Option<&MarkerPatch> {
        self.pending.get(id).and_then(PendingEdit::peek)
    }

    /// Position a marker is being dragged to but that has not been committed yet.
    pub fn pending_position(&self, id: &MarkerId) -> Option<MarkerPosition> {
        self.pending(id).and_then(|p| p.position)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Update commands for every edit whose quiet period has elapsed, in id order.
    pub fn take_due(&mut self, now: Instant, markers: &MarkerCollection) -> Vec<Command> {
        let mut due: Vec<(MarkerId, MarkerPatch)> = Vec::new();
        self.pending.retain(|id, edit| match edit.take_due(now) {
            Some(patch) => {
                due.push((id.clone(), patch));
                false
            }
            None => true,
        });
        into_commands(due, markers)
    }

    /// Commit one marker's edit immediately.
    pub fn flush(&mut self, id: &MarkerId, markers: &MarkerCollection) -> Option<Command> {
        let patch = self.pending.remove(id)?.flush()?;
        into_commands(vec![(id.clone(), patch)], markers).pop()
    }

    /// Commit everything immediately.
    pub fn flush_all(&mut self, markers: &MarkerCollection) -> Vec<Command> {
        let all = self
            .pending
            .drain()
            .filter_map(|(id, mut edit)| edit.flush().map(|p| (id, p)))
            .collect();
        into_commands(all, markers)
    }

    pub fn cancel(&mut self, id: &MarkerId) {
        self.pending.remove(id);
    }
}

fn into_commands(mut due: Vec<(MarkerId, MarkerPatch)>, markers: &MarkerCollection) -> Vec<Command> {
    due.sort_by(|a, b| a.0.cmp(&b.0));
    due.into_iter()
        .filter_map(|(id, patch)| {
            let Some(current) = markers.get(&id) else {
                log::debug!("[edits] dropping edit for removed marker {}", id);
                return None;
            };
            let marker = patch.apply_to(current);
            Some(Command::UpdateMarker { id, marker })
        })
        .collect()
}
