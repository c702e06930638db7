//! Ordered marker list plus the active-marker reference.
//!
//! Every operation is tolerant: unknown ids and out-of-range indices leave the
//! collection untouched and report `false`. The active id always names a
//! marker in the list; removing or replacing that marker clears it.

use crate::marker::{Marker, MarkerId};
use fnv::FnvHashSet;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerCollection {
    items: Vec<Marker>,
    active: Option<MarkerId>,
}

impl MarkerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker. Rejected when its id is already present.
    pub fn add(&mut self, marker: Marker) -> bool {
        if self.contains(&marker.id) {
            log::warn!("[markers] add ignored, id {} already present", marker.id);
            return false;
        }
        self.items.push(marker);
        true
    }

    /// Remove the marker with `id`, clearing the active reference if it pointed there.
    pub fn remove(&mut self, id: &MarkerId) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("[markers] remove of unknown id {}", id);
            return false;
        };
        self.items.remove(index);
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        true
    }

    /// Replace the marker with `id` in place. The stored record keeps `id`
    /// whatever id the incoming record carries. Returns whether anything changed.
    pub fn update(&mut self, id: &MarkerId, mut marker: Marker) -> bool {
        let Some(slot) = self.items.iter_mut().find(|m| &m.id == id) else {
            log::debug!("[markers] update of unknown id {}", id);
            return false;
        };
        marker.id = id.clone();
        if *slot == marker {
            return false;
        }
        *slot = marker;
        true
    }

    /// Take the marker at `from` out and reinsert it at `to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let marker = self.items.remove(from);
        self.items.insert(to, marker);
        true
    }

    /// Replace the whole list. Later duplicates of an id are dropped.
    pub fn set(&mut self, markers: Vec<Marker>) {
        let mut seen = FnvHashSet::default();
        self.items.clear();
        for marker in markers {
            if !seen.insert(marker.id.clone()) {
                log::warn!("[markers] dropping duplicate id {}", marker.id);
                continue;
            }
            self.items.push(marker);
        }
        if let Some(active) = &self.active {
            if !self.contains(active) {
                self.active = None;
            }
        }
    }

    /// Select a marker, or clear the selection with `None`. Unknown ids are ignored.
    pub fn set_active(&mut self, id: Option<MarkerId>) -> bool {
        match id {
            Some(id) if !self.contains(&id) => {
                log::debug!("[markers] cannot activate unknown id {}", id);
                false
            }
            id if id == self.active => false,
            id => {
                self.active = id;
                true
            }
        }
    }

    /// Select `id`, or clear the selection if it is already selected.
    pub fn toggle_active(&mut self, id: &MarkerId) -> bool {
        if self.active.as_ref() == Some(id) {
            self.active = None;
            true
        } else {
            self.set_active(Some(id.clone()))
        }
    }

    #[inline]
    pub fn active(&self) -> Option<&MarkerId> {
        self.active.as_ref()
    }

    pub fn active_marker(&self) -> Option<&Marker> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &MarkerId) -> Option<&Marker> {
        self.items.iter().find(|m| &m.id == id)
    }

    pub fn index_of(&self, id: &MarkerId) -> Option<usize> {
        self.items.iter().position(|m| &m.id == id)
    }

    #[inline]
    pub fn contains(&self, id: &MarkerId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.items.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Marker] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkerCollection {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
