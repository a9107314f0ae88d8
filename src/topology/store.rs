use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use super::anchor::{Anchor, AnchorId};
use crate::error::Result;
use crate::math::Isometry3;

/// Supplies current anchor payloads by identifier.
///
/// The navigation graph only caches anchors. Whoever owns the map (and may
/// move anchors around) implements this so the graph can be rehydrated
/// after loading a topology or after anchors were edited.
pub trait AnchorSource {
    /// Returns the current anchor for `id`, if it exists.
    fn anchor(&self, id: AnchorId) -> Option<&Anchor>;
}

/// Arena that owns anchors and issues their identifiers.
///
/// Serialization keeps every slot together with its generation, so a
/// reloaded store hands out the same [`AnchorId`]s as before and does not
/// reuse identifiers of anchors removed before saving.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AnchorStore {
    anchors: SlotMap<AnchorId, Anchor>,
}

impl AnchorStore {
    /// Creates a new, empty anchor store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an anchor at `transform` and returns its ID.
    pub fn insert(&mut self, transform: Isometry3) -> AnchorId {
        self.anchors.insert_with_key(|id| Anchor::new(id, transform))
    }

    /// Inserts a labelled anchor at `transform` and returns its ID.
    pub fn insert_labelled(&mut self, transform: Isometry3, label: &str) -> AnchorId {
        self.anchors
            .insert_with_key(|id| Anchor::new(id, transform).with_label(label))
    }

    /// Returns a mutable reference to the anchor, or `None` if not found.
    pub fn get_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.get_mut(id)
    }

    /// Moves an anchor. Returns `false` if the anchor does not exist.
    pub fn set_transform(&mut self, id: AnchorId, transform: Isometry3) -> bool {
        match self.anchors.get_mut(id) {
            Some(anchor) => {
                anchor.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Removes an anchor, returning it if it existed.
    pub fn remove(&mut self, id: AnchorId) -> Option<Anchor> {
        self.anchors.remove(id)
    }

    /// Number of anchors in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if the store holds no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Iterates over all anchors.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.values()
    }

    /// Encodes the store as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a store from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid anchor store document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl AnchorSource for AnchorStore {
    fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id)
    }
}

impl AnchorSource for SlotMap<AnchorId, Anchor> {
    fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.get(id)
    }
}
