use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::math::{Isometry3, Point3};

slotmap::new_key_type! {
    /// Unique identifier for a navigation anchor.
    ///
    /// Keys are generational indices issued by the anchor owner, so removing
    /// an anchor never renumbers the others.
    pub struct AnchorId;
}

/// A named waypoint in map space.
///
/// The identifier is fixed at creation. Transform and label are payload and
/// may change freely; equality and hashing only look at the identifier, so
/// two anchors at the same position are still distinct.
///
/// Serialized anchors carry their identifier, so a saved map keeps matching
/// the identifiers stored in a saved graph topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    id: AnchorId,
    /// Rigid transform of the anchor in map space.
    pub transform: Isometry3,
    /// Human-readable label shown by guidance UIs.
    #[serde(default)]
    pub label: String,
}

impl Anchor {
    /// Creates a new anchor with the given identifier and transform.
    #[must_use]
    pub fn new(id: AnchorId, transform: Isometry3) -> Self {
        Self {
            id,
            transform,
            label: String::new(),
        }
    }

    /// Sets the label, consuming and returning the anchor.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the anchor identifier.
    #[must_use]
    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// Returns the anchor position (the translation part of its transform).
    #[must_use]
    pub fn position(&self) -> Point3 {
        Point3::from(self.transform.translation.vector)
    }

    /// Straight-line distance between two anchors.
    #[must_use]
    pub fn distance_to(&self, other: &Anchor) -> f64 {
        nalgebra::distance(&self.position(), &other.position())
    }
}

impl PartialEq for Anchor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Anchor {}

impl Hash for Anchor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
