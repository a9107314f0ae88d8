//! Persisted topology of a navigation graph.
//!
//! Only the adjacency and the start/end identifiers are stored. Anchor
//! geometry belongs to the map that owns the anchors and is merged back in
//! through an [`AnchorSource`] after loading.

use serde::{Deserialize, Serialize};

use super::NavigationGraph;
use crate::error::{Result, TopologyError};
use crate::topology::{AnchorId, AnchorSource};

/// Neighbors of one anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    /// The anchor.
    pub anchor: AnchorId,
    /// Anchors connected to it.
    pub neighbors: Vec<AnchorId>,
}

/// Serializable graph topology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Adjacency list, one entry per anchor.
    pub adjacency: Vec<AdjacencyEntry>,
    /// Default path source.
    #[serde(default)]
    pub start: Option<AnchorId>,
    /// Default path destination.
    #[serde(default)]
    pub end: Option<AnchorId>,
}

impl Topology {
    /// Encodes the topology as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a topology from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid topology document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Iterates over every anchor identifier the topology mentions.
    pub fn referenced(&self) -> impl Iterator<Item = AnchorId> + '_ {
        self.adjacency
            .iter()
            .flat_map(|entry| {
                std::iter::once(entry.anchor).chain(entry.neighbors.iter().copied())
            })
    }
}

impl NavigationGraph {
    /// Captures the graph topology for persistence.
    #[must_use]
    pub fn topology(&self) -> Topology {
        let adjacency = self
            .adjacency
            .iter()
            .map(|(anchor, neighbors)| AdjacencyEntry {
                anchor,
                neighbors: neighbors.iter().copied().collect(),
            })
            .collect();
        Topology {
            adjacency,
            start: self.start,
            end: self.end,
        }
    }

    /// Rebuilds a graph from its topology without anchor payloads.
    ///
    /// Edges are re-linked symmetrically; one-sided entries are completed
    /// and self-loops dropped. Until [`rehydrate`](Self::rehydrate) supplies
    /// payloads, [`anchor`](Self::anchor) returns `None` for every
    /// identifier and path queries come back empty.
    #[must_use]
    pub fn from_topology(topology: &Topology) -> Self {
        let mut graph = Self::new();
        let mut repaired = 0usize;
        for entry in &topology.adjacency {
            for &neighbor in &entry.neighbors {
                if neighbor == entry.anchor {
                    repaired += 1;
                    continue;
                }
                if !graph.contains_edge(entry.anchor, neighbor) {
                    graph.link(entry.anchor, neighbor);
                }
            }
        }

        let listed: usize = topology.adjacency.iter().map(|e| e.neighbors.len()).sum();
        let inconsistent = (2 * graph.edge_count()).abs_diff(listed - repaired);
        if repaired > 0 || inconsistent > 0 {
            tracing::debug!(
                self_loops = repaired,
                inconsistent,
                "repaired malformed topology entries"
            );
        }

        graph.start = topology.start;
        graph.end = topology.end;
        graph
    }

    /// Refreshes every anchor payload from `source`.
    ///
    /// Call this after loading a topology, and whenever the owner of the
    /// anchors has moved or relabelled them. Returns the identifiers the
    /// source could not resolve; those keep whatever payload they had.
    pub fn rehydrate<S: AnchorSource + ?Sized>(&mut self, source: &S) -> Vec<AnchorId> {
        let mut missing = Vec::new();
        let ids: Vec<AnchorId> = self.adjacency.keys().collect();
        for id in ids {
            match source.anchor(id) {
                Some(anchor) => {
                    self.anchors.insert(id, anchor.clone());
                }
                None => missing.push(id),
            }
        }
        if !missing.is_empty() {
            tracing::debug!(count = missing.len(), "anchors missing from source");
        }
        missing
    }

    /// Rebuilds a graph from its topology and resolves every anchor.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnresolvedAnchor`] for the first referenced
    /// anchor that `source` cannot supply.
    pub fn load<S: AnchorSource + ?Sized>(topology: &Topology, source: &S) -> Result<Self> {
        let mut graph = Self::from_topology(topology);
        if let Some(&id) = graph.rehydrate(source).first() {
            return Err(TopologyError::UnresolvedAnchor(id).into());
        }
        Ok(graph)
    }
}
