//! The navigation graph: anchors joined by undirected, traversable edges.

pub mod persist;

pub use persist::{AdjacencyEntry, Topology};

use std::collections::BTreeSet;

use slotmap::SecondaryMap;

use crate::config::{NavigationConfig, SearchParams, TrailParams};
use crate::error::Result;
use crate::operations::{FindPath, GenerateTrail, Path, Trail};
use crate::topology::{Anchor, AnchorId};

/// Graph of navigation anchors.
///
/// Payloads and adjacency are kept in secondary maps keyed by [`AnchorId`],
/// so the graph never issues or renumbers identifiers itself.
///
/// Anchors only exist in the graph while they have at least one edge:
/// [`add_edge`](Self::add_edge) inserts them and
/// [`remove_edge`](Self::remove_edge) drops any endpoint whose last edge was
/// removed. Adjacency is always symmetric and never contains self-loops.
///
/// The graph does no internal locking. Queries take `&self` and may run in
/// parallel; mutation must not overlap with them.
#[derive(Debug, Default, Clone)]
pub struct NavigationGraph {
    anchors: SecondaryMap<AnchorId, Anchor>,
    adjacency: SecondaryMap<AnchorId, BTreeSet<AnchorId>>,
    start: Option<AnchorId>,
    end: Option<AnchorId>,
}

impl NavigationGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Edge operations ---

    /// Connects two anchors.
    ///
    /// Does nothing for a self-loop or an edge that already exists. Anchors
    /// the graph has no payload for yet are stored; payloads that are
    /// already known are left untouched.
    pub fn add_edge(&mut self, from: &Anchor, to: &Anchor) {
        let (a, b) = (from.id(), to.id());
        if a == b || self.contains_edge(a, b) {
            return;
        }

        self.link(a, b);
        for anchor in [from, to] {
            if !self.anchors.contains_key(anchor.id()) {
                self.anchors.insert(anchor.id(), anchor.clone());
            }
        }
        tracing::trace!(?a, ?b, "edge added");
    }

    /// Disconnects two anchors.
    ///
    /// Does nothing if the edge does not exist. An endpoint left without
    /// neighbors is removed from the graph entirely.
    pub fn remove_edge(&mut self, from: AnchorId, to: AnchorId) {
        if !self.contains_edge(from, to) {
            return;
        }

        for (a, b) in [(from, to), (to, from)] {
            if let Some(neighbors) = self.adjacency.get_mut(a) {
                neighbors.remove(&b);
            }
        }
        self.drop_if_isolated(from);
        self.drop_if_isolated(to);
        tracing::trace!(?from, ?to, "edge removed");
    }

    /// Returns `true` if `a` and `b` are connected.
    #[must_use]
    pub fn contains_edge(&self, a: AnchorId, b: AnchorId) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Iterates over every edge once, lower identifier first.
    pub fn edges(&self) -> impl Iterator<Item = (AnchorId, AnchorId)> + '_ {
        self.adjacency.iter().flat_map(|(a, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&b| a < b)
                .map(move |&b| (a, b))
        })
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    // --- Anchor operations ---

    /// Returns the stored anchor, or `None` if the graph does not hold it.
    #[must_use]
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    /// Returns `true` if the graph references `id` through any edge.
    #[must_use]
    pub fn contains_anchor(&self, id: AnchorId) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Replaces the stored payload for an anchor the graph references.
    ///
    /// Returns `false`, leaving the graph unchanged, if no edge references
    /// the anchor.
    pub fn update_anchor(&mut self, anchor: Anchor) -> bool {
        if !self.contains_anchor(anchor.id()) {
            return false;
        }
        self.anchors.insert(anchor.id(), anchor);
        true
    }

    /// Removes an anchor together with all of its edges.
    ///
    /// Neighbors left without edges are removed as well. Returns the stored
    /// payload of the removed anchor, if any.
    pub fn remove_anchor(&mut self, id: AnchorId) -> Option<Anchor> {
        let payload = self.anchors.get(id).cloned();
        let neighbors: Vec<AnchorId> = self
            .adjacency
            .get(id)
            .map(|n| n.iter().copied().collect())
            .unwrap_or_default();
        for neighbor in neighbors {
            self.remove_edge(id, neighbor);
        }
        payload
    }

    /// Iterates over the neighbors of `id` in key order.
    pub fn neighbors(&self, id: AnchorId) -> impl Iterator<Item = AnchorId> + '_ {
        self.adjacency.get(id).into_iter().flatten().copied()
    }

    /// Iterates over all anchors with a stored payload.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.values()
    }

    /// Number of anchors referenced by the graph.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns `true` if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Removes all anchors and edges. Start and end are kept.
    pub fn clear(&mut self) {
        self.anchors.clear();
        self.adjacency.clear();
    }

    // --- Endpoints ---

    /// Default source for path queries.
    #[must_use]
    pub fn start(&self) -> Option<AnchorId> {
        self.start
    }

    /// Default destination for path queries.
    #[must_use]
    pub fn end(&self) -> Option<AnchorId> {
        self.end
    }

    /// Sets the default source. The anchor does not have to be in the graph.
    pub fn set_start(&mut self, id: Option<AnchorId>) {
        self.start = id;
    }

    /// Sets the default destination. The anchor does not have to be in the graph.
    pub fn set_end(&mut self, id: Option<AnchorId>) {
        self.end = id;
    }

    // --- Queries ---

    /// Shortest path from [`start`](Self::start) to [`end`](Self::end).
    ///
    /// Empty if either endpoint is unset, missing, or unreachable.
    #[must_use]
    pub fn path(&self) -> Path {
        self.path_with(SearchParams::default())
    }

    /// Like [`path`](Self::path), with explicit search parameters.
    #[must_use]
    pub fn path_with(&self, params: SearchParams) -> Path {
        match (self.start, self.end) {
            (Some(source), Some(destination)) => FindPath::new(source, destination)
                .with_params(params)
                .execute(self),
            _ => Path::default(),
        }
    }

    /// Samples the current [`path`](Self::path) into a trail of poses.
    ///
    /// # Errors
    ///
    /// Returns an error if the step size is not positive and finite, or if
    /// the path would need more than `params.max_poses` poses.
    pub fn trail(&self, params: TrailParams) -> Result<Trail> {
        GenerateTrail::from_params(&params)?.execute(&self.path())
    }

    /// Samples the path found with `config.search` using `config.trail`.
    ///
    /// # Errors
    ///
    /// Same as [`trail`](Self::trail).
    pub fn trail_with(&self, config: &NavigationConfig) -> Result<Trail> {
        GenerateTrail::from_params(&config.trail)?.execute(&self.path_with(config.search))
    }

    // --- Internal helpers ---

    fn link(&mut self, a: AnchorId, b: AnchorId) {
        for (x, y) in [(a, b), (b, a)] {
            match self.adjacency.get_mut(x) {
                Some(neighbors) => {
                    neighbors.insert(y);
                }
                None => {
                    self.adjacency.insert(x, BTreeSet::from([y]));
                }
            }
        }
    }

    fn drop_if_isolated(&mut self, id: AnchorId) {
        if self.adjacency.get(id).is_some_and(BTreeSet::is_empty) {
            self.adjacency.remove(id);
            self.anchors.remove(id);
            tracing::trace!(?id, "isolated anchor dropped");
        }
    }
}
