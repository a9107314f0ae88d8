use std::cmp::Ordering;
use std::collections::BinaryHeap;

use slotmap::SecondaryMap;

use crate::config::SearchParams;
use crate::graph::NavigationGraph;
use crate::topology::{Anchor, AnchorId};

/// An ordered sequence of connected anchors, source first.
///
/// An empty path means no route was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    anchors: Vec<Anchor>,
}

impl Path {
    /// Creates a path from an ordered list of anchors.
    #[must_use]
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self { anchors }
    }

    /// The anchors along the path.
    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Identifiers of the anchors along the path.
    #[must_use]
    pub fn ids(&self) -> Vec<AnchorId> {
        self.anchors.iter().map(Anchor::id).collect()
    }

    /// Number of anchors on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if no route was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Sum of straight-line distances between consecutive anchors.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.anchors
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

impl IntoIterator for Path {
    type Item = Anchor;
    type IntoIter = std::vec::IntoIter<Anchor>;

    fn into_iter(self) -> Self::IntoIter {
        self.anchors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Anchor;
    type IntoIter = std::slice::Iter<'a, Anchor>;

    fn into_iter(self) -> Self::IntoIter {
        self.anchors.iter()
    }
}

/// Frontier entry of the A* search.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    /// Accumulated cost plus remaining estimate.
    estimate: f64,
    /// Accumulated cost from the source.
    cost: f64,
    /// Insertion order, breaks ties first-in first-out.
    seq: u64,
    anchor: AnchorId,
    parent: Option<AnchorId>,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on (estimate, seq).
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds the shortest path between two anchors with A*.
///
/// Edge cost and heuristic are both straight-line distances between anchor
/// positions, so the heuristic is consistent and the first time the
/// destination is dequeued its path is optimal.
pub struct FindPath {
    source: AnchorId,
    destination: AnchorId,
    params: SearchParams,
}

impl FindPath {
    /// Creates a new `FindPath` query.
    #[must_use]
    pub fn new(source: AnchorId, destination: AnchorId) -> Self {
        Self {
            source,
            destination,
            params: SearchParams::default(),
        }
    }

    /// Sets the search parameters.
    #[must_use]
    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the query.
    ///
    /// Returns a single-anchor path when source and destination coincide,
    /// and an empty path when either anchor is missing, no route exists, or
    /// the expansion budget runs out. Neighbors whose payload has not been
    /// supplied yet are not traversed.
    #[must_use]
    pub fn execute(&self, graph: &NavigationGraph) -> Path {
        let (Some(source), Some(destination)) = (
            graph.anchor(self.source),
            graph.anchor(self.destination),
        ) else {
            return Path::default();
        };
        if source.id() == destination.id() {
            return Path::new(vec![source.clone()]);
        }

        let mut parents: SecondaryMap<AnchorId, Option<AnchorId>> = SecondaryMap::new();
        let mut queue = BinaryHeap::new();
        let mut seq = 0u64;
        let mut expansions = 0usize;

        queue.push(Frontier {
            estimate: source.distance_to(destination),
            cost: 0.0,
            seq,
            anchor: source.id(),
            parent: None,
        });

        while let Some(item) = queue.pop() {
            if parents.contains_key(item.anchor) {
                continue;
            }
            parents.insert(item.anchor, item.parent);

            if item.anchor == destination.id() {
                tracing::debug!(expansions, cost = item.cost, "path found");
                return backtrack(graph, &parents, destination.id());
            }

            expansions += 1;
            if self
                .params
                .max_expansions
                .is_some_and(|limit| expansions > limit)
            {
                tracing::debug!(expansions, "expansion budget exhausted");
                return Path::default();
            }

            let Some(current) = graph.anchor(item.anchor) else {
                continue;
            };
            for neighbor_id in graph.neighbors(item.anchor) {
                if parents.contains_key(neighbor_id) {
                    continue;
                }
                let Some(neighbor) = graph.anchor(neighbor_id) else {
                    continue;
                };
                let cost = item.cost + current.distance_to(neighbor);
                seq += 1;
                queue.push(Frontier {
                    estimate: cost + neighbor.distance_to(destination),
                    cost,
                    seq,
                    anchor: neighbor_id,
                    parent: Some(item.anchor),
                });
            }
        }

        tracing::debug!(expansions, "no connecting path");
        Path::default()
    }
}

/// Follows parent links back from `last` and returns the path source-first.
fn backtrack(
    graph: &NavigationGraph,
    parents: &SecondaryMap<AnchorId, Option<AnchorId>>,
    last: AnchorId,
) -> Path {
    let mut anchors = Vec::new();
    let mut current = Some(last);
    while let Some(id) = current {
        match graph.anchor(id) {
            Some(anchor) => anchors.push(anchor.clone()),
            None => return Path::default(),
        }
        current = parents.get(id).copied().flatten();
    }
    anchors.reverse();
    Path::new(anchors)
}
