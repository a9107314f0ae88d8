use crate::graph::NavigationGraph;
use crate::math::Point3;
use crate::topology::Anchor;

/// Finds the stored anchor closest to a map-space point.
pub struct NearestAnchor {
    point: Point3,
}

impl NearestAnchor {
    /// Creates a new `NearestAnchor` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the query.
    ///
    /// Returns `None` if the graph holds no anchor payloads. On equal
    /// distances the anchor visited first in key order wins.
    #[must_use]
    pub fn execute<'g>(&self, graph: &'g NavigationGraph) -> Option<&'g Anchor> {
        graph
            .anchors()
            .map(|anchor| (nalgebra::distance_squared(&anchor.position(), &self.point), anchor))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, anchor)| anchor)
    }
}
