mod nearest_anchor;

pub use nearest_anchor::NearestAnchor;
