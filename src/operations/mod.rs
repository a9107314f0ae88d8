pub mod navigation;
pub mod query;

pub use navigation::{FindPath, GenerateTrail, Path, Trail};
pub use query::NearestAnchor;
