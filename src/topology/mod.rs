pub mod anchor;
pub mod store;

pub use anchor::{Anchor, AnchorId};
pub use store::{AnchorSource, AnchorStore};
