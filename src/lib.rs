//! Navigation graph over map-space anchors.
//!
//! A [`NavigationGraph`] holds waypoints ([`Anchor`]s) joined by undirected
//! edges. [`FindPath`](operations::FindPath) computes shortest routes with
//! A*, and [`GenerateTrail`](operations::GenerateTrail) turns a route into
//! evenly spaced, oriented poses for guidance rendering.
//!
//! Nothing here locks. A graph is plain data (`Send + Sync`); queries borrow
//! it immutably and may run concurrently, while edits need exclusive access.
//! Callers that share a graph across threads wrap it themselves.

pub mod config;
pub mod error;
pub mod graph;
pub mod math;
pub mod operations;
pub mod topology;

pub use config::{NavigationConfig, SearchParams, TrailParams};
pub use error::{NavGraphError, Result};
pub use graph::{NavigationGraph, Topology};
pub use topology::{Anchor, AnchorId, AnchorSource, AnchorStore};
