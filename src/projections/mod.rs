//! DAG projections
//!
//! Read models derived from the aggregate for display and persistence.

mod snapshot;

pub use snapshot::{DagSnapshot, EdgeView, NodeView};
