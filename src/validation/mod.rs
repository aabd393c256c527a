//! DAG validation
//!
//! Two independent checks: per-edge admission (self-loops, duplicates,
//! unknown endpoints) performed before an edge is committed, and the
//! whole-graph status (size, edge count, acyclicity) reported afterwards.

mod cycle;
mod edge;
mod status;
pub(crate) mod topology;

pub use cycle::{detect_cycle, find_cycle};
pub use edge::{is_valid_edge, validate_edge, EdgeRejection};
pub use status::{overall_status, DagStatus};
