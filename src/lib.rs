//! DAG builder domain
//!
//! Core of an interactive directed-acyclic-graph editor: an insertion-ordered
//! graph store, local edge admission rules, whole-graph status reporting with
//! cycle detection, and a deterministic layered (Sugiyama-style) auto-layout.
//! The presentation layer drives it through [`DagCommand`]s and renders
//! [`DagSnapshot`]s.

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod domain_events;
pub mod events;
pub mod handlers;
pub mod layout;
pub mod projections;
pub mod validation;
pub mod value_objects;

// Re-export main types
pub use aggregate::*;
pub use domain_events::*;
pub use events::*;

pub use commands::{DagCommand, DagCommandError, DagCommandResult};
pub use config::{ConfigError, DagConfig, PlacementConfig};
pub use handlers::{DagCommandHandler, DagEditor};
pub use layout::{LayeredLayout, LayoutBounds, LayoutConfig, LayoutResult};
pub use projections::{DagSnapshot, EdgeView, NodeView};
pub use validation::{
    detect_cycle, find_cycle, is_valid_edge, overall_status, validate_edge, DagStatus,
    EdgeRejection,
};
pub use value_objects::{EdgeId, LayoutDirection, NodeId, Position2D, Size};
