//! Graph layout
//!
//! Node positions are computed from topology alone by a layered
//! (hierarchical) layout. Every node gets the same fixed-size box.

pub mod layered;

pub use layered::{LayeredLayout, LayoutBounds, LayoutConfig, LayoutResult};
