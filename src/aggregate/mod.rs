//! DAG aggregates

pub mod dag_graph;

pub use dag_graph::*;
