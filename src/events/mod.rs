//! DAG events

mod dag_events;

pub use dag_events::*;
