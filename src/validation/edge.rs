//! Edge admission rules
//!
//! Admission is deliberately local: a candidate edge is checked against the
//! existing edges only. Whether the graph as a whole is still acyclic is a
//! separate status report (see [`super::status`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::DagEdge;
use crate::value_objects::NodeId;

/// Why a candidate edge was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EdgeRejection {
    #[error("edge source or target is missing")]
    MissingEndpoint,

    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("an edge from {from} to {to} already exists")]
    Duplicate { from: NodeId, to: NodeId },

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
}

/// Check a candidate `(source, target)` pair against the existing edges.
///
/// Rules, in order: both endpoints present, no self-loop, no duplicate of an
/// existing ordered pair. On success the resolved endpoints are returned.
pub fn validate_edge<'a, I>(
    source: Option<NodeId>,
    target: Option<NodeId>,
    existing: I,
) -> Result<(NodeId, NodeId), EdgeRejection>
where
    I: IntoIterator<Item = &'a DagEdge>,
{
    let (Some(source), Some(target)) = (source, target) else {
        return Err(EdgeRejection::MissingEndpoint);
    };

    if source == target {
        return Err(EdgeRejection::SelfLoop(source));
    }

    if existing
        .into_iter()
        .any(|edge| edge.source == source && edge.target == target)
    {
        return Err(EdgeRejection::Duplicate {
            from: source,
            to: target,
        });
    }

    Ok((source, target))
}

/// Boolean form of [`validate_edge`]
pub fn is_valid_edge<'a, I>(source: Option<NodeId>, target: Option<NodeId>, existing: I) -> bool
where
    I: IntoIterator<Item = &'a DagEdge>,
{
    validate_edge(source, target, existing).is_ok()
}
