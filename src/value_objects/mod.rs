//! DAG value objects
//!
//! Value objects are immutable types that represent concepts in the DAG builder domain.
//! They are compared by value rather than identity and encapsulate domain validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::commands::DagCommandError;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random (v4) identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier of a node within a DAG
    NodeId
);

uuid_identifier!(
    /// Unique identifier of an edge within a DAG
    EdgeId
);

/// Represents the position of a node in 2D space
///
/// Nodes are rendered from their top-left corner, so this is the top-left
/// of the node's box rather than its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Default for Position2D {
    fn default() -> Self {
        Self::origin()
    }
}

/// Represents the size of a node's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size; both dimensions must be positive and finite
    pub fn new(width: f64, height: f64) -> Result<Self, String> {
        let valid = |d: f64| d > 0.0 && d.is_finite();
        if !(valid(width) && valid(height)) {
            return Err(format!(
                "Size dimensions must be positive, got {width} x {height}"
            ));
        }
        Ok(Self { width, height })
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 172.0,
            height: 36.0,
        }
    }
}

/// Flow direction used by the layered layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayoutDirection {
    /// Ranks grow downwards along the y axis
    #[default]
    #[serde(rename = "TB", alias = "top-to-bottom")]
    TopToBottom,
    /// Ranks grow rightwards along the x axis
    #[serde(rename = "LR", alias = "left-to-right")]
    LeftToRight,
}

impl LayoutDirection {
    /// Get the short (rankdir) form of the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutDirection::TopToBottom => "TB",
            LayoutDirection::LeftToRight => "LR",
        }
    }

    /// Whether ranks vary along the x axis
    pub fn is_horizontal(&self) -> bool {
        matches!(self, LayoutDirection::LeftToRight)
    }
}

impl FromStr for LayoutDirection {
    type Err = DagCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tb" | "top-to-bottom" => Ok(LayoutDirection::TopToBottom),
            "lr" | "left-to-right" => Ok(LayoutDirection::LeftToRight),
            _ => Err(DagCommandError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
