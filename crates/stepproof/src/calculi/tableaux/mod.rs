use std::fmt;

use serde::{Deserialize, Serialize};

pub mod prop;

pub use prop::PropTableaux as Prop;

/// How strictly new subtrees have to connect back to their branch.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize, Default)]
pub enum TableauxType {
    #[default]
    #[serde(rename = "UNCONNECTED")]
    Unconnected,
    #[serde(rename = "WEAKLYCONNECTED")]
    WeaklyConnected,
    #[serde(rename = "STRONGLYCONNECTED")]
    StronglyConnected,
}

impl TableauxType {
    pub fn is_unconnected(&self) -> bool {
        matches!(self, TableauxType::Unconnected)
    }

    pub fn is_strongly_connected(&self) -> bool {
        matches!(self, TableauxType::StronglyConnected)
    }

    /// Wording used in close messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TableauxType::Unconnected => "unconnected",
            TableauxType::WeaklyConnected => "weakly connected",
            TableauxType::StronglyConnected => "strongly connected",
        }
    }
}

impl fmt::Display for TableauxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableauxType::Unconnected => "UNCONNECTED",
            TableauxType::WeaklyConnected => "WEAKLYCONNECTED",
            TableauxType::StronglyConnected => "STRONGLYCONNECTED",
        };
        write!(f, "{}", s)
    }
}
