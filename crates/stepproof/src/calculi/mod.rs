use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod resolution;
pub mod tableaux;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "&str")]
pub enum CalculusKind {
    PropTableaux,
    PropResolution,
}

impl CalculusKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            CalculusKind::PropTableaux => "prop-tableaux",
            CalculusKind::PropResolution => "prop-resolution",
        }
    }
}

impl fmt::Display for CalculusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl<'a> TryFrom<&'a str> for CalculusKind {
    type Error = &'static str;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        match s {
            "prop-tableaux" => Ok(CalculusKind::PropTableaux),
            "prop-resolution" => Ok(CalculusKind::PropResolution),
            _ => Err("Unknown calculus"),
        }
    }
}

impl Serialize for CalculusKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_str())
    }
}
