use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VariableError;

/// The domain a variable ranges over.
///
/// The string forms (`BOOL`, `INT`, `REAL`) are part of the persisted format,
/// so adding a kind is a breaking change.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VariableType {
    #[serde(rename = "BOOL")]
    Bool,
    #[serde(rename = "INT")]
    Int,
    #[default]
    #[serde(rename = "REAL")]
    Real,
}

impl VariableType {
    pub const ALL: [VariableType; 3] = [VariableType::Bool, VariableType::Int, VariableType::Real];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Bool => "BOOL",
            VariableType::Int => "INT",
            VariableType::Real => "REAL",
        }
    }

    // Slot in per-type tables
    pub(crate) fn index(&self) -> usize {
        match self {
            VariableType::Bool => 0,
            VariableType::Int => 1,
            VariableType::Real => 2,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOL" => Ok(VariableType::Bool),
            "INT" => Ok(VariableType::Int),
            "REAL" => Ok(VariableType::Real),
            other => Err(VariableError::UnknownType(other.to_string())),
        }
    }
}
