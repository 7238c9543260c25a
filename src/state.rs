//! Persisted form of variables.
//!
//! A variable is written as the pair `(name, type)`, e.g. `["x", "REAL"]`. The
//! id and rank are not persisted; reading the pair back runs `get_or_create`
//! against whichever pool is live at that point.
//!
//! This is lossy when two variables share a name (see
//! `VariablePool::create_fresh_named`): both are written identically and both
//! come back as the variable currently bound to that name.

use serde::de::{self, DeserializeSeed, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;
use crate::variable::{Variable, VariableType};
use crate::variable_pool::VariablePool;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableState(pub String, pub String);

impl VariableState {
    pub fn new(name: &str, ty: VariableType) -> VariableState {
        VariableState(name.to_string(), ty.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn type_name(&self) -> &str {
        &self.1
    }
}

impl Variable {
    pub fn state(&self) -> VariableState {
        VariableState::new(self.name(), self.var_type())
    }
}

impl VariablePool {
    /// Turns a persisted pair back into a variable of this pool.
    pub fn restore(&self, state: &VariableState) -> Result<Variable> {
        let ty = state.type_name().parse::<VariableType>()?;
        self.get_or_create(state.name(), ty)
    }
}

impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.state().serialize(serializer)
    }
}

/// Deserializes into the process-wide pool. Use `VariableSeed` to target
/// another pool.
impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        VariableSeed(VariablePool::global()).deserialize(deserializer)
    }
}

/// Deserializes a variable into a specific pool.
#[derive(Clone, Copy, Debug)]
pub struct VariableSeed<'a>(pub &'a VariablePool);

impl<'de, 'a> DeserializeSeed<'de> for VariableSeed<'a> {
    type Value = Variable;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Variable, D::Error>
    where
        D: Deserializer<'de>,
    {
        let state = VariableState::deserialize(deserializer)?;
        self.0.restore(&state).map_err(de::Error::custom)
    }
}
