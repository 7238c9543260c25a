// The `variable` module contains the value types handed out by the pool. These types are immutable.
mod identity;
pub use crate::variable::identity::{Variable, NO_VARIABLE_NAME};

mod kind;
pub use crate::variable::kind::VariableType;
