pub mod error;
mod metrics;
pub mod state;
pub mod variable;
pub mod variable_pool;

pub use error::VariableError;
pub use state::{VariableSeed, VariableState};
pub use variable::*;
pub use variable_pool::{clear_variable_pool, variable_with_name, PoolConfig, VariablePool};
