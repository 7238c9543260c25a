use thiserror::Error;

/// Errors raised at the pool boundary. Every variant is an invalid argument;
/// an absent variable is reported as `Variable::NO_VARIABLE`, never as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("variable name must not be empty")]
    EmptyName,
    #[error("variable name is reserved: {0}")]
    ReservedName(String),
    #[error("unknown variable type: {0}")]
    UnknownType(String),
}

impl VariableError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            VariableError::EmptyName | VariableError::ReservedName(_) | VariableError::UnknownType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VariableError>;
