//! Parameter error types

/// Errors from parameter store operations and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name too long, or parameter not registered
    UnknownParameter,
    /// Store is full
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
    /// Value type differs from the registered type
    TypeMismatch,
    /// Parameter set is inconsistent (e.g. range max not above range min)
    InvalidConfig(&'static str),
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::UnknownParameter => write!(f, "unknown parameter"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
            ParameterError::TypeMismatch => write!(f, "parameter type mismatch"),
            ParameterError::InvalidConfig(reason) => {
                write!(f, "invalid parameter configuration: {}", reason)
            }
        }
    }
}
