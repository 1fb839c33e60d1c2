use sqlpath_ir::IrError;
use thiserror::Error;

/// Classification used by the lax/strict error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIrConstruction,
    StructuralError,
    TypeError,
    ArithmeticError,
    EvaluationDepthExceeded,
    UnboundVariable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Invalid path IR: {0}")]
    InvalidIr(#[from] IrError),

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Evaluation exceeded the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Variable '${name}' is not bound")]
    UnboundVariable { name: String },
}

pub type EvalResult<T> = Result<T, PathError>;

impl PathError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::Arithmetic(message.into())
    }

    pub fn division_by_zero() -> Self {
        Self::Arithmetic("division by zero".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::InvalidIr(_) => ErrorKind::InvalidIrConstruction,
            PathError::Structural(_) => ErrorKind::StructuralError,
            PathError::Type(_) => ErrorKind::TypeError,
            PathError::Arithmetic(_) => ErrorKind::ArithmeticError,
            PathError::DepthExceeded { .. } => ErrorKind::EvaluationDepthExceeded,
            PathError::UnboundVariable { .. } => ErrorKind::UnboundVariable,
        }
    }

    /// Structural and type errors are the only ones lax mode may swallow.
    pub fn is_suppressible(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StructuralError | ErrorKind::TypeError
        )
    }
}
