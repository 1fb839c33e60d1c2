use sqlpath_eval::{ErrorKind, PathError};
use sqlpath_ir::IrError;
use thiserror::Error;

/// Errors surfaced by compiled queries and the command-line tool.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid path: {0}")]
    Ir(#[from] IrError),

    #[error("Evaluation failed: {0}")]
    Path(#[from] PathError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// The path error classification, when the failure came from the path
    /// itself rather than from I/O or decoding.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            QueryError::Ir(_) => Some(ErrorKind::InvalidIrConstruction),
            QueryError::Path(err) => Some(err.kind()),
            QueryError::Json(_) | QueryError::Io(_) => None,
        }
    }
}
