use thiserror::Error;

/// Raised when an IR tree is malformed. Never suppressed by lax mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("Invalid {node} node: {message}")]
    InvalidNode { node: &'static str, message: String },

    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Invalid datetime template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Tree nests {depth} levels deep, the interchange format carries at most {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("'{symbol}' is not allowed here: {message}")]
    Scope {
        symbol: &'static str,
        message: String,
    },
}

impl IrError {
    pub fn invalid(node: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            node,
            message: message.into(),
        }
    }

    pub fn scope(symbol: &'static str, message: impl Into<String>) -> Self {
        Self::Scope {
            symbol,
            message: message.into(),
        }
    }

    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.into(),
            message: message.into(),
        }
    }
}
