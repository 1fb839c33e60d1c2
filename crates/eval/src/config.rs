use serde::{Deserialize, Serialize};

/// Matches the deepest tree the interchange format accepts, so any tree that
/// decodes also evaluates under the default limit.
pub const DEFAULT_MAX_DEPTH: usize = sqlpath_ir::MAX_NESTING;

/// Resource limits applied to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluatorConfig {
    /// Maximum number of nested node visits before evaluation is rejected
    /// with `EvaluationDepthExceeded`.
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
