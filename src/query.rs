//! Compiled queries: a shared path plus the mode and limits to run it with.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlpath_eval::{Evaluator, EvaluatorConfig, Mode, PathError, Truth, VariableBindings};
use sqlpath_ir::{IrJsonPath, IrRoot};

use crate::error::QueryError;

/// A path ready for repeated evaluation.
///
/// Cloning is cheap: the tree is shared behind an [`Arc`] and never mutated,
/// so clones can be handed to other threads and evaluated concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QueryRecord", into = "QueryRecord")]
pub struct JsonPathQuery {
    path: Arc<IrJsonPath>,
    mode: Mode,
    config: EvaluatorConfig,
}

/// Interchange form: `{"mode": "lax", "path": {...}, "config": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryRecord {
    #[serde(default)]
    mode: Mode,
    path: Arc<IrJsonPath>,
    #[serde(default, skip_serializing_if = "is_default_config")]
    config: EvaluatorConfig,
}

fn is_default_config(config: &EvaluatorConfig) -> bool {
    *config == EvaluatorConfig::default()
}

impl TryFrom<QueryRecord> for JsonPathQuery {
    type Error = QueryError;

    fn try_from(record: QueryRecord) -> Result<Self, Self::Error> {
        Self::from_shared(record.path, record.mode).with_config(record.config)
    }
}

impl From<JsonPathQuery> for QueryRecord {
    fn from(query: JsonPathQuery) -> Self {
        QueryRecord {
            mode: query.mode,
            path: query.path,
            config: query.config,
        }
    }
}

impl JsonPathQuery {
    pub fn new(path: IrJsonPath, mode: Mode) -> Self {
        Self::from_shared(Arc::new(path), mode)
    }

    pub fn from_shared(path: Arc<IrJsonPath>, mode: Mode) -> Self {
        Self {
            path,
            mode,
            config: EvaluatorConfig::default(),
        }
    }

    /// Validates `root` and wraps it in a query.
    pub fn compile(root: impl Into<IrRoot>, mode: Mode) -> Result<Self, QueryError> {
        Ok(Self::new(IrJsonPath::new(root)?, mode))
    }

    /// Replaces the evaluator limits. A tree that is already deeper than the
    /// new depth limit is rejected here rather than on every row.
    pub fn with_config(mut self, config: EvaluatorConfig) -> Result<Self, QueryError> {
        if self.path.depth() > config.max_depth {
            return Err(PathError::DepthExceeded {
                limit: config.max_depth,
            }
            .into());
        }
        self.config = config;
        Ok(self)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, QueryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn path(&self) -> &Arc<IrJsonPath> {
        &self.path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.config)
    }

    /// The full result sequence. A predicate path yields one item: `true`,
    /// `false` or `null` for UNKNOWN.
    pub fn query(
        &self,
        input: &Value,
        bindings: &dyn VariableBindings,
    ) -> Result<Vec<Value>, QueryError> {
        Ok(self
            .evaluator()
            .evaluate(&self.path, input, self.mode, bindings)?)
    }

    pub fn query_first(
        &self,
        input: &Value,
        bindings: &dyn VariableBindings,
    ) -> Result<Option<Value>, QueryError> {
        Ok(self.query(input, bindings)?.into_iter().next())
    }

    /// Whether the path selects anything, as `JSON_EXISTS` asks it. A
    /// predicate path always yields one item, so it exists once it evaluates.
    pub fn exists(&self, input: &Value, bindings: &dyn VariableBindings) -> Result<bool, QueryError> {
        match self.path.root() {
            IrRoot::Path(node) => Ok(!self
                .evaluator()
                .evaluate_sequence_borrowed(node, input, self.mode, bindings)?
                .is_empty()),
            IrRoot::Predicate(node) => {
                self.evaluator()
                    .evaluate_predicate(node, input, self.mode, bindings)?;
                Ok(true)
            }
        }
    }

    /// The three-valued outcome of a predicate path. A value-producing path
    /// is TRUE when it selects anything and FALSE otherwise.
    pub fn matches(
        &self,
        input: &Value,
        bindings: &dyn VariableBindings,
    ) -> Result<Truth, QueryError> {
        match self.path.root() {
            IrRoot::Predicate(node) => Ok(self
                .evaluator()
                .evaluate_predicate(node, input, self.mode, bindings)?),
            IrRoot::Path(_) => self.exists(input, bindings).map(Truth::from),
        }
    }

    /// Evaluates every row independently; a failure on one row does not stop
    /// the others.
    #[cfg(feature = "parallel-rows")]
    pub fn query_rows<B>(&self, rows: &[Value], bindings: &B) -> Vec<Result<Vec<Value>, QueryError>>
    where
        B: VariableBindings + Sync,
    {
        use rayon::prelude::*;
        rows.par_iter().map(|row| self.query(row, bindings)).collect()
    }

    #[cfg(not(feature = "parallel-rows"))]
    pub fn query_rows<B>(&self, rows: &[Value], bindings: &B) -> Vec<Result<Vec<Value>, QueryError>>
    where
        B: VariableBindings + Sync,
    {
        rows.iter().map(|row| self.query(row, bindings)).collect()
    }
}

impl fmt::Display for JsonPathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mode, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlpath_eval::{ErrorKind, NoBindings};
    use sqlpath_ir::{BinaryOperator, ComparisonOperator, PathNode, PredicateNode};

    fn price_filter() -> PathNode {
        PathNode::context()
            .member("items")
            .unwrap()
            .filter(PredicateNode::compare(
                ComparisonOperator::GreaterThan,
                PathNode::current_item().member("price").unwrap(),
                PathNode::literal(10).unwrap(),
            ))
            .member("name")
            .unwrap()
    }

    #[test]
    fn test_query_and_first() {
        let query = JsonPathQuery::compile(price_filter(), Mode::Lax).unwrap();
        let input = json!({"items": [
            {"name": "pen", "price": 2},
            {"name": "lamp", "price": 30},
            {"name": "desk", "price": 120}
        ]});
        assert_eq!(
            query.query(&input, &NoBindings).unwrap(),
            vec![json!("lamp"), json!("desk")]
        );
        assert_eq!(query.query_first(&input, &NoBindings).unwrap(), Some(json!("lamp")));
        assert!(query.exists(&input, &NoBindings).unwrap());
        assert!(!query.exists(&json!({}), &NoBindings).unwrap());
    }

    #[test]
    fn test_predicate_root_matches() {
        let query = JsonPathQuery::compile(
            PredicateNode::compare(
                ComparisonOperator::Equal,
                PathNode::context().member("a").unwrap(),
                PathNode::literal(5).unwrap(),
            ),
            Mode::Strict,
        )
        .unwrap();
        assert_eq!(query.matches(&json!({"a": 5}), &NoBindings).unwrap(), Truth::True);
        assert_eq!(query.matches(&json!({}), &NoBindings).unwrap(), Truth::Unknown);
        assert_eq!(query.query(&json!({}), &NoBindings).unwrap(), vec![json!(null)]);
        assert!(query.exists(&json!({}), &NoBindings).unwrap());
    }

    #[test]
    fn test_predicate_root_exists_surfaces_fatal_errors() {
        let query = JsonPathQuery::compile(
            PredicateNode::exists(PathNode::binary(
                BinaryOperator::Divide,
                PathNode::literal(1).unwrap(),
                PathNode::literal(0).unwrap(),
            )),
            Mode::Strict,
        )
        .unwrap();
        let err = query.exists(&json!(null), &NoBindings).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ArithmeticError));
        assert!(query.query(&json!(null), &NoBindings).is_err());
    }

    #[test]
    fn test_serialized_form() {
        let query = JsonPathQuery::compile(PathNode::context().member("a").unwrap(), Mode::Strict)
            .unwrap();
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["mode"], json!("strict"));
        assert_eq!(value["path"]["type"], json!("memberAccessor"));
        assert!(value.get("config").is_none());

        let decoded = JsonPathQuery::from_json(&query.to_json().unwrap()).unwrap();
        assert_eq!(decoded, query);
    }

    #[test]
    fn test_mode_defaults_to_lax() {
        let query = JsonPathQuery::from_json(r#"{"path": {"type": "contextVariable"}}"#).unwrap();
        assert_eq!(query.mode(), Mode::Lax);
    }

    #[test]
    fn test_depth_limit_checked_up_front() {
        let text = r#"{"mode": "lax", "config": {"maxDepth": 2},
            "path": {"type": "memberAccessor", "key": "a",
                "base": {"type": "memberAccessor", "key": "b", "base": {"type": "contextVariable"}}}}"#;
        assert!(JsonPathQuery::from_json(text).is_err());
    }

    #[test]
    fn test_query_rows_keeps_row_order() {
        let query = JsonPathQuery::compile(PathNode::context().member("n").unwrap(), Mode::Strict)
            .unwrap();
        let rows = vec![json!({"n": 1}), json!(3), json!({"n": 2})];
        let results = query.query_rows(&rows, &NoBindings);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &vec![json!(1)]);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap(), &vec![json!(2)]);
    }
}
