//! SQL/JSON path evaluation.
//!
//! This crate ties the workspace together:
//!
//! - [`ir`] (`sqlpath-ir`): the node types, their construction rules and the
//!   serde interchange format
//! - [`eval`] (`sqlpath-eval`): the lax/strict evaluator and three-valued logic
//! - [`JsonPathQuery`]: a compiled, shareable path with its mode and limits
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sqlpath::{JsonPathQuery, Mode, NoBindings};
//! use sqlpath::ir::{ComparisonOperator, PathNode, PredicateNode};
//!
//! // lax $ ? (@ > 2)
//! let query = JsonPathQuery::compile(
//!     PathNode::context().filter(PredicateNode::compare(
//!         ComparisonOperator::GreaterThan,
//!         PathNode::current_item(),
//!         PathNode::literal(2)?,
//!     )),
//!     Mode::Lax,
//! )?;
//!
//! let items = query.query(&json!([1, 2, 3, 4]), &NoBindings)?;
//! assert_eq!(items, vec![json!(3), json!(4)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod query;

pub use sqlpath_eval as eval;
pub use sqlpath_ir as ir;

pub use error::QueryError;
pub use query::JsonPathQuery;
pub use sqlpath_eval::{
    ErrorKind, Evaluator, EvaluatorConfig, Mode, NoBindings, PathError, Truth, VariableBindings,
};
pub use sqlpath_ir::{IrError, IrJsonPath, IrRoot, PathNode, PredicateNode};
