//! Lax/strict evaluator for SQL/JSON path IR trees.
//!
//! An evaluation is a pure function of the tree, the input item, the named
//! variable bindings, the [`Mode`] and the [`EvaluatorConfig`]. Trees are
//! only read, so one tree may be evaluated from many threads at once.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sqlpath_eval::{Mode, NoBindings, evaluate_sequence};
//! use sqlpath_ir::PathNode;
//!
//! // $.a[0]
//! let path = PathNode::context().member("a")?.index(0);
//! let input = json!({"a": 5});
//!
//! assert_eq!(evaluate_sequence(&path, &input, Mode::Lax, &NoBindings)?, vec![json!(5)]);
//! assert!(evaluate_sequence(&path, &input, Mode::Strict, &NoBindings).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bindings;
pub mod config;
pub mod datetime;
pub mod engine;
pub mod error;
pub mod item;
pub mod methods;
pub mod mode;
pub mod numeric;
pub mod predicate;
pub mod truth;

pub use bindings::{NoBindings, VariableBindings};
pub use config::EvaluatorConfig;
pub use engine::{
    EvaluationContext, Evaluator, Scope, Sequence, evaluate_predicate, evaluate_sequence,
};
pub use error::{ErrorKind, EvalResult, PathError};
pub use item::{ItemType, JsonItem};
pub use mode::Mode;
pub use numeric::Numeric;
pub use predicate::compare_items;
pub use truth::Truth;
