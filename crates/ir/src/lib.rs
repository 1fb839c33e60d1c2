//! Intermediate representation of SQL/JSON path expressions.
//!
//! A path is an immutable tree of [`PathNode`]s (value-producing) and
//! [`PredicateNode`]s (three-valued). Trees are built once, by the
//! construction API or by deserializing the interchange format, and then
//! shared read-only between any number of concurrent evaluations.
//!
//! # Key Types
//!
//! - [`PathNode`] / [`PredicateNode`]: the two node families
//! - [`PathVisitor`] / [`PredicateVisitor`]: one method per node type, driven by `accept`
//! - [`IrJsonPath`]: a validated root, serializable with serde
//!
//! # Example
//!
//! ```
//! use sqlpath_ir::{ComparisonOperator, IrJsonPath, PathNode, PredicateNode};
//!
//! // $.items[*] ? (@.price > 10)
//! let root = PathNode::context()
//!     .member("items")?
//!     .wildcard_array()
//!     .filter(PredicateNode::compare(
//!         ComparisonOperator::GreaterThan,
//!         PathNode::current_item().member("price")?,
//!         PathNode::literal(10)?,
//!     ));
//! let path = IrJsonPath::new(root)?;
//! assert_eq!(path.to_string(), r#"$."items"[*] ? (@."price" > 10)"#);
//! # Ok::<(), sqlpath_ir::IrError>(())
//! ```

pub mod display;
pub mod error;
pub mod node;
pub mod path;
pub mod predicate;
pub mod template;
pub mod validate;
pub mod visitor;

pub use error::IrError;
pub use node::{
    ArithmeticBinary, ArithmeticUnary, ArrayAccessor, ArraySelection, BinaryOperator,
    DescendantMemberAccessor, Filter, IrChild, ItemMethod, Literal, MemberAccessor, MethodCall,
    NamedVariable, PathNode, Subscript, UnaryOperator, WildcardMemberAccessor,
};
pub use path::{IrJsonPath, IrRoot, MAX_NESTING};
pub use predicate::{
    Comparison, ComparisonOperator, Conjunction, Disjunction, Exists, IsUnknown, LikeRegex,
    Negation, PredicateNode, StartsWith,
};
pub use template::{DatetimeTemplate, TemplateKind};
pub use validate::{validate_path, validate_predicate};
pub use visitor::{PathVisitor, PredicateVisitor};
