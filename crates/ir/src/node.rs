//! Value-producing IR nodes.
//!
//! Every node owns its operands. Constructors validate what the type system
//! cannot express and are the only way to build a node outside of
//! deserialization, which is re-validated by [`crate::IrJsonPath`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IrError;
use crate::predicate::PredicateNode;
use crate::template::DatetimeTemplate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathNode {
    /// `$`, the input item.
    ContextVariable,
    /// `@`, the item under test inside a filter predicate.
    CurrentItem,
    /// `last`, the final index of the array being subscripted.
    LastIndex,
    NamedVariable(NamedVariable),
    Literal(Literal),
    MemberAccessor(MemberAccessor),
    WildcardMemberAccessor(WildcardMemberAccessor),
    DescendantMemberAccessor(DescendantMemberAccessor),
    ArrayAccessor(ArrayAccessor),
    Filter(Filter),
    ArithmeticUnary(ArithmeticUnary),
    ArithmeticBinary(ArithmeticBinary),
    Method(MethodCall),
}

/// A borrowed operand of either family, used for generic tree traversal.
#[derive(Debug, Clone, Copy)]
pub enum IrChild<'a> {
    Path(&'a PathNode),
    Predicate(&'a PredicateNode),
}

impl<'a> IrChild<'a> {
    pub fn children(&self) -> Vec<IrChild<'a>> {
        match self {
            IrChild::Path(node) => node.children(),
            IrChild::Predicate(node) => node.children(),
        }
    }

    /// Number of nodes on the longest root-to-leaf chain.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(IrChild::depth)
            .max()
            .unwrap_or(0)
    }

    /// Object/array nesting of this node's interchange record. Each node is
    /// one record; subscript bounds sit three levels further down, inside
    /// the `selection` object, the `subscripts` array and their own record.
    pub fn encoded_depth(&self) -> usize {
        let nested = match self {
            IrChild::Path(PathNode::ArrayAccessor(node)) => {
                let bounds = match node.selection() {
                    ArraySelection::Wildcard => 0,
                    ArraySelection::Subscripts(subscripts) => subscripts
                        .iter()
                        .flat_map(|subscript| {
                            std::iter::once(&subscript.from).chain(subscript.to.as_ref())
                        })
                        .map(|bound| 3 + IrChild::Path(bound).encoded_depth())
                        .max()
                        .unwrap_or(2),
                };
                bounds.max(IrChild::Path(node.base()).encoded_depth())
            }
            child => child
                .children()
                .iter()
                .map(IrChild::encoded_depth)
                .max()
                .unwrap_or(0),
        };
        1 + nested
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedVariable {
    name: String,
}

impl NamedVariable {
    pub fn new(name: impl Into<String>) -> Result<Self, IrError> {
        let name = name.into();
        if name.is_empty() {
            return Err(IrError::invalid("named variable", "variable name is empty"));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A scalar JSON constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Result<Self, IrError> {
        if value.is_array() || value.is_object() {
            return Err(IrError::invalid(
                "literal",
                "only null, boolean, number and string literals are allowed",
            ));
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccessor {
    base: Box<PathNode>,
    key: String,
}

impl MemberAccessor {
    pub fn base(&self) -> &PathNode {
        &self.base
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardMemberAccessor {
    base: Box<PathNode>,
}

impl WildcardMemberAccessor {
    pub fn base(&self) -> &PathNode {
        &self.base
    }
}

/// `.**.key`: every member named `key` at any depth below the base items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescendantMemberAccessor {
    base: Box<PathNode>,
    key: String,
}

impl DescendantMemberAccessor {
    pub fn base(&self) -> &PathNode {
        &self.base
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayAccessor {
    base: Box<PathNode>,
    selection: ArraySelection,
}

impl ArrayAccessor {
    pub fn base(&self) -> &PathNode {
        &self.base
    }

    pub fn selection(&self) -> &ArraySelection {
        &self.selection
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArraySelection {
    /// `[*]`
    Wildcard,
    /// `[a, b to c, ...]`, applied in order.
    Subscripts(Vec<Subscript>),
}

/// A single index (`to` absent) or an inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    from: PathNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<PathNode>,
}

impl Subscript {
    pub fn at(index: PathNode) -> Self {
        Self {
            from: index,
            to: None,
        }
    }

    pub fn range(from: PathNode, to: PathNode) -> Self {
        Self {
            from,
            to: Some(to),
        }
    }

    pub fn from(&self) -> &PathNode {
        &self.from
    }

    pub fn to(&self) -> Option<&PathNode> {
        self.to.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    base: Box<PathNode>,
    predicate: Box<PredicateNode>,
}

impl Filter {
    pub fn base(&self) -> &PathNode {
        &self.base
    }

    pub fn predicate(&self) -> &PredicateNode {
        &self.predicate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticUnary {
    operator: UnaryOperator,
    operand: Box<PathNode>,
}

impl ArithmeticUnary {
    pub fn operator(&self) -> UnaryOperator {
        self.operator
    }

    pub fn operand(&self) -> &PathNode {
        &self.operand
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticBinary {
    operator: BinaryOperator,
    left: Box<PathNode>,
    right: Box<PathNode>,
}

impl ArithmeticBinary {
    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }

    pub fn left(&self) -> &PathNode {
        &self.left
    }

    pub fn right(&self) -> &PathNode {
        &self.right
    }
}

/// Item methods, applied to every item of the base sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum ItemMethod {
    Type,
    Size,
    Double,
    Ceiling,
    Floor,
    Abs,
    Datetime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<DatetimeTemplate>,
    },
    KeyValue,
}

impl ItemMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ItemMethod::Type => "type",
            ItemMethod::Size => "size",
            ItemMethod::Double => "double",
            ItemMethod::Ceiling => "ceiling",
            ItemMethod::Floor => "floor",
            ItemMethod::Abs => "abs",
            ItemMethod::Datetime { .. } => "datetime",
            ItemMethod::KeyValue => "keyvalue",
        }
    }

    /// `type()` and `size()` observe arrays as a whole; every other method
    /// sees the elements of an array in lax mode.
    pub fn unwraps_arrays(&self) -> bool {
        !matches!(self, ItemMethod::Type | ItemMethod::Size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    base: Box<PathNode>,
    method: ItemMethod,
}

impl MethodCall {
    pub fn base(&self) -> &PathNode {
        &self.base
    }

    pub fn method(&self) -> &ItemMethod {
        &self.method
    }
}

// --- Construction API ---

impl PathNode {
    pub fn context() -> Self {
        PathNode::ContextVariable
    }

    pub fn current_item() -> Self {
        PathNode::CurrentItem
    }

    pub fn last() -> Self {
        PathNode::LastIndex
    }

    pub fn variable(name: impl Into<String>) -> Result<Self, IrError> {
        NamedVariable::new(name).map(PathNode::NamedVariable)
    }

    pub fn literal(value: impl Into<Value>) -> Result<Self, IrError> {
        Literal::new(value.into()).map(PathNode::Literal)
    }

    pub fn null() -> Self {
        PathNode::Literal(Literal { value: Value::Null })
    }

    pub fn member(self, key: impl Into<String>) -> Result<Self, IrError> {
        let key = key.into();
        if key.is_empty() {
            return Err(IrError::invalid("member accessor", "member key is empty"));
        }
        Ok(PathNode::MemberAccessor(MemberAccessor {
            base: Box::new(self),
            key,
        }))
    }

    pub fn wildcard_member(self) -> Self {
        PathNode::WildcardMemberAccessor(WildcardMemberAccessor {
            base: Box::new(self),
        })
    }

    pub fn descendant_member(self, key: impl Into<String>) -> Result<Self, IrError> {
        let key = key.into();
        if key.is_empty() {
            return Err(IrError::invalid(
                "descendant member accessor",
                "member key is empty",
            ));
        }
        Ok(PathNode::DescendantMemberAccessor(DescendantMemberAccessor {
            base: Box::new(self),
            key,
        }))
    }

    pub fn subscripts(self, subscripts: Vec<Subscript>) -> Result<Self, IrError> {
        if subscripts.is_empty() {
            return Err(IrError::invalid(
                "array accessor",
                "at least one subscript is required",
            ));
        }
        Ok(PathNode::ArrayAccessor(ArrayAccessor {
            base: Box::new(self),
            selection: ArraySelection::Subscripts(subscripts),
        }))
    }

    /// `[index]` with an integer literal subscript.
    pub fn index(self, index: i64) -> Self {
        PathNode::ArrayAccessor(ArrayAccessor {
            base: Box::new(self),
            selection: ArraySelection::Subscripts(vec![Subscript::at(PathNode::Literal(
                Literal {
                    value: Value::from(index),
                },
            ))]),
        })
    }

    pub fn wildcard_array(self) -> Self {
        PathNode::ArrayAccessor(ArrayAccessor {
            base: Box::new(self),
            selection: ArraySelection::Wildcard,
        })
    }

    pub fn filter(self, predicate: PredicateNode) -> Self {
        PathNode::Filter(Filter {
            base: Box::new(self),
            predicate: Box::new(predicate),
        })
    }

    pub fn method(self, method: ItemMethod) -> Self {
        PathNode::Method(MethodCall {
            base: Box::new(self),
            method,
        })
    }

    pub fn unary(operator: UnaryOperator, operand: PathNode) -> Self {
        PathNode::ArithmeticUnary(ArithmeticUnary {
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn binary(operator: BinaryOperator, left: PathNode, right: PathNode) -> Self {
        PathNode::ArithmeticBinary(ArithmeticBinary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Immediate operands, in evaluation order.
    pub fn children(&self) -> Vec<IrChild<'_>> {
        match self {
            PathNode::ContextVariable
            | PathNode::CurrentItem
            | PathNode::LastIndex
            | PathNode::NamedVariable(_)
            | PathNode::Literal(_) => Vec::new(),
            PathNode::MemberAccessor(node) => vec![IrChild::Path(&node.base)],
            PathNode::WildcardMemberAccessor(node) => vec![IrChild::Path(&node.base)],
            PathNode::DescendantMemberAccessor(node) => vec![IrChild::Path(&node.base)],
            PathNode::ArrayAccessor(node) => {
                let mut children = vec![IrChild::Path(&node.base)];
                if let ArraySelection::Subscripts(subscripts) = &node.selection {
                    for subscript in subscripts {
                        children.push(IrChild::Path(&subscript.from));
                        if let Some(to) = &subscript.to {
                            children.push(IrChild::Path(to));
                        }
                    }
                }
                children
            }
            PathNode::Filter(node) => vec![
                IrChild::Path(&node.base),
                IrChild::Predicate(&node.predicate),
            ],
            PathNode::ArithmeticUnary(node) => vec![IrChild::Path(&node.operand)],
            PathNode::ArithmeticBinary(node) => {
                vec![IrChild::Path(&node.left), IrChild::Path(&node.right)]
            }
            PathNode::Method(node) => vec![IrChild::Path(&node.base)],
        }
    }

    pub fn depth(&self) -> usize {
        IrChild::Path(self).depth()
    }
}
