//! Double dispatch over the closed node set.
//!
//! A visitor supplies one method per node type. `accept` matches on the node
//! and forwards the caller's context unchanged, so evaluation, validation and
//! printing each live in their own visitor without touching the node types.
//! The `'n` lifetime lets a visitor hand out borrows of the tree it walks.

use crate::node::{
    ArithmeticBinary, ArithmeticUnary, ArrayAccessor, DescendantMemberAccessor, Filter, Literal,
    MemberAccessor, MethodCall, NamedVariable, PathNode, WildcardMemberAccessor,
};
use crate::predicate::{
    Comparison, Conjunction, Disjunction, Exists, IsUnknown, LikeRegex, Negation, PredicateNode,
    StartsWith,
};

pub trait PathVisitor<'n, C> {
    type Output;

    fn visit_context_variable(&self, ctx: C) -> Self::Output;
    fn visit_current_item(&self, ctx: C) -> Self::Output;
    fn visit_last_index(&self, ctx: C) -> Self::Output;
    fn visit_named_variable(&self, node: &'n NamedVariable, ctx: C) -> Self::Output;
    fn visit_literal(&self, node: &'n Literal, ctx: C) -> Self::Output;
    fn visit_member_accessor(&self, node: &'n MemberAccessor, ctx: C) -> Self::Output;
    fn visit_wildcard_member_accessor(
        &self,
        node: &'n WildcardMemberAccessor,
        ctx: C,
    ) -> Self::Output;
    fn visit_descendant_member_accessor(
        &self,
        node: &'n DescendantMemberAccessor,
        ctx: C,
    ) -> Self::Output;
    fn visit_array_accessor(&self, node: &'n ArrayAccessor, ctx: C) -> Self::Output;
    fn visit_filter(&self, node: &'n Filter, ctx: C) -> Self::Output;
    fn visit_arithmetic_unary(&self, node: &'n ArithmeticUnary, ctx: C) -> Self::Output;
    fn visit_arithmetic_binary(&self, node: &'n ArithmeticBinary, ctx: C) -> Self::Output;
    fn visit_method(&self, node: &'n MethodCall, ctx: C) -> Self::Output;
}

pub trait PredicateVisitor<'n, C> {
    type Output;

    fn visit_conjunction(&self, node: &'n Conjunction, ctx: C) -> Self::Output;
    fn visit_disjunction(&self, node: &'n Disjunction, ctx: C) -> Self::Output;
    fn visit_negation(&self, node: &'n Negation, ctx: C) -> Self::Output;
    fn visit_comparison(&self, node: &'n Comparison, ctx: C) -> Self::Output;
    fn visit_exists(&self, node: &'n Exists, ctx: C) -> Self::Output;
    fn visit_is_unknown(&self, node: &'n IsUnknown, ctx: C) -> Self::Output;
    fn visit_starts_with(&self, node: &'n StartsWith, ctx: C) -> Self::Output;
    fn visit_like_regex(&self, node: &'n LikeRegex, ctx: C) -> Self::Output;
}

impl PathNode {
    pub fn accept<'n, C, V>(&'n self, visitor: &V, ctx: C) -> V::Output
    where
        V: PathVisitor<'n, C> + ?Sized,
    {
        match self {
            PathNode::ContextVariable => visitor.visit_context_variable(ctx),
            PathNode::CurrentItem => visitor.visit_current_item(ctx),
            PathNode::LastIndex => visitor.visit_last_index(ctx),
            PathNode::NamedVariable(node) => visitor.visit_named_variable(node, ctx),
            PathNode::Literal(node) => visitor.visit_literal(node, ctx),
            PathNode::MemberAccessor(node) => visitor.visit_member_accessor(node, ctx),
            PathNode::WildcardMemberAccessor(node) => {
                visitor.visit_wildcard_member_accessor(node, ctx)
            }
            PathNode::DescendantMemberAccessor(node) => {
                visitor.visit_descendant_member_accessor(node, ctx)
            }
            PathNode::ArrayAccessor(node) => visitor.visit_array_accessor(node, ctx),
            PathNode::Filter(node) => visitor.visit_filter(node, ctx),
            PathNode::ArithmeticUnary(node) => visitor.visit_arithmetic_unary(node, ctx),
            PathNode::ArithmeticBinary(node) => visitor.visit_arithmetic_binary(node, ctx),
            PathNode::Method(node) => visitor.visit_method(node, ctx),
        }
    }
}

impl PredicateNode {
    pub fn accept<'n, C, V>(&'n self, visitor: &V, ctx: C) -> V::Output
    where
        V: PredicateVisitor<'n, C> + ?Sized,
    {
        match self {
            PredicateNode::Conjunction(node) => visitor.visit_conjunction(node, ctx),
            PredicateNode::Disjunction(node) => visitor.visit_disjunction(node, ctx),
            PredicateNode::Negation(node) => visitor.visit_negation(node, ctx),
            PredicateNode::Comparison(node) => visitor.visit_comparison(node, ctx),
            PredicateNode::Exists(node) => visitor.visit_exists(node, ctx),
            PredicateNode::IsUnknown(node) => visitor.visit_is_unknown(node, ctx),
            PredicateNode::StartsWith(node) => visitor.visit_starts_with(node, ctx),
            PredicateNode::LikeRegex(node) => visitor.visit_like_regex(node, ctx),
        }
    }
}
