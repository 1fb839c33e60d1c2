//! Whole-tree validation.
//!
//! Node constructors check their own operands; this pass checks what only the
//! enclosing tree can tell: `@` must sit inside a filter predicate and `last`
//! inside an array subscript. It also re-checks the per-node rules, because
//! deserialized trees are built without going through the constructors.

use crate::error::IrError;
use crate::node::{
    ArithmeticBinary, ArithmeticUnary, ArrayAccessor, ArraySelection, DescendantMemberAccessor,
    Filter, Literal, MemberAccessor, MethodCall, NamedVariable, PathNode, WildcardMemberAccessor,
};
use crate::predicate::{
    Comparison, Conjunction, Disjunction, Exists, IsUnknown, LikeRegex, Negation, PredicateNode,
    StartsWith,
};
use crate::visitor::{PathVisitor, PredicateVisitor};

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_filter: bool,
    in_subscript: bool,
}

struct ScopeValidator;

type Checked = Result<(), IrError>;

pub fn validate_path(node: &PathNode) -> Checked {
    node.accept(&ScopeValidator, Scope::default())
}

pub fn validate_predicate(node: &PredicateNode) -> Checked {
    node.accept(&ScopeValidator, Scope::default())
}

impl<'n> PathVisitor<'n, Scope> for ScopeValidator {
    type Output = Checked;

    fn visit_context_variable(&self, _scope: Scope) -> Checked {
        Ok(())
    }

    fn visit_current_item(&self, scope: Scope) -> Checked {
        if scope.in_filter {
            Ok(())
        } else {
            Err(IrError::scope(
                "@",
                "the current item is only defined inside a filter predicate",
            ))
        }
    }

    fn visit_last_index(&self, scope: Scope) -> Checked {
        if scope.in_subscript {
            Ok(())
        } else {
            Err(IrError::scope(
                "last",
                "the last index is only defined inside an array subscript",
            ))
        }
    }

    fn visit_named_variable(&self, node: &'n NamedVariable, _scope: Scope) -> Checked {
        NamedVariable::new(node.name()).map(|_| ())
    }

    fn visit_literal(&self, node: &'n Literal, _scope: Scope) -> Checked {
        if node.value().is_array() || node.value().is_object() {
            return Err(IrError::invalid(
                "literal",
                "only null, boolean, number and string literals are allowed",
            ));
        }
        Ok(())
    }

    fn visit_member_accessor(&self, node: &'n MemberAccessor, scope: Scope) -> Checked {
        if node.key().is_empty() {
            return Err(IrError::invalid("member accessor", "member key is empty"));
        }
        node.base().accept(self, scope)
    }

    fn visit_wildcard_member_accessor(
        &self,
        node: &'n WildcardMemberAccessor,
        scope: Scope,
    ) -> Checked {
        node.base().accept(self, scope)
    }

    fn visit_descendant_member_accessor(
        &self,
        node: &'n DescendantMemberAccessor,
        scope: Scope,
    ) -> Checked {
        if node.key().is_empty() {
            return Err(IrError::invalid(
                "descendant member accessor",
                "member key is empty",
            ));
        }
        node.base().accept(self, scope)
    }

    fn visit_array_accessor(&self, node: &'n ArrayAccessor, scope: Scope) -> Checked {
        node.base().accept(self, scope)?;
        let ArraySelection::Subscripts(subscripts) = node.selection() else {
            return Ok(());
        };
        if subscripts.is_empty() {
            return Err(IrError::invalid(
                "array accessor",
                "at least one subscript is required",
            ));
        }
        let inner = Scope {
            in_subscript: true,
            ..scope
        };
        for subscript in subscripts {
            subscript.from().accept(self, inner)?;
            if let Some(to) = subscript.to() {
                to.accept(self, inner)?;
            }
        }
        Ok(())
    }

    fn visit_filter(&self, node: &'n Filter, scope: Scope) -> Checked {
        node.base().accept(self, scope)?;
        node.predicate().accept(
            self,
            Scope {
                in_filter: true,
                ..scope
            },
        )
    }

    fn visit_arithmetic_unary(&self, node: &'n ArithmeticUnary, scope: Scope) -> Checked {
        node.operand().accept(self, scope)
    }

    fn visit_arithmetic_binary(&self, node: &'n ArithmeticBinary, scope: Scope) -> Checked {
        node.left().accept(self, scope)?;
        node.right().accept(self, scope)
    }

    fn visit_method(&self, node: &'n MethodCall, scope: Scope) -> Checked {
        node.base().accept(self, scope)
    }
}

impl<'n> PredicateVisitor<'n, Scope> for ScopeValidator {
    type Output = Checked;

    fn visit_conjunction(&self, node: &'n Conjunction, scope: Scope) -> Checked {
        node.left().accept(self, scope)?;
        node.right().accept(self, scope)
    }

    fn visit_disjunction(&self, node: &'n Disjunction, scope: Scope) -> Checked {
        node.left().accept(self, scope)?;
        node.right().accept(self, scope)
    }

    fn visit_negation(&self, node: &'n Negation, scope: Scope) -> Checked {
        node.operand().accept(self, scope)
    }

    fn visit_comparison(&self, node: &'n Comparison, scope: Scope) -> Checked {
        node.left().accept(self, scope)?;
        node.right().accept(self, scope)
    }

    fn visit_exists(&self, node: &'n Exists, scope: Scope) -> Checked {
        node.operand().accept(self, scope)
    }

    fn visit_is_unknown(&self, node: &'n IsUnknown, scope: Scope) -> Checked {
        node.operand().accept(self, scope)
    }

    fn visit_starts_with(&self, node: &'n StartsWith, scope: Scope) -> Checked {
        node.whole().accept(self, scope)?;
        node.initial().accept(self, scope)
    }

    fn visit_like_regex(&self, node: &'n LikeRegex, scope: Scope) -> Checked {
        node.operand().accept(self, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Subscript;
    use crate::predicate::ComparisonOperator;

    #[test]
    fn test_current_item_outside_filter_rejected() {
        let path = PathNode::current_item().member("a").unwrap();
        let err = validate_path(&path).unwrap_err();
        assert!(matches!(err, IrError::Scope { symbol: "@", .. }));
    }

    #[test]
    fn test_current_item_inside_filter_accepted() {
        let path = PathNode::context().filter(PredicateNode::compare(
            ComparisonOperator::GreaterThan,
            PathNode::current_item(),
            PathNode::literal(2).unwrap(),
        ));
        assert!(validate_path(&path).is_ok());
    }

    #[test]
    fn test_last_only_inside_subscript() {
        let bad = PathNode::binary(
            crate::node::BinaryOperator::Add,
            PathNode::last(),
            PathNode::literal(1).unwrap(),
        );
        assert!(validate_path(&bad).is_err());

        let good = PathNode::context()
            .subscripts(vec![Subscript::at(PathNode::last())])
            .unwrap();
        assert!(validate_path(&good).is_ok());
    }

    #[test]
    fn test_filter_base_is_outside_filter_scope() {
        let path = PathNode::current_item().filter(PredicateNode::exists(PathNode::current_item()));
        assert!(validate_path(&path).is_err());
    }
}
