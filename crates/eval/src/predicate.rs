//! The predicate evaluator: comparisons, connectives and tests under
//! three-valued logic.
//!
//! Structural and type errors raised while evaluating a predicate's operands
//! never escape as failures; they make the predicate UNKNOWN (or FALSE for
//! `exists` in lax mode). Every other error propagates.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;
use sqlpath_ir::{
    Comparison, ComparisonOperator, Conjunction, Disjunction, Exists, IsUnknown, LikeRegex,
    Negation, PathNode, PredicateVisitor, StartsWith,
};

use crate::engine::{EvaluationContext, Scope, Sequence};
use crate::error::EvalResult;
use crate::item::JsonItem;
use crate::truth::Truth;

impl<'a> EvaluationContext<'a> {
    /// `None` when the operand raised a suppressible error.
    fn operand(&self, node: &'a PathNode, scope: Scope<'a>) -> EvalResult<Option<Sequence<'a>>> {
        match self.eval_path(node, scope) {
            Ok(items) => Ok(Some(items)),
            Err(err) if err.is_suppressible() => {
                log::debug!("predicate operand {} is unknown: {}", node, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// A predicate operand that must be exactly one item after lax unwrapping.
    fn single_operand(
        &self,
        node: &'a PathNode,
        scope: Scope<'a>,
    ) -> EvalResult<Option<Cow<'a, Value>>> {
        let Some(items) = self.operand(node, scope)? else {
            return Ok(None);
        };
        let mut items = self.unwrap_arrays(items);
        if items.len() == 1 {
            Ok(items.pop())
        } else {
            Ok(None)
        }
    }
}

fn holds(operator: ComparisonOperator, ordering: Ordering) -> bool {
    match operator {
        ComparisonOperator::Equal => ordering == Ordering::Equal,
        ComparisonOperator::NotEqual => ordering != Ordering::Equal,
        ComparisonOperator::LessThan => ordering == Ordering::Less,
        ComparisonOperator::LessThanOrEqual => ordering != Ordering::Greater,
        ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
        ComparisonOperator::GreaterThanOrEqual => ordering != Ordering::Less,
    }
}

/// Compares two scalar items. Anything not comparable is UNKNOWN.
pub fn compare_items(operator: ComparisonOperator, left: &Value, right: &Value) -> Truth {
    let equality = matches!(
        operator,
        ComparisonOperator::Equal | ComparisonOperator::NotEqual
    );
    let ordering = match (left, right) {
        (Value::Null, Value::Null) if equality => Ordering::Equal,
        (Value::Null, _) | (_, Value::Null) if equality => Ordering::Less,
        (Value::Null, _) | (_, Value::Null) => return Truth::Unknown,
        (Value::Number(_), Value::Number(_)) => {
            match left
                .as_numeric()
                .zip(right.as_numeric())
                .and_then(|(l, r)| l.compare(r))
            {
                Some(ordering) => ordering,
                None => return Truth::Unknown,
            }
        }
        (Value::String(l), Value::String(r)) => l.as_str().cmp(r.as_str()),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => return Truth::Unknown,
    };
    Truth::from(holds(operator, ordering))
}

impl<'a> PredicateVisitor<'a, Scope<'a>> for EvaluationContext<'a> {
    type Output = EvalResult<Truth>;

    fn visit_conjunction(&self, node: &'a Conjunction, scope: Scope<'a>) -> Self::Output {
        let left = self.eval_predicate(node.left(), scope)?;
        let right = self.eval_predicate(node.right(), scope)?;
        Ok(left.and(right))
    }

    fn visit_disjunction(&self, node: &'a Disjunction, scope: Scope<'a>) -> Self::Output {
        let left = self.eval_predicate(node.left(), scope)?;
        let right = self.eval_predicate(node.right(), scope)?;
        Ok(left.or(right))
    }

    fn visit_negation(&self, node: &'a Negation, scope: Scope<'a>) -> Self::Output {
        Ok(self.eval_predicate(node.operand(), scope)?.not())
    }

    fn visit_comparison(&self, node: &'a Comparison, scope: Scope<'a>) -> Self::Output {
        let left = self.single_operand(node.left(), scope)?;
        let right = self.single_operand(node.right(), scope)?;
        Ok(match (left, right) {
            (Some(l), Some(r)) => compare_items(node.operator(), &l, &r),
            _ => Truth::Unknown,
        })
    }

    fn visit_exists(&self, node: &'a Exists, scope: Scope<'a>) -> Self::Output {
        match self.operand(node.operand(), scope)? {
            Some(items) => Ok(Truth::from(!items.is_empty())),
            None if self.mode().is_lax() => Ok(Truth::False),
            None => Ok(Truth::Unknown),
        }
    }

    fn visit_is_unknown(&self, node: &'a IsUnknown, scope: Scope<'a>) -> Self::Output {
        let truth = self.eval_predicate(node.operand(), scope)?;
        Ok(Truth::from(truth.is_unknown()))
    }

    fn visit_starts_with(&self, node: &'a StartsWith, scope: Scope<'a>) -> Self::Output {
        let whole = self.single_operand(node.whole(), scope)?;
        let initial = self.single_operand(node.initial(), scope)?;
        let (Some(whole), Some(initial)) = (whole, initial) else {
            return Ok(Truth::Unknown);
        };
        Ok(match (whole.as_text(), initial.as_text()) {
            (Some(whole), Some(initial)) => Truth::from(whole.starts_with(initial)),
            _ => Truth::Unknown,
        })
    }

    fn visit_like_regex(&self, node: &'a LikeRegex, scope: Scope<'a>) -> Self::Output {
        let Some(item) = self.single_operand(node.operand(), scope)? else {
            return Ok(Truth::Unknown);
        };
        Ok(match item.as_text() {
            Some(text) => Truth::from(node.regex().is_match(text)),
            None => Truth::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::NoBindings;
    use crate::engine::evaluate_predicate;
    use crate::error::PathError;
    use crate::mode::Mode;
    use serde_json::json;
    use sqlpath_ir::{BinaryOperator, PredicateNode};

    fn lit(value: Value) -> PathNode {
        PathNode::literal(value).unwrap()
    }

    fn member(key: &str) -> PathNode {
        PathNode::context().member(key).unwrap()
    }

    fn eval(predicate: &PredicateNode, input: Value, mode: Mode) -> EvalResult<Truth> {
        evaluate_predicate(predicate, &input, mode, &NoBindings)
    }

    #[test]
    fn test_compare_scalars() {
        use ComparisonOperator::*;
        assert_eq!(compare_items(Equal, &json!(1), &json!(1.0)), Truth::True);
        assert_eq!(compare_items(LessThan, &json!("abc"), &json!("abd")), Truth::True);
        assert_eq!(compare_items(GreaterThan, &json!(true), &json!(false)), Truth::True);
        assert_eq!(compare_items(Equal, &json!(null), &json!(null)), Truth::True);
        assert_eq!(compare_items(Equal, &json!(null), &json!(0)), Truth::False);
        assert_eq!(compare_items(NotEqual, &json!("a"), &json!(null)), Truth::True);
        assert_eq!(compare_items(LessThan, &json!(null), &json!(1)), Truth::Unknown);
        assert_eq!(compare_items(Equal, &json!(1), &json!("1")), Truth::Unknown);
        assert_eq!(compare_items(Equal, &json!([1]), &json!([1])), Truth::Unknown);
    }

    #[test]
    fn test_comparison_with_empty_operand_is_unknown() {
        let predicate = PredicateNode::compare(ComparisonOperator::Equal, member("a"), lit(json!(5)));
        for mode in [Mode::Lax, Mode::Strict] {
            assert_eq!(eval(&predicate, json!({}), mode).unwrap(), Truth::Unknown);
        }
    }

    #[test]
    fn test_comparison_swallows_structural_errors() {
        let predicate = PredicateNode::compare(ComparisonOperator::Equal, member("a"), lit(json!(5)));
        assert_eq!(eval(&predicate, json!(3), Mode::Strict).unwrap(), Truth::Unknown);
    }

    #[test]
    fn test_comparison_unwraps_in_lax_mode() {
        let predicate = PredicateNode::compare(ComparisonOperator::Equal, member("a"), lit(json!(5)));
        assert_eq!(eval(&predicate, json!({"a": [5]}), Mode::Lax).unwrap(), Truth::True);
        assert_eq!(eval(&predicate, json!({"a": [5]}), Mode::Strict).unwrap(), Truth::Unknown);
        assert_eq!(eval(&predicate, json!({"a": [5, 5]}), Mode::Lax).unwrap(), Truth::Unknown);
    }

    #[test]
    fn test_exists() {
        let missing = PredicateNode::exists(member("a"));
        for mode in [Mode::Lax, Mode::Strict] {
            assert_eq!(eval(&missing, json!({}), mode).unwrap(), Truth::False);
            assert_eq!(eval(&missing, json!({"a": null}), mode).unwrap(), Truth::True);
        }
        // Structural error under the operand.
        assert_eq!(eval(&missing, json!(7), Mode::Lax).unwrap(), Truth::False);
        assert_eq!(eval(&missing, json!(7), Mode::Strict).unwrap(), Truth::Unknown);
    }

    #[test]
    fn test_fatal_errors_propagate_from_predicates() {
        let division = PathNode::binary(BinaryOperator::Divide, lit(json!(1)), lit(json!(0)));
        let predicate = PredicateNode::exists(division);
        for mode in [Mode::Lax, Mode::Strict] {
            assert!(matches!(eval(&predicate, json!(null), mode), Err(PathError::Arithmetic(_))));
        }
    }

    #[test]
    fn test_connectives_evaluate_both_sides() {
        let always_false = PredicateNode::compare(ComparisonOperator::Equal, lit(json!(1)), lit(json!(2)));
        let unbound = PredicateNode::exists(PathNode::variable("nope").unwrap());
        let and = PredicateNode::and(always_false.clone(), unbound.clone());
        assert!(matches!(
            eval(&and, json!(null), Mode::Lax),
            Err(PathError::UnboundVariable { .. })
        ));
        let or = PredicateNode::or(PredicateNode::not(always_false), unbound);
        assert!(eval(&or, json!(null), Mode::Lax).is_err());
    }

    #[test]
    fn test_is_unknown_and_negation() {
        let unknown = PredicateNode::compare(ComparisonOperator::LessThan, lit(json!("a")), lit(json!(1)));
        assert_eq!(eval(&PredicateNode::not(unknown.clone()), json!(null), Mode::Lax).unwrap(), Truth::Unknown);
        let test = PredicateNode::is_unknown(unknown);
        assert_eq!(eval(&test, json!(null), Mode::Lax).unwrap(), Truth::True);
        let known = PredicateNode::is_unknown(PredicateNode::exists(PathNode::context()));
        assert_eq!(eval(&known, json!(null), Mode::Lax).unwrap(), Truth::False);
    }

    #[test]
    fn test_starts_with() {
        let predicate = PredicateNode::starts_with(member("s"), lit(json!("ab")));
        assert_eq!(eval(&predicate, json!({"s": "abc"}), Mode::Strict).unwrap(), Truth::True);
        assert_eq!(eval(&predicate, json!({"s": "xab"}), Mode::Strict).unwrap(), Truth::False);
        assert_eq!(eval(&predicate, json!({"s": 1}), Mode::Strict).unwrap(), Truth::Unknown);
        assert_eq!(eval(&predicate, json!({}), Mode::Strict).unwrap(), Truth::Unknown);
    }

    #[test]
    fn test_like_regex() {
        let predicate = PredicateNode::like_regex(member("s"), "^ab+c$", Some("i")).unwrap();
        assert_eq!(eval(&predicate, json!({"s": "ABBC"}), Mode::Lax).unwrap(), Truth::True);
        assert_eq!(eval(&predicate, json!({"s": "ac"}), Mode::Lax).unwrap(), Truth::False);
        assert_eq!(eval(&predicate, json!({"s": ["abc", "x"]}), Mode::Lax).unwrap(), Truth::Unknown);
        assert_eq!(eval(&predicate, json!({"s": true}), Mode::Lax).unwrap(), Truth::Unknown);
    }
}
