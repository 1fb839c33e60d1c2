mod common;

use common::fixtures::*;
use common::{TestResult, init_logging};
use serde_json::json;
use sqlpath::eval::config::DEFAULT_MAX_DEPTH;
use sqlpath::ir::{BinaryOperator, ComparisonOperator};
use sqlpath::{
    ErrorKind, Evaluator, EvaluatorConfig, JsonPathQuery, Mode, NoBindings, PathError, PathNode,
    PredicateNode,
};
use std::sync::Arc;
use std::thread;

fn nested_sum(depth: usize) -> PathNode {
    (0..depth).fold(lit(1), |acc, _| {
        PathNode::binary(BinaryOperator::Add, acc, lit(1))
    })
}

#[test]
fn test_depth_guard_rejects_deep_trees() {
    init_logging();
    let path = nested_sum(300);
    let err = Evaluator::default()
        .evaluate_sequence(&path, &json!(null), Mode::Lax, &NoBindings)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EvaluationDepthExceeded);
    assert_eq!(
        err,
        PathError::DepthExceeded {
            limit: DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn test_depth_guard_is_configurable() -> TestResult {
    init_logging();
    let path = nested_sum(300);
    let evaluator = Evaluator::new(EvaluatorConfig::default().with_max_depth(1024));
    let items = evaluator.evaluate_sequence(&path, &json!(null), Mode::Strict, &NoBindings)?;
    assert_eq!(items, vec![json!(301)]);
    Ok(())
}

#[test]
fn test_depth_guard_counts_predicates() {
    init_logging();
    let mut predicate = PredicateNode::exists(PathNode::context());
    for _ in 0..40 {
        predicate = PredicateNode::not(predicate);
    }
    let evaluator = Evaluator::new(EvaluatorConfig::default().with_max_depth(16));
    let result = evaluator.evaluate_predicate(&predicate, &json!(1), Mode::Lax, &NoBindings);
    assert_eq!(result, Err(PathError::DepthExceeded { limit: 16 }));
}

#[test]
fn test_repeated_evaluation_is_idempotent() -> TestResult {
    init_logging();
    let query = JsonPathQuery::compile(kitchen_sink(), Mode::Lax)?;
    let mut bindings = serde_json::Map::new();
    bindings.insert("limit".to_string(), json!(15));

    let first = query.query(&store(), &bindings)?;
    for _ in 0..5 {
        assert_eq!(query.query(&store(), &bindings)?, first);
    }
    Ok(())
}

#[test]
fn test_shared_tree_across_threads() -> TestResult {
    init_logging();
    let query = Arc::new(JsonPathQuery::compile(
        PathNode::context().wildcard_array().filter(compare(
            ComparisonOperator::GreaterThanOrEqual,
            PathNode::current_item(),
            lit(50),
        )),
        Mode::Strict,
    )?);

    let handles: Vec<_> = (0..4)
        .map(|offset| {
            let query = Arc::clone(&query);
            thread::spawn(move || {
                let input = json!((0..100).map(|i| i + offset).collect::<Vec<_>>());
                query.query(&input, &NoBindings).map(|items| items.len())
            })
        })
        .collect();

    for (offset, handle) in handles.into_iter().enumerate() {
        let count = handle.join().expect("worker panicked")?;
        assert_eq!(count, 50 + offset);
    }
    Ok(())
}

#[test]
fn test_mode_is_per_call() -> TestResult {
    init_logging();
    let path = Arc::new(sqlpath::IrJsonPath::new(member(PathNode::context(), "a").index(0))?);
    let lax = JsonPathQuery::from_shared(Arc::clone(&path), Mode::Lax);
    let strict = lax.clone().with_mode(Mode::Strict);

    let input = json!({"a": "x"});
    assert_eq!(lax.query(&input, &NoBindings)?, vec![json!("x")]);
    let err = strict.query(&input, &NoBindings).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::StructuralError));
    Ok(())
}
