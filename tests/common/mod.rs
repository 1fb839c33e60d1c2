pub mod fixtures;

use serde_json::Value;
use sqlpath::eval::{EvalResult, Truth, evaluate_predicate, evaluate_sequence};
use sqlpath::{Mode, NoBindings, PathNode, PredicateNode};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn lax(path: &PathNode, input: &Value) -> EvalResult<Vec<Value>> {
    evaluate_sequence(path, input, Mode::Lax, &NoBindings)
}

pub fn strict(path: &PathNode, input: &Value) -> EvalResult<Vec<Value>> {
    evaluate_sequence(path, input, Mode::Strict, &NoBindings)
}

pub fn truth(predicate: &PredicateNode, input: &Value, mode: Mode) -> EvalResult<Truth> {
    evaluate_predicate(predicate, input, mode, &NoBindings)
}

/// Asserts that a strict evaluation failed with the given error kind.
#[macro_export]
macro_rules! assert_fails_with {
    ($result:expr, $kind:expr) => {
        match $result {
            Err(err) => assert_eq!(err.kind(), $kind, "unexpected error: {}", err),
            Ok(items) => panic!("expected {:?}, got {:?}", $kind, items),
        }
    };
}
