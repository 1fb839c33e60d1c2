use serde_json::{Value, json};
use sqlpath::ir::{
    BinaryOperator, ComparisonOperator, ItemMethod, PathNode, PredicateNode, Subscript,
};

pub fn lit(value: impl Into<Value>) -> PathNode {
    PathNode::literal(value).expect("scalar literal")
}

pub fn member(base: PathNode, key: &str) -> PathNode {
    base.member(key).expect("non-empty key")
}

/// `$.a.b.c` for the given keys.
pub fn chain(keys: &[&str]) -> PathNode {
    keys.iter()
        .fold(PathNode::context(), |path, key| member(path, key))
}

pub fn compare(operator: ComparisonOperator, left: PathNode, right: PathNode) -> PredicateNode {
    PredicateNode::compare(operator, left, right)
}

pub fn store() -> Value {
    json!({
        "store": {
            "book": [
                {"title": "Sayings", "author": "Nigel", "price": 8.95, "tags": ["wit"]},
                {"title": "Sword", "author": "Evelyn", "price": 12.99},
                {"title": "Moby", "author": "Herman", "price": 8.99, "isbn": "0-553"},
                {"title": "Rings", "author": "J. R. R.", "price": 22.99, "isbn": "0-395"}
            ],
            "bicycle": {"color": "red", "price": 19.95}
        },
        "limit": 10
    })
}

/// A tree exercising every node kind, for interchange checks.
pub fn kitchen_sink() -> PathNode {
    let books = chain(&["store", "book"]);
    let cheap = compare(
        ComparisonOperator::LessThan,
        member(PathNode::current_item(), "price"),
        PathNode::binary(
            BinaryOperator::Multiply,
            PathNode::variable("limit").expect("valid name"),
            lit(1),
        ),
    );
    let titled = PredicateNode::or(
        PredicateNode::starts_with(member(PathNode::current_item(), "title"), lit("S")),
        PredicateNode::like_regex(member(PathNode::current_item(), "title"), "^m", Some("i"))
            .expect("valid regex"),
    );
    let with_isbn = PredicateNode::not(PredicateNode::is_unknown(PredicateNode::exists(
        member(PathNode::current_item(), "isbn"),
    )));
    books
        .subscripts(vec![
            Subscript::at(lit(0)),
            Subscript::range(lit(1), PathNode::last()),
        ])
        .expect("subscripts")
        .filter(PredicateNode::and(PredicateNode::and(cheap, titled), with_isbn))
        .wildcard_member()
        .method(ItemMethod::Type)
}
