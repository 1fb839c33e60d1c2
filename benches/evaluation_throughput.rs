//! Per-row evaluation throughput.
//!
//! Measures a compiled query evaluated against many rows with varying:
//! - Row counts (1, 100, 10000)
//! - Modes (lax, strict)
//! - Tree shapes (accessor chain, filter with predicates, arithmetic)
//!
//! Run benchmarks: `cargo bench --bench evaluation_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use sqlpath::ir::{BinaryOperator, ComparisonOperator, PathNode, PredicateNode};
use sqlpath::{IrError, JsonPathQuery, Mode, NoBindings};
use std::hint::black_box;

fn generate_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "customer": {"name": format!("Customer {}", i), "tier": i % 3},
                "lines": [
                    {"sku": "A", "qty": i % 7, "price": 9.5},
                    {"sku": "B", "qty": 2, "price": (i % 50) as f64},
                    {"sku": "C", "qty": 1, "price": 120.0}
                ]
            })
        })
        .collect()
}

fn accessor_chain() -> Result<PathNode, IrError> {
    PathNode::context().member("customer")?.member("name")
}

fn line_filter() -> Result<PathNode, IrError> {
    PathNode::context()
        .member("lines")?
        .wildcard_array()
        .filter(PredicateNode::and(
            PredicateNode::compare(
                ComparisonOperator::GreaterThan,
                PathNode::current_item().member("price")?,
                PathNode::literal(10)?,
            ),
            PredicateNode::starts_with(
                PathNode::current_item().member("sku")?,
                PathNode::literal("B")?,
            ),
        ))
        .member("qty")
}

fn line_total() -> Result<PathNode, IrError> {
    Ok(PathNode::binary(
        BinaryOperator::Multiply,
        PathNode::context().member("lines")?.index(0).member("qty")?,
        PathNode::context().member("lines")?.index(0).member("price")?,
    ))
}

fn benchmark_tree_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_shapes");
    let rows = generate_rows(1000);
    group.throughput(Throughput::Elements(rows.len() as u64));

    let shapes = [
        ("accessor_chain", accessor_chain()),
        ("line_filter", line_filter()),
        ("line_total", line_total()),
    ];
    for (name, tree) in shapes {
        let query = JsonPathQuery::compile(tree.expect("benchmark tree"), Mode::Lax)
            .expect("benchmark query");
        group.bench_with_input(BenchmarkId::from_parameter(name), &rows, |b, rows| {
            b.iter(|| {
                for row in rows {
                    black_box(query.query(row, &NoBindings).expect("evaluation"));
                }
            })
        });
    }
    group.finish();
}

fn benchmark_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("mode");
    let rows = generate_rows(1000);
    let tree = line_filter().expect("benchmark tree");

    for mode in [Mode::Lax, Mode::Strict] {
        let query = JsonPathQuery::compile(tree.clone(), mode).expect("benchmark query");
        group.bench_with_input(BenchmarkId::from_parameter(mode), &rows, |b, rows| {
            b.iter(|| {
                for row in rows {
                    black_box(query.query(row, &NoBindings).expect("evaluation"));
                }
            })
        });
    }
    group.finish();
}

fn benchmark_row_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_rows");
    let query = JsonPathQuery::compile(line_filter().expect("benchmark tree"), Mode::Lax)
        .expect("benchmark query");

    for count in [1, 100, 10_000] {
        let rows = generate_rows(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &rows, |b, rows| {
            b.iter(|| black_box(query.query_rows(rows, &NoBindings)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_tree_shapes,
    benchmark_modes,
    benchmark_row_counts
);
criterion_main!(benches);
