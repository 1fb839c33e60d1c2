use serde_json::{Deserializer, Map, Value};
use sqlpath::{JsonPathQuery, QueryError};
use std::env;
use std::fs;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Reads every JSON value in `text`, so a file may hold one document or a
/// stream of rows.
fn read_rows(text: &str) -> Result<Vec<Value>, QueryError> {
    Deserializer::from_str(text)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .map_err(QueryError::from)
}

fn read_bindings(path: Option<&String>) -> Result<Map<String, Value>, QueryError> {
    let Some(path) = path else {
        return Ok(Map::new());
    };
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("sqlpath", String::as_str)
}

/// Evaluates a serialized query against a JSON input and prints the result
/// items as JSON lines.
fn main() -> Result<(), QueryError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if !(3..=4).contains(&args.len()) {
        eprintln!("Evaluates a serialized SQL/JSON path query against JSON input.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/query.json> <path/to/input.json> [path/to/vars.json]",
            program_name(&args)
        );
        eprintln!();
        eprintln!("The query file holds {{\"mode\": \"lax\"|\"strict\", \"path\": {{...}}}}.");
        eprintln!("The input file may hold several JSON values; each is evaluated as a row.");
        std::process::exit(1);
    }

    let query = JsonPathQuery::from_json(&fs::read_to_string(&args[1])?)?;
    log::info!("Loaded query {}", query);

    let rows = read_rows(&fs::read_to_string(&args[2])?)?;
    let bindings = read_bindings(args.get(3))?;
    log::debug!("Evaluating {} row(s) with {} binding(s)", rows.len(), bindings.len());

    let mut failures = 0;
    for (row, result) in query.query_rows(&rows, &bindings).into_iter().enumerate() {
        match result {
            Ok(items) => {
                for item in items {
                    println!("{}", serde_json::to_string(&item)?);
                }
            }
            Err(err) => {
                log::error!("Row {} failed: {}", row, err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} row(s) failed", failures, rows.len());
        std::process::exit(2);
    }
    Ok(())
}
