//! Item methods: `.type()`, `.size()`, `.double()` and friends.

use serde_json::{Map, Value};
use sqlpath_ir::ItemMethod;

use crate::datetime::parse_datetime;
use crate::error::{EvalResult, PathError};
use crate::item::{ItemType, JsonItem};
use crate::mode::Mode;
use crate::numeric::Numeric;

/// Applies `method` to a single item. Lax unwrapping of arrays is the
/// caller's job; by the time an item reaches here it is taken as is.
pub fn apply_method(method: &ItemMethod, item: &Value, mode: Mode) -> EvalResult<Vec<Value>> {
    let single = |value: Value| Ok(vec![value]);
    match method {
        ItemMethod::Type => single(Value::from(item.item_type().as_str())),
        ItemMethod::Size => match item.array_size() {
            Some(size) => single(Value::from(size)),
            None if mode.is_lax() => single(Value::from(1)),
            None => Err(PathError::type_error(format!(
                "size() applied to {} item",
                item.item_type().as_str()
            ))),
        },
        ItemMethod::Double => single(to_double(item)?.into_value()?),
        ItemMethod::Ceiling => single(number_operand(method, item)?.ceil().into_value()?),
        ItemMethod::Floor => single(number_operand(method, item)?.floor().into_value()?),
        ItemMethod::Abs => single(number_operand(method, item)?.abs()?.into_value()?),
        ItemMethod::Datetime { template } => {
            let text = item.as_text().ok_or_else(|| mismatch(method, item))?;
            let parsed = parse_datetime(text, template.as_ref())?;
            single(Value::String(parsed.to_string()))
        }
        ItemMethod::KeyValue => key_value(item).ok_or_else(|| mismatch(method, item)),
    }
}

fn mismatch(method: &ItemMethod, item: &Value) -> PathError {
    PathError::type_error(format!(
        "{}() is not applicable to {} item",
        method.name(),
        item.item_type().as_str()
    ))
}

fn number_operand(method: &ItemMethod, item: &Value) -> EvalResult<Numeric> {
    item.as_numeric().ok_or_else(|| mismatch(method, item))
}

fn to_double(item: &Value) -> EvalResult<Numeric> {
    match item.item_type() {
        ItemType::Number => item
            .as_numeric()
            .map(|n| Numeric::Double(n.as_f64()))
            .ok_or_else(|| PathError::arithmetic("number is not representable as a double")),
        ItemType::String => {
            let text = item.as_text().unwrap_or_default().trim();
            match text.parse::<f64>() {
                Ok(d) if d.is_finite() => Ok(Numeric::Double(d)),
                _ => Err(PathError::arithmetic(format!(
                    "'{}' is not a valid double",
                    text
                ))),
            }
        }
        other => Err(PathError::type_error(format!(
            "double() is not applicable to {} item",
            other.as_str()
        ))),
    }
}

fn key_value(item: &Value) -> Option<Vec<Value>> {
    let members = item.as_members()?;
    Some(
        members
            .iter()
            .enumerate()
            .map(|(id, (name, value))| {
                let mut entry = Map::with_capacity(3);
                entry.insert("name".to_string(), Value::String(name.clone()));
                entry.insert("value".to_string(), value.clone());
                entry.insert("id".to_string(), Value::from(id));
                Value::Object(entry)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlpath_ir::DatetimeTemplate;

    fn lax(method: ItemMethod, item: Value) -> EvalResult<Vec<Value>> {
        apply_method(&method, &item, Mode::Lax)
    }

    #[test]
    fn test_type_names() {
        assert_eq!(lax(ItemMethod::Type, json!(true)).unwrap(), vec![json!("boolean")]);
        assert_eq!(lax(ItemMethod::Type, json!([])).unwrap(), vec![json!("array")]);
    }

    #[test]
    fn test_size_of_non_array_depends_on_mode() {
        assert_eq!(lax(ItemMethod::Size, json!([1, 2, 3])).unwrap(), vec![json!(3)]);
        assert_eq!(lax(ItemMethod::Size, json!("x")).unwrap(), vec![json!(1)]);
        let err = apply_method(&ItemMethod::Size, &json!("x"), Mode::Strict).unwrap_err();
        assert!(matches!(err, PathError::Type(_)));
    }

    #[test]
    fn test_double_conversion() {
        assert_eq!(lax(ItemMethod::Double, json!(" 2.5 ")).unwrap(), vec![json!(2.5)]);
        assert_eq!(lax(ItemMethod::Double, json!(3)).unwrap(), vec![json!(3.0)]);
        assert!(matches!(
            lax(ItemMethod::Double, json!("abc")),
            Err(PathError::Arithmetic(_))
        ));
        assert!(matches!(
            lax(ItemMethod::Double, json!("inf")),
            Err(PathError::Arithmetic(_))
        ));
        assert!(matches!(lax(ItemMethod::Double, json!(null)), Err(PathError::Type(_))));
    }

    #[test]
    fn test_rounding_methods() {
        assert_eq!(lax(ItemMethod::Ceiling, json!(1.2)).unwrap(), vec![json!(2.0)]);
        assert_eq!(lax(ItemMethod::Floor, json!(7)).unwrap(), vec![json!(7)]);
        assert_eq!(lax(ItemMethod::Abs, json!(-4)).unwrap(), vec![json!(4)]);
        assert!(matches!(lax(ItemMethod::Abs, json!("4")), Err(PathError::Type(_))));
    }

    #[test]
    fn test_key_value_shape() {
        let out = lax(ItemMethod::KeyValue, json!({"b": 1, "a": [true]})).unwrap();
        assert_eq!(
            out,
            vec![
                json!({"name": "b", "value": 1, "id": 0}),
                json!({"name": "a", "value": [true], "id": 1}),
            ]
        );
        assert!(lax(ItemMethod::KeyValue, json!({})).unwrap().is_empty());
        assert!(matches!(lax(ItemMethod::KeyValue, json!(1)), Err(PathError::Type(_))));
    }

    #[test]
    fn test_datetime_method() {
        let method = ItemMethod::Datetime {
            template: Some(DatetimeTemplate::new("DD.MM.YYYY").unwrap()),
        };
        assert_eq!(lax(method, json!("01.02.2020")).unwrap(), vec![json!("2020-02-01")]);
        let plain = ItemMethod::Datetime { template: None };
        assert!(matches!(lax(plain.clone(), json!(5)), Err(PathError::Type(_))));
        assert!(matches!(lax(plain, json!("nope")), Err(PathError::Arithmetic(_))));
    }
}
