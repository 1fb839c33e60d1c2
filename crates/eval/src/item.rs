//! Navigation over JSON items.
//!
//! The evaluator never matches on [`Value`] shapes for type names or numeric
//! conversion directly; it goes through [`JsonItem`] so the rules for what
//! counts as a number or a string live in one place.

use serde_json::{Map, Value};

use crate::numeric::Numeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ItemType {
    /// The name reported by the `type()` item method.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Null => "null",
            ItemType::Boolean => "boolean",
            ItemType::Number => "number",
            ItemType::String => "string",
            ItemType::Array => "array",
            ItemType::Object => "object",
        }
    }
}

pub trait JsonItem {
    fn item_type(&self) -> ItemType;
    fn as_numeric(&self) -> Option<Numeric>;
    fn as_text(&self) -> Option<&str>;
    fn as_members(&self) -> Option<&Map<String, Value>>;
    fn as_elements(&self) -> Option<&[Value]>;

    fn object_get(&self, key: &str) -> Option<&Value> {
        self.as_members().and_then(|members| members.get(key))
    }

    fn array_get(&self, index: usize) -> Option<&Value> {
        self.as_elements().and_then(|elements| elements.get(index))
    }

    fn array_size(&self) -> Option<usize> {
        self.as_elements().map(<[Value]>::len)
    }

    fn is_scalar(&self) -> bool {
        !matches!(self.item_type(), ItemType::Array | ItemType::Object)
    }
}

impl JsonItem for Value {
    fn item_type(&self) -> ItemType {
        match self {
            Value::Null => ItemType::Null,
            Value::Bool(_) => ItemType::Boolean,
            Value::Number(_) => ItemType::Number,
            Value::String(_) => ItemType::String,
            Value::Array(_) => ItemType::Array,
            Value::Object(_) => ItemType::Object,
        }
    }

    fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Value::Number(n) => Some(Numeric::from_number(n)),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn as_members(&self) -> Option<&Map<String, Value>> {
        self.as_object()
    }

    fn as_elements(&self) -> Option<&[Value]> {
        self.as_array().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_types() {
        assert_eq!(json!(null).item_type().as_str(), "null");
        assert_eq!(json!(1.5).item_type().as_str(), "number");
        assert_eq!(json!({"a": 1}).item_type().as_str(), "object");
        assert!(json!("x").is_scalar());
        assert!(!json!([1]).is_scalar());
    }

    #[test]
    fn test_navigation() {
        let item = json!({"a": [10, 20]});
        let array = item.object_get("a").unwrap();
        assert_eq!(array.array_size(), Some(2));
        assert_eq!(array.array_get(1), Some(&json!(20)));
        assert_eq!(array.array_get(2), None);
        assert_eq!(item.object_get("b"), None);
        assert_eq!(json!(5).object_get("a"), None);
    }
}
