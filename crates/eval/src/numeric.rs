//! Exact integer and double-precision arithmetic over JSON numbers.

use std::cmp::Ordering;

use serde_json::{Number, Value};
use sqlpath_ir::{BinaryOperator, UnaryOperator};

use crate::error::{EvalResult, PathError};

/// A JSON number lifted into the arithmetic domain. Integers stay exact until
/// they meet a double.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Double(f64),
}

fn finite(value: f64, operation: &str) -> EvalResult<Numeric> {
    if value.is_finite() {
        Ok(Numeric::Double(value))
    } else {
        Err(PathError::arithmetic(format!(
            "{} produced a non-finite result",
            operation
        )))
    }
}

fn overflow(operation: &str) -> PathError {
    PathError::arithmetic(format!("integer overflow in {}", operation))
}

impl Numeric {
    pub fn from_number(number: &Number) -> Self {
        match number.as_i64() {
            Some(i) => Numeric::Integer(i),
            // u64 beyond i64::MAX and every float land here.
            None => Numeric::Double(number.as_f64().unwrap_or(f64::NAN)),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(i) => i as f64,
            Numeric::Double(d) => d,
        }
    }

    pub fn apply(self, operator: BinaryOperator, rhs: Numeric) -> EvalResult<Numeric> {
        match operator {
            BinaryOperator::Add => self.add(rhs),
            BinaryOperator::Subtract => self.sub(rhs),
            BinaryOperator::Multiply => self.mul(rhs),
            BinaryOperator::Divide => self.div(rhs),
            BinaryOperator::Modulus => self.rem(rhs),
        }
    }

    pub fn apply_unary(self, operator: UnaryOperator) -> EvalResult<Numeric> {
        match operator {
            UnaryOperator::Plus => Ok(self),
            UnaryOperator::Minus => self.neg(),
        }
    }

    pub fn add(self, rhs: Numeric) -> EvalResult<Numeric> {
        match (self, rhs) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a
                .checked_add(b)
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("addition")),
            (a, b) => finite(a.as_f64() + b.as_f64(), "addition"),
        }
    }

    pub fn sub(self, rhs: Numeric) -> EvalResult<Numeric> {
        match (self, rhs) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a
                .checked_sub(b)
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("subtraction")),
            (a, b) => finite(a.as_f64() - b.as_f64(), "subtraction"),
        }
    }

    pub fn mul(self, rhs: Numeric) -> EvalResult<Numeric> {
        match (self, rhs) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a
                .checked_mul(b)
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("multiplication")),
            (a, b) => finite(a.as_f64() * b.as_f64(), "multiplication"),
        }
    }

    /// Integer division truncates towards zero.
    pub fn div(self, rhs: Numeric) -> EvalResult<Numeric> {
        if rhs.is_zero() {
            return Err(PathError::division_by_zero());
        }
        match (self, rhs) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a
                .checked_div(b)
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("division")),
            (a, b) => finite(a.as_f64() / b.as_f64(), "division"),
        }
    }

    pub fn rem(self, rhs: Numeric) -> EvalResult<Numeric> {
        if rhs.is_zero() {
            return Err(PathError::division_by_zero());
        }
        match (self, rhs) {
            (Numeric::Integer(a), Numeric::Integer(b)) => a
                .checked_rem(b)
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("modulus")),
            (a, b) => finite(a.as_f64() % b.as_f64(), "modulus"),
        }
    }

    pub fn neg(self) -> EvalResult<Numeric> {
        match self {
            Numeric::Integer(i) => i
                .checked_neg()
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("negation")),
            Numeric::Double(d) => Ok(Numeric::Double(-d)),
        }
    }

    pub fn abs(self) -> EvalResult<Numeric> {
        match self {
            Numeric::Integer(i) => i
                .checked_abs()
                .map(Numeric::Integer)
                .ok_or_else(|| overflow("abs()")),
            Numeric::Double(d) => Ok(Numeric::Double(d.abs())),
        }
    }

    pub fn ceil(self) -> Numeric {
        match self {
            Numeric::Integer(_) => self,
            Numeric::Double(d) => Numeric::Double(d.ceil()),
        }
    }

    pub fn floor(self) -> Numeric {
        match self {
            Numeric::Integer(_) => self,
            Numeric::Double(d) => Numeric::Double(d.floor()),
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Numeric::Integer(i) => i == 0,
            Numeric::Double(d) => d == 0.0,
        }
    }

    /// Numeric ordering across representations; `None` when a NaN is involved.
    pub fn compare(self, other: Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Truncates towards zero for use as an array subscript.
    pub fn to_index(self) -> EvalResult<i64> {
        match self {
            Numeric::Integer(i) => Ok(i),
            Numeric::Double(d) if d.is_finite() && d.abs() < i64::MAX as f64 => Ok(d.trunc() as i64),
            Numeric::Double(d) => Err(PathError::type_error(format!(
                "array subscript {} is not a valid index",
                d
            ))),
        }
    }

    pub fn into_value(self) -> EvalResult<Value> {
        match self {
            Numeric::Integer(i) => Ok(Value::from(i)),
            Numeric::Double(d) => Number::from_f64(d).map(Value::Number).ok_or_else(|| {
                PathError::arithmetic(format!("{} cannot be represented as a JSON number", d))
            }),
        }
    }
}
