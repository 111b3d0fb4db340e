//! Logical SQL types and values.
//!
//! `SqlType` is the runtime type lattice used by bind-variable
//! unification; `Value` is the logical value carried by literals and
//! bind variables. The phantom marker types in [`marker`] tie the two
//! to the compile-time typed expression surface.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical SQL type of an expression or bind variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlType {
    Bool,
    Int,
    Float,
    Decimal,
    /// Supertype of `Int`, `Float` and `Decimal`.
    Number,
    Text,
    Uuid,
    Timestamp,
    /// Supertype of every type. Declared by untyped NULL literals.
    Any,
}

impl SqlType {
    /// Whether a value declared as `other` may be used where `self`
    /// is expected. Reflexive; `Any` accepts everything; `Number`
    /// accepts its numeric subtypes.
    pub fn accepts(self, other: SqlType) -> bool {
        if self == other {
            return true;
        }
        match self {
            SqlType::Any => true,
            SqlType::Number => matches!(
                other,
                SqlType::Int | SqlType::Float | SqlType::Decimal
            ),
            _ => false,
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SqlType::Bool => "bool",
            SqlType::Int => "int",
            SqlType::Float => "float",
            SqlType::Decimal => "decimal",
            SqlType::Number => "number",
            SqlType::Text => "text",
            SqlType::Uuid => "uuid",
            SqlType::Timestamp => "timestamp",
            SqlType::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// A logical value carried by a literal or a bind variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Fixed-point decimal
    Decimal(Decimal),
    /// String
    Text(String),
    /// UUID value
    Uuid(Uuid),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// The logical type of this value. NULL types as `Any`.
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Null => SqlType::Any,
            Value::Bool(_) => SqlType::Bool,
            Value::Int(_) => SqlType::Int,
            Value::Float(_) => SqlType::Float,
            Value::Decimal(_) => SqlType::Decimal,
            Value::Text(_) => SqlType::Text,
            Value::Uuid(_) => SqlType::Uuid,
            Value::Timestamp(_) => SqlType::Timestamp,
        }
    }

    /// Whether this value can be bound where `ty` is declared.
    /// NULL is an instance of every type.
    pub fn is_instance_of(&self, ty: SqlType) -> bool {
        matches!(self, Value::Null) || ty.accepts(self.sql_type())
    }
}

impl std::fmt::Display for Value {
    /// SQL literal text for this value.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Uuid(u) => write!(f, "'{}'", u),
            Value::Timestamp(t) => write!(f, "'{}'", t.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(opt: Option<V>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Compile-time markers for the typed expression surface.
///
/// Each marker names one `SqlType`; `Expr<T>` uses them as phantom
/// parameters so that comparisons across unrelated types fail to
/// compile instead of failing at render time.
pub mod marker {
    use super::SqlType;

    /// Maps a phantom marker to its runtime `SqlType`.
    pub trait SqlTyped {
        fn sql_type() -> SqlType;
    }

    /// Markers whose SQL type supports arithmetic.
    pub trait SqlNumeric: SqlTyped {}

    macro_rules! markers {
        ($($(#[$doc:meta])* $name:ident => $ty:ident),+ $(,)?) => {$(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name;

            impl SqlTyped for $name {
                fn sql_type() -> SqlType {
                    SqlType::$ty
                }
            }
        )+};
    }

    markers! {
        /// Boolean column or literal.
        Bool => Bool,
        /// 64-bit integer.
        Int => Int,
        /// Double-precision float.
        Float => Float,
        /// Fixed-point decimal.
        Dec => Decimal,
        /// Any numeric value; supertype of `Int`, `Float` and `Dec`.
        Num => Number,
        /// Character data.
        Text => Text,
        /// UUID.
        Uid => Uuid,
        /// UTC timestamp.
        Stamp => Timestamp,
    }

    impl SqlNumeric for Int {}
    impl SqlNumeric for Float {}
    impl SqlNumeric for Dec {}
    impl SqlNumeric for Num {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_accepts_int_but_not_text() {
        assert!(SqlType::Number.accepts(SqlType::Int));
        assert!(SqlType::Number.accepts(SqlType::Decimal));
        assert!(!SqlType::Number.accepts(SqlType::Text));
        assert!(!SqlType::Int.accepts(SqlType::Number));
    }

    #[test]
    fn null_is_instance_of_everything() {
        assert!(Value::Null.is_instance_of(SqlType::Int));
        assert!(Value::Null.is_instance_of(SqlType::Text));
        assert!(Value::Int(5).is_instance_of(SqlType::Number));
        assert!(!Value::Text("x".into()).is_instance_of(SqlType::Int));
    }

    #[test]
    fn text_literal_escapes_quotes() {
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
    }
}
