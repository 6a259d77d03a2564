use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use time::OffsetDateTime;

///
/// Value
///
/// A driver-decoded cell, and the positional-parameter type accepted by
/// cursor providers.
///
/// Null → the column was SQL null. Distinct from every zero value, so a
/// row buffer slot can always tell "absent" from "default".
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(OffsetDateTime),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Variant name for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Take the value out of a row-buffer slot, leaving `Null` behind.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Null)
    }
}

// impl_value_from
macro_rules! impl_value_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(value: $type) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    f32 => Float,
    f64 => Float,
    String => Text,
    Vec<u8> => Blob,
    OffsetDateTime => Timestamp,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

///
/// ValueError
///
/// Why a single cell could not be decoded into a leaf type. The row
/// decoder maps `Null` to the null-column error and everything else to a
/// scan error.
///

#[derive(Debug, ThisError)]
pub enum ValueError {
    #[error("column was null, but `{ty}` cannot represent null")]
    Null { ty: &'static str },

    #[error("cannot decode {got} value into `{ty}`")]
    Mismatch { ty: &'static str, got: &'static str },

    #[error("{got} value out of range for `{ty}`")]
    OutOfRange { ty: &'static str, got: &'static str },

    #[error("{0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_leaves_null_behind() {
        let mut cell = Value::Text("blah".to_string());
        assert_eq!(cell.take(), Value::Text("blah".to_string()));
        assert!(cell.is_null());
    }

    #[test]
    fn from_conversions() {
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(7u8), Value::Uint(7));
        assert_eq!(Value::from("blah"), Value::Text("blah".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Blob(vec![1]).kind_name(), "blob");
        assert_eq!(Value::Float(1.5).kind_name(), "float");
    }
}
