use crate::value::{Value, ValueError};
use time::OffsetDateTime;

///
/// Column
///
/// A scannable leaf: a type the decoder assigns a single cell into.
/// The decoder never recurses into a `Column` type.
///
/// `NILABLE` marks types with an absent representation of their own;
/// for those, a null cell zeroes the destination slot. A non-nilable
/// type may still accept `Value::Null` in its own `from_value` — that is
/// the opaque-scan capability, and its failures surface as scan errors.
///

pub trait Column: Sized {
    const NILABLE: bool = false;

    fn from_value(value: Value) -> Result<Self, ValueError>;

    /// Encode back into a cell; `Value::Null` encodes absence.
    fn to_value(&self) -> Value;
}

impl<T: Column> Column for Option<T> {
    const NILABLE: bool = true;

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl Column for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::Null => Err(ValueError::Null { ty: "bool" }),
            other => Err(ValueError::Mismatch {
                ty: "bool",
                got: other.kind_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Column for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(v) => Ok(v),
            Value::Null => Err(ValueError::Null { ty: "String" }),
            other => Err(ValueError::Mismatch {
                ty: "String",
                got: other.kind_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl Column for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Blob(v) => Ok(v),
            Value::Null => Err(ValueError::Null { ty: "Vec<u8>" }),
            other => Err(ValueError::Mismatch {
                ty: "Vec<u8>",
                got: other.kind_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }
}

impl Column for OffsetDateTime {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::Null => Err(ValueError::Null {
                ty: "OffsetDateTime",
            }),
            other => Err(ValueError::Mismatch {
                ty: "OffsetDateTime",
                got: other.kind_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl Column for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Null => Err(ValueError::Null { ty: "f64" }),
            other => Err(ValueError::Mismatch {
                ty: "f64",
                got: other.kind_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl Column for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value)
            .map(|v| v as Self)
            .map_err(|err| match err {
                ValueError::Null { .. } => ValueError::Null { ty: "f32" },
                ValueError::Mismatch { got, .. } => ValueError::Mismatch { ty: "f32", got },
                other => other,
            })
    }

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

// Integer impls accept both the signed and unsigned cell variant,
// range-checked into the destination width.
macro_rules! impl_column_int {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl Column for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(v) => Self::try_from(v).map_err(|_| ValueError::OutOfRange {
                            ty: stringify!($ty),
                            got: "int",
                        }),
                        Value::Uint(v) => Self::try_from(v).map_err(|_| ValueError::OutOfRange {
                            ty: stringify!($ty),
                            got: "uint",
                        }),
                        Value::Null => Err(ValueError::Null { ty: stringify!($ty) }),
                        other => Err(ValueError::Mismatch {
                            ty: stringify!($ty),
                            got: other.kind_name(),
                        }),
                    }
                }

                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }
            }
        )*
    };
}

impl_column_int!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_into_non_nilable_fails() {
        let err = String::from_value(Value::Null).unwrap_err();
        assert!(matches!(err, ValueError::Null { ty: "String" }));
    }

    #[test]
    fn null_into_option_zeroes() {
        let decoded = Option::<String>::from_value(Value::Null).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn option_of_option_assigns_through() {
        let decoded = Option::<Option<i64>>::from_value(Value::Int(3)).unwrap();
        assert_eq!(decoded, Some(Some(3)));

        let decoded = Option::<Option<i64>>::from_value(Value::Null).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn integers_cross_accept_in_range() {
        assert_eq!(u8::from_value(Value::Int(200)).unwrap(), 200);
        assert_eq!(i32::from_value(Value::Uint(7)).unwrap(), 7);

        let err = u8::from_value(Value::Int(-1)).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { ty: "u8", .. }));

        let err = i8::from_value(Value::Uint(1_000)).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { ty: "i8", .. }));
    }

    #[test]
    fn kind_mismatch_reports_both_sides() {
        let err = bool::from_value(Value::Text("t".to_string())).unwrap_err();
        assert!(matches!(
            err,
            ValueError::Mismatch {
                ty: "bool",
                got: "text"
            }
        ));
    }
}
