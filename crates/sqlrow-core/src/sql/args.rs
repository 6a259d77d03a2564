use crate::traits::{FieldKind, FieldMeta, FieldRef, Record, RecordDyn};
use crate::value::Value;
use derive_more::{Deref, DerefMut};

///
/// SqlArg
///
/// A named SQL argument.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlArg {
    pub name: String,
    pub value: Value,
}

impl SqlArg {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Whether the name fits the column grammar: dotted `\w+` segments,
    /// optionally double-quoted as a whole.
    #[must_use]
    pub fn is_valid_name(&self) -> bool {
        let name = self
            .name
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(&self.name);

        !name.is_empty()
            && name.split('.').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
            })
    }
}

///
/// SqlArgs
///
/// A sequence of named arguments with rendering helpers for the common
/// clause shapes. Usually obtained from [`record_args`].
///

#[derive(Clone, Debug, Default, Deref, DerefMut, PartialEq)]
pub struct SqlArgs(Vec<SqlArg>);

impl SqlArgs {
    /// The argument values, in order, for positional binding.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.0.iter().map(|arg| arg.value.clone()).collect()
    }

    /// Comma-separated quoted names: `"one", "two"`.
    #[must_use]
    pub fn names_string(&self) -> String {
        let mut out = String::new();
        for (index, arg) in self.0.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            push_quoted(&mut out, &arg.name);
        }
        out
    }

    /// Comma-separated positional placeholders: `$1, $2`.
    #[must_use]
    pub fn values_string(&self) -> String {
        let mut out = String::new();
        for index in 0..self.0.len() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push('$');
            out.push_str(&(index + 1).to_string());
        }
        out
    }

    /// An `insert` fragment: `("one", "two") values ($1, $2)`, or
    /// `default values` when empty.
    #[must_use]
    pub fn names_and_values_string(&self) -> String {
        if self.0.is_empty() {
            return "default values".to_string();
        }
        format!("({}) values ({})", self.names_string(), self.values_string())
    }

    /// An `update set` fragment: `"one" = $1, "two" = $2`.
    #[must_use]
    pub fn assignments_string(&self) -> String {
        let mut out = String::new();
        for (index, arg) in self.0.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            push_quoted(&mut out, &arg.name);
            out.push_str(" = $");
            out.push_str(&(index + 1).to_string());
        }
        out
    }

    /// A `where`/`join` fragment using null-safe equality:
    /// `"one" is not distinct from $1 and …`, or `true` when empty.
    #[must_use]
    pub fn conditions_string(&self) -> String {
        if self.0.is_empty() {
            return "true".to_string();
        }
        let mut out = String::new();
        for (index, arg) in self.0.iter().enumerate() {
            if index > 0 {
                out.push_str(" and ");
            }
            push_quoted(&mut out, &arg.name);
            out.push_str(" is not distinct from $");
            out.push_str(&(index + 1).to_string());
        }
        out
    }

    /// True when at least one argument satisfies the predicate.
    pub fn some(&self, fun: impl Fn(&SqlArg) -> bool) -> bool {
        self.0.iter().any(|arg| fun(arg))
    }

    /// True when every argument satisfies the predicate.
    pub fn every(&self, fun: impl Fn(&SqlArg) -> bool) -> bool {
        self.0.iter().all(|arg| fun(arg))
    }
}

impl From<Vec<SqlArg>> for SqlArgs {
    fn from(args: Vec<SqlArg>) -> Self {
        Self(args)
    }
}

impl FromIterator<SqlArg> for SqlArgs {
    fn from_iter<I: IntoIterator<Item = SqlArg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SqlArgs {
    type Item = SqlArg;
    type IntoIter = std::vec::IntoIter<SqlArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Collect a record's root-level leaf fields (flattened records
/// included) as named arguments. Nested records contribute none: they
/// have no scalar cell of their own.
#[must_use]
pub fn record_args<R: Record>(record: &R) -> SqlArgs {
    let mut args = SqlArgs::default();
    collect_args(R::fields(), record, &mut args);
    args
}

fn collect_args(fields: &'static [FieldMeta], record: &dyn RecordDyn, out: &mut SqlArgs) {
    for (index, meta) in fields.iter().enumerate() {
        match (meta.kind, record.field_ref(index)) {
            (FieldKind::Leaf { .. }, FieldRef::Leaf(slot)) => {
                if meta.tag.is_empty() || meta.tag == "-" {
                    continue;
                }
                out.push(SqlArg {
                    name: meta.tag.to_string(),
                    value: slot.to_value(),
                });
            }
            (FieldKind::Flattened { fields }, FieldRef::Flattened(inner)) => {
                collect_args(fields(), inner, out);
            }
            _ => {}
        }
    }
}

fn push_quoted(out: &mut String, name: &str) {
    out.push('"');
    out.push_str(name);
    out.push('"');
}
