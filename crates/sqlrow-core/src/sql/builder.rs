use crate::cursor::CursorProvider;
use crate::error::{Error, ErrorCode};
use crate::query;
use crate::sql::columns_of;
use crate::traits::{Column, Record};
use crate::value::Value;

///
/// SqlQuery
///
/// Text-oriented query builder. Appending renumbers `$N` placeholders by
/// the arguments already collected, so every chunk can number its own
/// parameters from `$1`:
///
/// ```
/// use sqlrow_core::sql::SqlQuery;
/// use sqlrow_core::value::Value;
///
/// let mut query = SqlQuery::new();
/// query.append("select * from some_table where one = $1", &[Value::Int(10)]);
/// query.append("and two = $1", &[Value::Int(20)]);
///
/// assert_eq!(
///     query.text,
///     "select * from some_table where one = $1\nand two = $2"
/// );
/// ```
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlQuery {
    pub text: String,
    pub args: Vec<Value>,
}

impl SqlQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append SQL, renumbering its `$N` placeholders and collecting its
    /// arguments. Inserts a newline when neither side provides one.
    pub fn append(&mut self, chunk: &str, args: &[Value]) {
        let chunk = renumber_placeholders(chunk, self.args.len());
        if !self.text.is_empty() && !whitespace_between(&self.text, &chunk) {
            self.text.push('\n');
        }
        self.text.push_str(&chunk);
        self.args.extend_from_slice(args);
    }

    /// [`append`](Self::append), but only when the argument is not null.
    pub fn maybe_append(&mut self, chunk: &str, arg: Value) {
        if !arg.is_null() {
            self.append(chunk, &[arg]);
        }
    }

    /// Append SQL with named `:ident` parameters, replacing each with a
    /// positional `$N` placeholder. `::` passes through untouched (cast
    /// syntax). A parameter missing from `named` is
    /// [`ErrorCode::InvalidInput`].
    pub fn append_named(&mut self, chunk: &str, named: &[(&str, Value)]) -> Result<(), Error> {
        let mut out = String::with_capacity(chunk.len());
        let mut chars = chunk.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != ':' {
                out.push(ch);
                continue;
            }
            if chars.peek() == Some(&':') {
                chars.next();
                out.push_str("::");
                continue;
            }

            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push(':');
                continue;
            }

            let Some((_, value)) = named.iter().find(|(key, _)| *key == name) else {
                return Err(Error::new(ErrorCode::InvalidInput)
                    .during("appending named parameters")
                    .with_message(format!(
                        "missing argument for the named parameter \"{name}\""
                    )));
            };
            self.args.push(value.clone());
            out.push('$');
            out.push_str(&self.args.len().to_string());
        }

        self.text.push_str(&out);
        Ok(())
    }

    /// Interpolate another query at every occurrence of `pattern`,
    /// renumbering its placeholders and merging its arguments.
    pub fn query_replace(&mut self, pattern: &str, other: &Self) {
        let chunk = renumber_placeholders(&other.text, self.args.len());
        self.text = self.text.replace(pattern, &chunk);
        self.args.extend(other.args.iter().cloned());
    }

    /// Replace a plain string pattern in the query text.
    pub fn string_replace(&mut self, pattern: &str, chunk: &str) {
        self.text = self.text.replace(pattern, chunk);
    }

    /// Wrap the query to select only the given columns.
    pub fn wrap_select(&mut self, columns: &str) {
        self.text = format!("with _ as ({}) select {} from _", self.text, columns);
    }

    /// Wrap the query to select the columns of a record destination,
    /// using [`columns_of`].
    pub fn wrap_select_cols<R: Record>(&mut self) {
        self.wrap_select(&columns_of::<R>());
    }

    /// Shorter way to call [`query::execute`].
    pub fn execute<P: CursorProvider>(&self, provider: &mut P) -> Result<(), Error> {
        query::execute(provider, &self.text, &self.args)
    }

    /// Shorter way to call [`query::fetch_one`].
    pub fn fetch_one<P, R>(&self, provider: &mut P, dest: &mut R) -> Result<(), Error>
    where
        P: CursorProvider,
        R: Record,
    {
        query::fetch_one(provider, dest, &self.text, &self.args)
    }

    /// Shorter way to call [`query::fetch_all`].
    pub fn fetch_all<P, R>(&self, provider: &mut P, dest: &mut Vec<R>) -> Result<(), Error>
    where
        P: CursorProvider,
        R: Record,
    {
        query::fetch_all(provider, dest, &self.text, &self.args)
    }

    /// Shorter way to call [`query::fetch_scalar`].
    pub fn fetch_scalar<P, T>(&self, provider: &mut P, dest: &mut T) -> Result<(), Error>
    where
        P: CursorProvider,
        T: Column,
    {
        query::fetch_scalar(provider, dest, &self.text, &self.args)
    }
}

/// Offset every `$N` placeholder by `offset`. `$` not followed by digits
/// passes through.
fn renumber_placeholders(chunk: &str, offset: usize) -> String {
    if offset == 0 {
        return chunk.to_string();
    }

    let mut out = String::with_capacity(chunk.len());
    let mut chars = chunk.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }

        let mut digits = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_digit() {
                digits.push(next);
                chars.next();
            } else {
                break;
            }
        }

        out.push('$');
        match digits.parse::<usize>() {
            Ok(ordinal) => out.push_str(&(ordinal + offset).to_string()),
            Err(_) => out.push_str(&digits),
        }
    }

    out
}

fn whitespace_between(left: &str, right: &str) -> bool {
    left.chars().next_back().is_some_and(char::is_whitespace)
        || right.chars().next().is_some_and(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn append_renumbers_placeholders() {
        let mut query = SqlQuery::new();
        query.append("where true", &[]);
        query.append("and one = $1", &[Value::Int(10)]);
        query.append("and two = $1", &[Value::Int(20)]);

        assert_eq!(query.text, "where true\nand one = $1\nand two = $2");
        assert_eq!(query.args, vec![Value::Int(10), Value::Int(20)]);
    }

    #[test]
    fn append_preserves_existing_whitespace() {
        let mut query = SqlQuery::new();
        query.append("select 1 ", &[]);
        query.append("where true", &[]);

        assert_eq!(query.text, "select 1 where true");
    }

    #[test]
    fn maybe_append_skips_null() {
        let mut query = SqlQuery::new();
        query.append("where true", &[]);
        query.maybe_append("and one = $1", Value::Null);
        query.maybe_append("and two = $1", Value::Int(20));

        assert_eq!(query.text, "where true\nand two = $1");
        assert_eq!(query.args, vec![Value::Int(20)]);
    }

    #[test]
    fn append_named_replaces_parameters() {
        let mut query = SqlQuery::new();
        query
            .append_named("select :value", &[("value", Value::Int(10))])
            .unwrap();

        assert_eq!(query.text, "select $1");
        assert_eq!(query.args, vec![Value::Int(10)]);
    }

    #[test]
    fn append_named_passes_casts_through() {
        let mut query = SqlQuery::new();
        query
            .append_named("select :value::text", &[("value", Value::Int(10))])
            .unwrap();

        assert_eq!(query.text, "select $1::text");
    }

    #[test]
    fn append_named_missing_parameter_is_invalid_input() {
        let mut query = SqlQuery::new();
        let err = query.append_named("select :nope", &[]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn query_replace_merges_and_renumbers() {
        let mut outer = SqlQuery::new();
        outer.append(
            "select * from some_table where col_one = $1 {{INNER}}",
            &[Value::Int(10)],
        );

        let mut inner = SqlQuery::new();
        inner.append("and col_two = $1", &[Value::Int(20)]);

        outer.query_replace("{{INNER}}", &inner);

        assert_eq!(
            outer.text,
            "select * from some_table where col_one = $1 and col_two = $2"
        );
        assert_eq!(outer.args, vec![Value::Int(10), Value::Int(20)]);
    }

    #[test]
    fn wrap_select_wraps_in_cte() {
        let mut query = SqlQuery::new();
        query.append("select * from some_table", &[]);
        query.wrap_select("\"one\", \"two\"");

        assert_eq!(
            query.text,
            "with _ as (select * from some_table) select \"one\", \"two\" from _"
        );
    }
}
