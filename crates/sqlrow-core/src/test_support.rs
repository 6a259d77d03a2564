//! In-memory cursor provider for tests: preset columns and rows, an
//! executed-statement log, and injectable failures. Not part of the
//! stable API.

use crate::cursor::{CursorProvider, RowCursor};
use crate::value::Value;
use thiserror::Error as ThisError;

///
/// MemError
///

#[derive(Clone, Debug, ThisError)]
#[error("{0}")]
pub struct MemError(pub String);

///
/// MemProvider
///
/// Returns the same preset result for every query. Statements passed to
/// `open_cursor` and `execute` are recorded in `executed`.
///

#[derive(Clone, Debug, Default)]
pub struct MemProvider {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    fail: Option<String>,
    pub executed: Vec<String>,
}

impl MemProvider {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
            fail: None,
            executed: Vec::new(),
        }
    }

    /// A provider whose queries return no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A provider whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail: Some(message.into()),
            ..Self::default()
        }
    }
}

impl CursorProvider for MemProvider {
    type Cursor = MemCursor;
    type Error = MemError;

    fn open_cursor(&mut self, sql: &str, _args: &[Value]) -> Result<MemCursor, MemError> {
        self.executed.push(sql.to_string());
        if let Some(message) = &self.fail {
            return Err(MemError(message.clone()));
        }
        Ok(MemCursor {
            columns: self.columns.clone(),
            rows: self.rows.clone().into_iter(),
            current: None,
        })
    }

    fn execute(&mut self, sql: &str, _args: &[Value]) -> Result<(), MemError> {
        self.executed.push(sql.to_string());
        match &self.fail {
            Some(message) => Err(MemError(message.clone())),
            None => Ok(()),
        }
    }
}

///
/// MemCursor
///

#[derive(Debug)]
pub struct MemCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl RowCursor for MemCursor {
    type Error = MemError;

    fn column_names(&self) -> Result<Vec<String>, MemError> {
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> Result<bool, MemError> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn read_row(&mut self, out: &mut [Value]) -> Result<(), MemError> {
        let Some(row) = &self.current else {
            return Err(MemError("cursor is not positioned on a row".to_string()));
        };
        if row.len() != out.len() {
            return Err(MemError(format!(
                "row has {} cells, expected {}",
                row.len(),
                out.len()
            )));
        }
        out.clone_from_slice(row);
        Ok(())
    }
}
