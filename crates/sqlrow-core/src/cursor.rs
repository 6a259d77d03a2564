use crate::value::Value;
use std::error::Error as StdError;

///
/// CursorProvider
///
/// The external capability that executes SQL. Implemented over a
/// connection, a transaction, or anything else that can run a query;
/// the error surface is opaque to the decoder, which wraps it with the
/// phase it was in.
///

pub trait CursorProvider {
    type Cursor: RowCursor<Error = Self::Error>;
    type Error: StdError + Send + Sync + 'static;

    /// Execute and return an ordered row cursor.
    fn open_cursor(&mut self, sql: &str, args: &[Value]) -> Result<Self::Cursor, Self::Error>;

    /// Execute, discarding any rows.
    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<(), Self::Error>;
}

///
/// RowCursor
///
/// A streaming result set. Position starts before the first row;
/// `advance` moves to the next row and reports whether one exists.
/// Release happens on drop, on every exit path.
///

pub trait RowCursor {
    type Error: StdError + Send + Sync + 'static;

    /// The driver's claimed output schema, in column order.
    fn column_names(&self) -> Result<Vec<String>, Self::Error>;

    fn advance(&mut self) -> Result<bool, Self::Error>;

    /// Decode the current row into `out`, one cell per column.
    /// `out` has already been sized to the column count.
    fn read_row(&mut self, out: &mut [Value]) -> Result<(), Self::Error>;
}
