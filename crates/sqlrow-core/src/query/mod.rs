//! The decode orchestrator: cursor lifecycle, single-row vs multi-row
//! protocol, and the typed entry points for each destination shape.
//!
//! Every cursor opened here is released on every exit path; release is
//! the cursor's `Drop`.

mod scan;

pub use scan::{open_scanner, Scanner};

use crate::cursor::{CursorProvider, RowCursor};
use crate::decode::decode_row;
use crate::error::{Error, ErrorCode};
use crate::plan::Plan;
use crate::traits::{Column, Record};
use crate::value::{Value, ValueError};

/// Execute a statement, discarding any rows. The nil-destination path.
pub fn execute<P>(provider: &mut P, sql: &str, args: &[Value]) -> Result<(), Error>
where
    P: CursorProvider,
{
    provider
        .execute(sql, args)
        .map_err(|err| Error::unknown(err).during("executing query"))
}

/// Decode exactly one row into a record destination.
///
/// Zero rows is [`ErrorCode::NoRows`]; a second row is
/// [`ErrorCode::MultipleRows`]. Fields whose columns were not selected
/// keep their prior values.
pub fn fetch_one<P, R>(provider: &mut P, dest: &mut R, sql: &str, args: &[Value]) -> Result<(), Error>
where
    P: CursorProvider,
    R: Record,
{
    let mut cursor = open(provider, sql, args)?;
    let columns = column_names(&cursor)?;
    let plan = Plan::build::<R>(&columns)?;
    let mut row = vec![Value::Null; columns.len()];

    if !advance(&mut cursor)? {
        return Err(Error::new(ErrorCode::NoRows).during("preparing row"));
    }
    read_row(&mut cursor, &mut row)?;
    decode_row(dest, &plan, &mut row)?;

    if advance(&mut cursor)? {
        return Err(Error::new(ErrorCode::MultipleRows).during("verifying row count"));
    }
    Ok(())
}

/// Decode every row into a sequence of records, in cursor order.
///
/// The destination is truncated in place exactly once before decoding,
/// keeping its capacity.
pub fn fetch_all<P, R>(
    provider: &mut P,
    dest: &mut Vec<R>,
    sql: &str,
    args: &[Value],
) -> Result<(), Error>
where
    P: CursorProvider,
    R: Record,
{
    let mut cursor = open(provider, sql, args)?;
    let columns = column_names(&cursor)?;
    let plan = Plan::build::<R>(&columns)?;
    let mut row = vec![Value::Null; columns.len()];

    dest.clear();
    while advance(&mut cursor)? {
        read_row(&mut cursor, &mut row)?;
        let mut element = R::default();
        decode_row(&mut element, &plan, &mut row)?;
        dest.push(element);
    }
    Ok(())
}

/// Decode exactly one row of a single-column result into a leaf value.
pub fn fetch_scalar<P, T>(
    provider: &mut P,
    dest: &mut T,
    sql: &str,
    args: &[Value],
) -> Result<(), Error>
where
    P: CursorProvider,
    T: Column,
{
    let mut cursor = open(provider, sql, args)?;
    let columns = column_names(&cursor)?;
    check_scalar_columns(&columns)?;
    let mut row = vec![Value::Null; 1];

    if !advance(&mut cursor)? {
        return Err(Error::new(ErrorCode::NoRows).during("preparing row"));
    }
    read_row(&mut cursor, &mut row)?;
    *dest = T::from_value(row[0].take()).map_err(scalar_error)?;

    if advance(&mut cursor)? {
        return Err(Error::new(ErrorCode::MultipleRows).during("verifying row count"));
    }
    Ok(())
}

/// Decode every row of a single-column result into a sequence of leaf
/// values, in cursor order. Truncates the destination like [`fetch_all`].
pub fn fetch_scalars<P, T>(
    provider: &mut P,
    dest: &mut Vec<T>,
    sql: &str,
    args: &[Value],
) -> Result<(), Error>
where
    P: CursorProvider,
    T: Column,
{
    let mut cursor = open(provider, sql, args)?;
    let columns = column_names(&cursor)?;
    check_scalar_columns(&columns)?;
    let mut row = vec![Value::Null; 1];

    dest.clear();
    while advance(&mut cursor)? {
        read_row(&mut cursor, &mut row)?;
        dest.push(T::from_value(row[0].take()).map_err(scalar_error)?);
    }
    Ok(())
}

pub(crate) fn open<P: CursorProvider>(
    provider: &mut P,
    sql: &str,
    args: &[Value],
) -> Result<P::Cursor, Error> {
    provider
        .open_cursor(sql, args)
        .map_err(|err| Error::unknown(err).during("querying rows"))
}

pub(crate) fn column_names<C: RowCursor>(cursor: &C) -> Result<Vec<String>, Error> {
    cursor
        .column_names()
        .map_err(|err| Error::unknown(err).during("getting columns"))
}

pub(crate) fn advance<C: RowCursor>(cursor: &mut C) -> Result<bool, Error> {
    cursor
        .advance()
        .map_err(|err| Error::unknown(err).during("preparing row"))
}

pub(crate) fn read_row<C: RowCursor>(cursor: &mut C, row: &mut [Value]) -> Result<(), Error> {
    cursor
        .read_row(row)
        .map_err(|err| Error::unknown(err).during("scanning row"))
}

pub(crate) fn check_scalar_columns(columns: &[String]) -> Result<(), Error> {
    if columns.len() == 1 {
        return Ok(());
    }
    Err(Error::new(ErrorCode::Scan)
        .during("scanning row")
        .with_message(format!(
            "expected 1 column for a scalar destination, got {}",
            columns.len()
        )))
}

pub(crate) fn scalar_error(err: ValueError) -> Error {
    let code = match err {
        ValueError::Null { .. } => ErrorCode::Null,
        _ => ErrorCode::Scan,
    };
    Error::new(code).during("scanning row").because(err)
}
