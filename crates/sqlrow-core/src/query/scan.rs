use crate::cursor::{CursorProvider, RowCursor};
use crate::decode::decode_row;
use crate::error::{Error, ErrorCode};
use crate::plan::Plan;
use crate::query::{advance, check_scalar_columns, column_names, open, read_row, scalar_error};
use crate::traits::{Column, Record};
use crate::value::Value;
use std::any::TypeId;

/// Open a streaming scanner over a query's result set.
///
/// Unlike [`fetch_all`](crate::query::fetch_all), nothing is buffered:
/// rows are decoded one at a time as the caller advances.
pub fn open_scanner<P>(provider: &mut P, sql: &str, args: &[Value]) -> Result<Scanner<P::Cursor>, Error>
where
    P: CursorProvider,
{
    let cursor = open(provider, sql, args)?;
    let columns = column_names(&cursor)?;
    let row = vec![Value::Null; columns.len()];
    Ok(Scanner {
        cursor,
        columns,
        row,
        dest_type: None,
        plan: None,
    })
}

///
/// Scanner
///
/// A cursor plus the decode state reused across rows: the column list,
/// the row buffer, and the plan, built on the first decode and cached for
/// the cursor's lifetime. The destination's static type is recorded on
/// the first decode; later decodes must use the same type.
///

pub struct Scanner<C: RowCursor> {
    cursor: C,
    columns: Vec<String>,
    row: Vec<Value>,
    dest_type: Option<TypeId>,
    plan: Option<Plan>,
}

impl<C: RowCursor> Scanner<C> {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Move to the next row, reading its cells into the row buffer.
    pub fn advance(&mut self) -> Result<bool, Error> {
        if !advance(&mut self.cursor)? {
            return Ok(false);
        }
        read_row(&mut self.cursor, &mut self.row)?;
        Ok(true)
    }

    /// Decode the current row into a record destination.
    ///
    /// Cells are consumed: decode each row at most once, then call
    /// [`advance`](Self::advance) again.
    pub fn decode_current<R>(&mut self, dest: &mut R) -> Result<(), Error>
    where
        R: Record + 'static,
    {
        self.guard_dest_type(TypeId::of::<R>())?;
        if self.plan.is_none() {
            self.plan = Some(Plan::build::<R>(&self.columns)?);
        }
        let Some(plan) = self.plan.as_ref() else {
            unreachable!("plan was just built")
        };
        decode_row(dest, plan, &mut self.row)
    }

    /// Decode the current row of a single-column result into a leaf value.
    pub fn decode_scalar<T>(&mut self, dest: &mut T) -> Result<(), Error>
    where
        T: Column + 'static,
    {
        self.guard_dest_type(TypeId::of::<T>())?;
        check_scalar_columns(&self.columns)?;
        *dest = T::from_value(self.row[0].take()).map_err(scalar_error)?;
        Ok(())
    }

    /// Release the cursor. Dropping the scanner does the same.
    pub fn close(self) {
        drop(self);
    }

    fn guard_dest_type(&mut self, ty: TypeId) -> Result<(), Error> {
        match self.dest_type {
            None => {
                self.dest_type = Some(ty);
                Ok(())
            }
            Some(seen) if seen == ty => Ok(()),
            Some(_) => Err(Error::new(ErrorCode::InvalidDest).with_message(
                "destination type differs from the first decode on this scanner",
            )),
        }
    }
}
