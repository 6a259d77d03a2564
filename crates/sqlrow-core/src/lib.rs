//! Core runtime for sqlrow: cell values, decode plans, the row decoder,
//! the query orchestrator, and the SQL helpers exported via the `prelude`.
//!
//! The typical entry points are [`query::fetch_one`] / [`query::fetch_all`]
//! for records, [`query::fetch_scalar`] / [`query::fetch_scalars`] for
//! single-column results, and [`query::open_scanner`] for streaming.

extern crate self as sqlrow;

pub mod cursor;
pub mod error;
pub mod plan;
pub mod query;
pub mod sql;
pub mod test_support;
pub mod traits;
pub mod value;

mod decode;

///
/// Prelude
///
/// Prelude contains only the vocabulary callers need at a query site.
/// Plan internals, slots, and test support are not re-exported here.
///

pub mod prelude {
    pub use crate::{
        cursor::{CursorProvider, RowCursor},
        error::{Error, ErrorCode},
        query::{execute, fetch_all, fetch_one, fetch_scalar, fetch_scalars, open_scanner},
        sql::{columns_of, record_args, SqlArgs, SqlQuery},
        traits::{Column, Record},
        value::Value,
    };
}
