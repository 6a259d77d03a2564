//! Decode SQL result sets into typed Rust values.
//!
//! Not an ORM: you write the SQL, sqlrow maps the columns onto your
//! structs. Nested records decode from dotted column aliases
//! (`"nested.val"`), nilable nested records support outer joins (an
//! all-null nested record decodes to `None`), and [`columns_of`]
//! generates the exact `select` fragment the decoder expects.
//!
//! ```ignore
//! use sqlrow::{fetch_one, Record};
//!
//! #[derive(Debug, Default, Record)]
//! struct Author {
//!     #[sqlrow(col)]
//!     name: String,
//!     #[sqlrow(col = "born")]
//!     born: i64,
//! }
//!
//! let mut author = Author::default();
//! fetch_one(&mut conn, &mut author, "select name, born from authors where id = $1", &args)?;
//! ```
//!
//! ## Crate layout
//! - `core` (`sqlrow-core`): values, traits, plans, decoding, orchestrator.
//! - `derive` (`sqlrow-derive`): the `Record` derive macro.

pub use sqlrow_core as core;

// Modules re-exported at the paths the derive macro emits.
pub use sqlrow_core::{cursor, error, plan, query, sql, test_support, traits, value};

//
// Derive
//

pub use sqlrow_derive::Record;

//
// Runtime surface
//

pub use sqlrow_core::error::{Error, ErrorCode};
pub use sqlrow_core::query::{
    execute, fetch_all, fetch_one, fetch_scalar, fetch_scalars, open_scanner, Scanner,
};
pub use sqlrow_core::sql::{columns_of, record_args, SqlArg, SqlArgs, SqlQuery};
pub use sqlrow_core::value::Value;

//
// Prelude
//

pub mod prelude {
    pub use crate::Record;
    pub use sqlrow_core::prelude::*;
}
