//! Derive macro for the sqlrow `Record` trait.
//!
//! Use through the `sqlrow` facade crate; the generated code refers to
//! `::sqlrow` paths.

mod record;

use proc_macro::TokenStream;

#[proc_macro_derive(Record, attributes(sqlrow))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
