//! Reading and writing delimited files.
//!
//! The loader turns a delimited text file into a [`Table`](crate::types::Table);
//! the writer persists one back in the same format.

mod loader;
mod writer;

pub use loader::{MISSING_MARKERS, TableLoader};
pub use writer::TableWriter;
