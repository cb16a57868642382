//! # mapcache csv
//!
//! Renders schema-described array values as single delimited-text rows.
//!
//! ```rust
//! use mapcache_csv::{ArraySchema, DelimitedRowWriter};
//!
//! let schema = ArraySchema::untyped("row", 3);
//! let line = DelimitedRowWriter::new()
//!     .write_array_text(&schema, r#"[1,"a,b",3]"#)
//!     .unwrap();
//! assert_eq!(line, r#"1,"a,b",3"#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod schema;
mod writer;

pub use schema::{ArraySchema, FieldKind, FieldSchema};
pub use writer::DelimitedRowWriter;
