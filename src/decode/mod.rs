//! Response decoder module
//!
//! Turns tabular JSON API responses into typed records.
//!
//! # Overview
//!
//! A tabular response describes its fields in `columnHeaders` and carries
//! the data in `rows`, one array of string cells per row:
//!
//! ```json
//! {
//!   "columnHeaders": [
//!     {"name": "ga:userType", "dataType": "STRING"},
//!     {"name": "ga:hits", "dataType": "INTEGER"}
//!   ],
//!   "rows": [["New Visitor", "1489"]]
//! }
//! ```
//!
//! In pretty mode each row becomes one record keyed by column name, with
//! `INTEGER` cells converted to numbers. In raw mode the whole body is
//! passed through as a single record.

mod decoder;
mod types;

pub use decoder::ResponseDecoder;
pub use types::{ColumnDescriptor, INTEGER_DATA_TYPE};
