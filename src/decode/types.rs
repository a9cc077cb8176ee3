//! Decoder types
//!
//! Column metadata supplied by the server alongside tabular rows.

use serde::{Deserialize, Serialize};

/// Data type tag that triggers integer conversion
pub const INTEGER_DATA_TYPE: &str = "INTEGER";

/// Server-supplied description of one output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Field name used as the record key
    pub name: String,
    /// Value type tag, e.g. `STRING` or `INTEGER`
    #[serde(default)]
    pub data_type: String,
    /// `DIMENSION` or `METRIC`, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            column_type: None,
        }
    }

    /// Whether cells of this column are converted to integers
    pub fn is_integer(&self) -> bool {
        self.data_type == INTEGER_DATA_TYPE
    }
}
