//! Convert between the canonical [`DataType`] and Apache Arrow's
//! [`arrow_schema::DataType`].
//!
//! Arrow's type system is wider than the archive's: the mapping into Arrow
//! picks a single physical representation per logical type (strings become
//! `LargeUtf8`), while the mapping out of Arrow folds the physical variants
//! back onto the canonical type (`Utf8` and `LargeUtf8` both read as
//! `String`). Anything outside the supported set is an error in either
//! direction.

use std::sync::Arc;

use arrow_schema::{DataType as ArrowDataType, Field};
use graphar_error::{GarResult, gar_bail};

use crate::DataType;

impl DataType {
    /// Map `self` to the Arrow type the backend stores it as.
    ///
    /// Fails for user-defined types, which have no backend representation.
    pub fn to_arrow(&self) -> GarResult<ArrowDataType> {
        Ok(match self {
            DataType::Bool => ArrowDataType::Boolean,
            DataType::Int32 => ArrowDataType::Int32,
            DataType::Int64 => ArrowDataType::Int64,
            DataType::Float32 => ArrowDataType::Float32,
            DataType::Float64 => ArrowDataType::Float64,
            DataType::String => ArrowDataType::LargeUtf8,
            DataType::List(element) => ArrowDataType::List(Arc::new(Field::new_list_field(
                element.to_arrow()?,
                true,
            ))),
            DataType::UserDefined(name) => {
                gar_bail!("user-defined type {:?} has no Arrow representation", name)
            }
        })
    }

    /// Map an Arrow type back to the canonical type.
    pub fn from_arrow(arrow: &ArrowDataType) -> GarResult<Self> {
        Ok(match arrow {
            ArrowDataType::Boolean => DataType::Bool,
            ArrowDataType::Int32 => DataType::Int32,
            ArrowDataType::Int64 => DataType::Int64,
            ArrowDataType::Float32 => DataType::Float32,
            ArrowDataType::Float64 => DataType::Float64,
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => DataType::String,
            ArrowDataType::List(field) => DataType::list(Self::from_arrow(field.data_type())?),
            other => gar_bail!("unsupported Arrow data type {:?}", other),
        })
    }
}
