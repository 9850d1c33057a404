use arrow_array::cast::AsArray;
use arrow_array::types::{Float32Type, Float64Type, Int32Type, Int64Type};
use arrow_array::{Array, ArrayRef};
use graphar_error::{GarResult, gar_bail, gar_err};

/// A Rust type a stored property value can be decoded into.
///
/// Decoding always produces an owned value; the source column is only
/// borrowed for the duration of the call.
pub trait NativeType: Sized {
    /// Decode the value at `row` of `column`, failing with a type-mismatch
    /// error when the column does not store this type.
    fn from_column(column: &ArrayRef, row: usize) -> GarResult<Self>;
}

fn check_row(column: &ArrayRef, row: usize) -> GarResult<()> {
    if row >= column.len() {
        gar_bail!(IndexOutOfRange: "row {} of a column with {} rows", row, column.len());
    }
    if column.is_null(row) {
        gar_bail!("property value at row {} is null", row);
    }
    Ok(())
}

macro_rules! native_primitive {
    ($native:ty, $arrow:ty, $name:literal) => {
        impl NativeType for $native {
            fn from_column(column: &ArrayRef, row: usize) -> GarResult<Self> {
                check_row(column, row)?;
                let array = column
                    .as_primitive_opt::<$arrow>()
                    .ok_or_else(|| gar_err!(MismatchedTypes: $name, column.data_type()))?;
                Ok(array.value(row))
            }
        }
    };
}

native_primitive!(i32, Int32Type, "int32");
native_primitive!(i64, Int64Type, "int64");
native_primitive!(f32, Float32Type, "float");
native_primitive!(f64, Float64Type, "double");

impl NativeType for bool {
    fn from_column(column: &ArrayRef, row: usize) -> GarResult<Self> {
        check_row(column, row)?;
        let array = column
            .as_boolean_opt()
            .ok_or_else(|| gar_err!(MismatchedTypes: "bool", column.data_type()))?;
        Ok(array.value(row))
    }
}

impl NativeType for String {
    fn from_column(column: &ArrayRef, row: usize) -> GarResult<Self> {
        check_row(column, row)?;
        if let Some(array) = column.as_string_opt::<i64>() {
            return Ok(array.value(row).to_string());
        }
        if let Some(array) = column.as_string_opt::<i32>() {
            return Ok(array.value(row).to_string());
        }
        Err(gar_err!(MismatchedTypes: "string", column.data_type()))
    }
}
