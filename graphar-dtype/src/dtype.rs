use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use graphar_error::{GarError, gar_err};

/// The logical types of property values in a graph archive.
///
/// The scalar variants are unit values, so every scalar type has exactly one
/// canonical representation and equality is identity. `List` owns its
/// element type and compares structurally. `UserDefined` carries the name a
/// metadata document declared for a type this library does not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean values.
    Bool,
    /// 32-bit signed integers.
    Int32,
    /// 64-bit signed integers.
    Int64,
    /// 32-bit floating point numbers, named `float` in metadata.
    Float32,
    /// 64-bit floating point numbers, named `double` in metadata.
    Float64,
    /// UTF-8 strings.
    String,
    /// A variable-length list, parameterized by a single element type.
    List(Arc<DataType>),
    /// A user-defined type, opaque to this library.
    UserDefined(Arc<str>),
}

impl DataType {
    /// Construct a list type over the given element type.
    pub fn list(element: DataType) -> Self {
        DataType::List(Arc::new(element))
    }

    /// Construct a user-defined type from its declared name.
    pub fn user_defined(name: impl Into<Arc<str>>) -> Self {
        DataType::UserDefined(name.into())
    }

    /// Check if `self` is a list type.
    pub fn is_list(&self) -> bool {
        matches!(self, DataType::List(_))
    }

    /// Check if `self` is a user-defined type.
    pub fn is_user_defined(&self) -> bool {
        matches!(self, DataType::UserDefined(_))
    }

    /// Get the element type if `self` is a list type, otherwise `None`.
    pub fn as_list_element(&self) -> Option<&DataType> {
        match self {
            DataType::List(element) => Some(element.as_ref()),
            _ => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Int32 => write!(f, "int32"),
            DataType::Int64 => write!(f, "int64"),
            DataType::Float32 => write!(f, "float"),
            DataType::Float64 => write!(f, "double"),
            DataType::String => write!(f, "string"),
            DataType::List(element) => write!(f, "list<{}>", element),
            DataType::UserDefined(name) => write!(f, "{}", name),
        }
    }
}

fn scalar_from_name(name: &str) -> Option<DataType> {
    match name {
        "bool" => Some(DataType::Bool),
        "int32" => Some(DataType::Int32),
        "int64" => Some(DataType::Int64),
        "float" => Some(DataType::Float32),
        "double" => Some(DataType::Float64),
        "string" => Some(DataType::String),
        _ => None,
    }
}

impl FromStr for DataType {
    type Err = GarError;

    /// Parse a type name: `bool | int32 | int64 | float | double | string`,
    /// or `list<X>` where `X` is one of the scalar names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(scalar) = scalar_from_name(s) {
            return Ok(scalar);
        }
        if let Some(element) = s.strip_prefix("list<").and_then(|s| s.strip_suffix('>')) {
            return scalar_from_name(element)
                .map(DataType::list)
                .ok_or_else(|| gar_err!(Parse: "unsupported list element type {:?}", element));
        }
        Err(gar_err!(Parse: "unsupported data type {:?}", s))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::DataType;

    #[rstest]
    #[case(DataType::Bool, "bool")]
    #[case(DataType::Int32, "int32")]
    #[case(DataType::Int64, "int64")]
    #[case(DataType::Float32, "float")]
    #[case(DataType::Float64, "double")]
    #[case(DataType::String, "string")]
    #[case(DataType::list(DataType::Int64), "list<int64>")]
    #[case(DataType::list(DataType::String), "list<string>")]
    fn type_name_round_trip(#[case] dtype: DataType, #[case] name: &str) {
        assert_eq!(dtype.to_string(), name);
        assert_eq!(name.parse::<DataType>().unwrap(), dtype);
    }

    #[test]
    fn user_defined_renders_its_name() {
        let dtype = DataType::user_defined("wkt_point");
        assert_eq!(dtype.to_string(), "wkt_point");
        // The name grammar does not recognise user-defined names.
        assert!("wkt_point".parse::<DataType>().is_err());
    }

    #[test]
    fn nested_lists_are_rejected() {
        assert!("list<list<int32>>".parse::<DataType>().is_err());
        assert!("list<>".parse::<DataType>().is_err());
        assert!("list<int32".parse::<DataType>().is_err());
    }
}
