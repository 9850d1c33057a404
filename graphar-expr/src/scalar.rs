use std::fmt::Display;
use std::sync::Arc;

use arrow_array::{
    ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
};

/// A single literal value of one of the scalar property types.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A boolean value.
    Bool(bool),
    /// A 32-bit signed integer.
    Int32(i32),
    /// A 64-bit signed integer.
    Int64(i64),
    /// A 32-bit float.
    Float32(f32),
    /// A 64-bit float.
    Float64(f64),
    /// A UTF-8 string.
    String(String),
}

impl Scalar {
    /// Materialize this scalar as an Arrow array of `len` repeated values,
    /// matching the physical types properties are stored with.
    pub fn to_array(&self, len: usize) -> ArrayRef {
        match self {
            Scalar::Bool(v) => Arc::new(BooleanArray::from(vec![*v; len])),
            Scalar::Int32(v) => Arc::new(Int32Array::from(vec![*v; len])),
            Scalar::Int64(v) => Arc::new(Int64Array::from(vec![*v; len])),
            Scalar::Float32(v) => Arc::new(Float32Array::from(vec![*v; len])),
            Scalar::Float64(v) => Arc::new(Float64Array::from(vec![*v; len])),
            Scalar::String(v) => Arc::new(LargeStringArray::from(vec![v.as_str(); len])),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int32(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float32(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::String(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int32(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int64(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float32(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float64(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}
