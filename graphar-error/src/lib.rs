#![deny(missing_docs)]

//! This crate defines error & result types for the GraphAr archive crates.
//! It also contains a variety of useful macros for error handling.

use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::{env, fmt, io};

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

#[allow(clippy::fallible_impl_from)]
impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    #[allow(clippy::panic)]
    fn from(msg: T) -> Self {
        if env::var("GRAPHAR_PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}", msg.into());
        } else {
            Self(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The top-level error type for the GraphAr crates.
///
/// Each hand-raised variant corresponds to one failure kind callers are
/// expected to distinguish: a missing metadata entity (`KeyNotFound`), a
/// cursor or id past its range (`IndexOutOfRange`, the canonical
/// end-of-iteration signal of the chunk readers), an operation that is
/// illegal for the current layout or pushdown shape (`Invalid`), a typed
/// accessor unifying with the wrong stored type (`MismatchedTypes`), and a
/// malformed textual input (`Parse`). The remaining variants wrap backend
/// errors.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum GarError {
    /// A named entity is not declared in the graph metadata.
    #[error("key not found: {0}")]
    KeyNotFound(ErrString),
    /// An id or cursor is out of range; signals end-of-stream for `next_chunk`.
    #[error("index out of range: {0}")]
    IndexOutOfRange(ErrString),
    /// An operation is illegal for the current layout or pushdown shape.
    #[error("{0}")]
    Invalid(ErrString),
    /// A type mismatch occurred.
    #[error("expected type: {0} but instead got {1}")]
    MismatchedTypes(ErrString, ErrString),
    /// A textual value could not be parsed.
    #[error("{0}")]
    Parse(ErrString),
    /// A wrapper for other errors, carrying additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<GarError>),
    /// A wrapper for errors from the Arrow library.
    #[error(transparent)]
    ArrowError(#[from] arrow_schema::ArrowError),
    /// A wrapper for errors from the Parquet library.
    #[error(transparent)]
    ParquetError(#[from] parquet::errors::ParquetError),
    /// A wrapper for errors from the YAML metadata parser.
    #[error(transparent)]
    YamlError(#[from] serde_yaml::Error),
    /// A wrapper for IO errors.
    #[error(transparent)]
    IOError(#[from] io::Error),
}

impl GarError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        GarError::Context(msg.into(), Box::new(self))
    }

    /// Whether this error is a `KeyNotFound` (possibly wrapped in context).
    pub fn is_key_not_found(&self) -> bool {
        match self {
            GarError::KeyNotFound(..) => true,
            GarError::Context(_, inner) => inner.is_key_not_found(),
            _ => false,
        }
    }

    /// Whether this error is an `IndexOutOfRange` (possibly wrapped in context).
    pub fn is_index_out_of_range(&self) -> bool {
        match self {
            GarError::IndexOutOfRange(..) => true,
            GarError::Context(_, inner) => inner.is_index_out_of_range(),
            _ => false,
        }
    }

    /// Whether this error is an `Invalid` (possibly wrapped in context).
    pub fn is_invalid(&self) -> bool {
        match self {
            GarError::Invalid(..) => true,
            GarError::Context(_, inner) => inner.is_invalid(),
            _ => false,
        }
    }

    /// Whether this error is a `MismatchedTypes` (possibly wrapped in context).
    pub fn is_mismatched_types(&self) -> bool {
        match self {
            GarError::MismatchedTypes(..) => true,
            GarError::Context(_, inner) => inner.is_mismatched_types(),
            _ => false,
        }
    }

    /// Whether this error is an IO error (possibly wrapped in context).
    pub fn is_io(&self) -> bool {
        match self {
            GarError::IOError(..) => true,
            GarError::Context(_, inner) => inner.is_io(),
            _ => false,
        }
    }
}

impl Debug for GarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return GarErrors as their error type.
pub type GarResult<T> = Result<T, GarError>;

/// A convenient macro for creating a GarError.
#[macro_export]
macro_rules! gar_err {
    (MismatchedTypes: $expected:expr, $actual:expr) => {
        $crate::__private::must_use(
            $crate::GarError::MismatchedTypes($expected.to_string().into(), $actual.to_string().into())
        )
    };
    (Context: $msg:literal, $err:expr) => {
        $crate::__private::must_use(
            $crate::GarError::Context($msg.into(), Box::new($err))
        )
    };
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use(
            $crate::GarError::$variant(format!($fmt, $($arg),*).into())
        )
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::gar_err!(Invalid: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning a GarError.
#[macro_export]
macro_rules! gar_bail {
    ($($tt:tt)+) => {
        return Err($crate::gar_err!($($tt)+))
    };
}

// Not public, referenced by macros only.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    pub const fn must_use(error: crate::GarError) -> crate::GarError {
        error
    }
}

#[cfg(test)]
mod tests {
    use crate::{GarError, GarResult};

    fn key_lookup(found: bool) -> GarResult<u32> {
        if !found {
            gar_bail!(KeyNotFound: "vertex label {} not found", "person");
        }
        Ok(1)
    }

    #[test]
    fn error_kinds_are_distinguishable() {
        let err = key_lookup(false).unwrap_err();
        assert!(err.is_key_not_found());
        assert!(!err.is_index_out_of_range());

        let err = gar_err!(IndexOutOfRange: "id {} >= vertex count {}", 1024, 903);
        assert!(err.is_index_out_of_range());

        let err = gar_err!("cannot seek source on an unordered-by-dest layout");
        assert!(err.is_invalid());

        let err = gar_err!(MismatchedTypes: "int64", "string");
        assert!(err.is_mismatched_types());
    }

    #[test]
    fn context_preserves_kind() {
        let err = gar_err!(IndexOutOfRange: "chunk {} past end", 10).with_context("next_chunk");
        assert!(err.is_index_out_of_range());
        assert!(err.to_string().starts_with("next_chunk"));
    }

    #[test]
    fn messages_render_their_kind() {
        let err = key_lookup(false).unwrap_err();
        assert_eq!(err.to_string(), "key not found: vertex label person not found");
    }

    #[test]
    fn io_errors_are_wrapped() {
        let err = GarError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.is_io());
    }
}
