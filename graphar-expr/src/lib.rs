//! The filter expression AST pushed down into columnar chunk scans.
//!
//! Chunk readers hold an [`ExprRef`] as an opaque value and hand it to the
//! storage backend, which evaluates it against each decoded
//! [`arrow_array::RecordBatch`] to produce a row-selection mask. Expressions
//! are built with the free-function combinators: [`property`], [`lit`],
//! [`eq`], [`lt`], [`and`], and friends.

use std::any::Any;
use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use graphar_error::GarResult;

mod binary;
mod literal;
mod not;
mod operators;
mod property;
mod scalar;

pub use binary::*;
pub use literal::*;
pub use not::*;
pub use operators::*;
pub use property::*;
pub use scalar::*;

/// A reference-counted, immutable expression node.
pub type ExprRef = Arc<dyn Expression>;

/// A logical operation over the columns of a [`RecordBatch`].
pub trait Expression: Debug + Display + Send + Sync {
    /// Convert expression reference to reference of [`Any`] type.
    fn as_any(&self) -> &dyn Any;

    /// Compute the result of the expression on the given batch, producing an
    /// array of `batch.num_rows()` values.
    fn evaluate(&self, batch: &RecordBatch) -> GarResult<ArrayRef>;

    /// Add the names of all columns this expression reads to `references`.
    fn collect_references(&self, references: &mut HashSet<String>);
}

/// Extension methods available on any [`ExprRef`].
pub trait ExpressionExt {
    /// Accumulate all column references from this expression and its
    /// children in a set.
    fn references(&self) -> HashSet<String>;
}

impl ExpressionExt for ExprRef {
    fn references(&self) -> HashSet<String> {
        let mut references = HashSet::new();
        self.collect_references(&mut references);
        references
    }
}
