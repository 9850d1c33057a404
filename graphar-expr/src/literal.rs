use std::any::Any;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use graphar_error::GarResult;

use crate::{ExprRef, Expression, Scalar};

/// A constant value, broadcast to the length of the batch it is evaluated on.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Scalar,
}

impl Literal {
    /// Wrap a scalar value as an expression node.
    pub fn new_expr(value: impl Into<Scalar>) -> ExprRef {
        Arc::new(Self {
            value: value.into(),
        })
    }

    /// The wrapped value.
    pub fn value(&self) -> &Scalar {
        &self.value
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Expression for Literal {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, batch: &RecordBatch) -> GarResult<ArrayRef> {
        Ok(self.value.to_array(batch.num_rows()))
    }

    fn collect_references(&self, _references: &mut HashSet<String>) {}
}

/// Create a new [`Literal`] expression from a value that coerces to
/// [`Scalar`].
pub fn lit(value: impl Into<Scalar>) -> ExprRef {
    Literal::new_expr(value)
}
