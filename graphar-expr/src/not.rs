use std::any::Any;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use graphar_error::GarResult;

use crate::binary::as_boolean;
use crate::{ExprRef, Expression};

/// Logical negation of a boolean sub-expression.
#[derive(Debug, Clone)]
pub struct Not {
    child: ExprRef,
}

impl Not {
    /// Negate an expression.
    pub fn new_expr(child: ExprRef) -> ExprRef {
        Arc::new(Self { child })
    }

    /// The negated expression.
    pub fn child(&self) -> &ExprRef {
        &self.child
    }
}

impl Display for Not {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!{}", self.child)
    }
}

impl Expression for Not {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, batch: &RecordBatch) -> GarResult<ArrayRef> {
        let child = self.child.evaluate(batch)?;
        Ok(Arc::new(arrow_arith::boolean::not(as_boolean(&child)?)?))
    }

    fn collect_references(&self, references: &mut HashSet<String>) {
        self.child.collect_references(references);
    }
}

/// Create a new `!expr` expression.
pub fn not(child: ExprRef) -> ExprRef {
    Not::new_expr(child)
}
