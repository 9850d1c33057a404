use std::any::Any;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use graphar_error::{GarResult, gar_err};

use crate::{ExprRef, Expression};

/// A reference to a property column by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    name: Arc<str>,
}

impl Property {
    /// Wrap a property name as an expression node.
    pub fn new_expr(name: impl Into<Arc<str>>) -> ExprRef {
        Arc::new(Self { name: name.into() })
    }

    /// The referenced property name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Expression for Property {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, batch: &RecordBatch) -> GarResult<ArrayRef> {
        batch
            .column_by_name(&self.name)
            .cloned()
            .ok_or_else(|| gar_err!("batch does not contain column {:?}", self.name))
    }

    fn collect_references(&self, references: &mut HashSet<String>) {
        references.insert(self.name.to_string());
    }
}

/// Create a new [`Property`] reference expression.
pub fn property(name: impl Into<Arc<str>>) -> ExprRef {
    Property::new_expr(name)
}
