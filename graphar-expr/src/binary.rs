use std::any::Any;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use arrow_arith::boolean::{and_kleene, or_kleene};
use arrow_array::{ArrayRef, BooleanArray, RecordBatch};
use arrow_ord::cmp;
use graphar_error::{GarResult, gar_err};

use crate::{ExprRef, Expression, Operator};

/// A binary comparison or boolean combination of two sub-expressions.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    lhs: ExprRef,
    operator: Operator,
    rhs: ExprRef,
}

impl BinaryExpr {
    /// Combine two expressions with an operator.
    pub fn new_expr(lhs: ExprRef, operator: Operator, rhs: ExprRef) -> ExprRef {
        Arc::new(Self { lhs, operator, rhs })
    }

    /// The left operand.
    pub fn lhs(&self) -> &ExprRef {
        &self.lhs
    }

    /// The right operand.
    pub fn rhs(&self) -> &ExprRef {
        &self.rhs
    }

    /// The operator.
    pub fn op(&self) -> Operator {
        self.operator
    }
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.operator, self.rhs)
    }
}

pub(crate) fn as_boolean(array: &ArrayRef) -> GarResult<&BooleanArray> {
    array
        .as_any()
        .downcast_ref::<BooleanArray>()
        .ok_or_else(|| gar_err!(MismatchedTypes: "bool", array.data_type()))
}

impl Expression for BinaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn evaluate(&self, batch: &RecordBatch) -> GarResult<ArrayRef> {
        let lhs = self.lhs.evaluate(batch)?;
        let rhs = self.rhs.evaluate(batch)?;
        let result = match self.operator {
            Operator::Eq => cmp::eq(&lhs, &rhs)?,
            Operator::NotEq => cmp::neq(&lhs, &rhs)?,
            Operator::Gt => cmp::gt(&lhs, &rhs)?,
            Operator::Gte => cmp::gt_eq(&lhs, &rhs)?,
            Operator::Lt => cmp::lt(&lhs, &rhs)?,
            Operator::Lte => cmp::lt_eq(&lhs, &rhs)?,
            Operator::And => and_kleene(as_boolean(&lhs)?, as_boolean(&rhs)?)?,
            Operator::Or => or_kleene(as_boolean(&lhs)?, as_boolean(&rhs)?)?,
        };
        Ok(Arc::new(result))
    }

    fn collect_references(&self, references: &mut HashSet<String>) {
        self.lhs.collect_references(references);
        self.rhs.collect_references(references);
    }
}

/// Create a new `lhs = rhs` expression.
pub fn eq(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::Eq, rhs)
}

/// Create a new `lhs != rhs` expression.
pub fn not_eq(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::NotEq, rhs)
}

/// Create a new `lhs > rhs` expression.
pub fn gt(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::Gt, rhs)
}

/// Create a new `lhs >= rhs` expression.
pub fn gt_eq(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::Gte, rhs)
}

/// Create a new `lhs < rhs` expression.
pub fn lt(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::Lt, rhs)
}

/// Create a new `lhs <= rhs` expression.
pub fn lt_eq(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::Lte, rhs)
}

/// Create a new `lhs and rhs` expression.
pub fn and(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::And, rhs)
}

/// Create a new `lhs or rhs` expression.
pub fn or(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
    BinaryExpr::new_expr(lhs, Operator::Or, rhs)
}
