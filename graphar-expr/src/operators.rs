use core::fmt;
use std::fmt::{Display, Formatter};

/// The binary operators usable in pushdown filters.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operator {
    // comparison
    /// Equality.
    Eq,
    /// Inequality.
    NotEq,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    // boolean algebra
    /// Logical conjunction (Kleene semantics).
    And,
    /// Logical disjunction (Kleene semantics).
    Or,
}

impl Operator {
    /// Whether this operator combines two boolean operands.
    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let display = match &self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::And => "and",
            Operator::Or => "or",
        };
        Display::fmt(display, f)
    }
}
