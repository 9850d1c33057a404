use graphar_expr::ExprRef;

/// The pushdown configuration of a chunk scan: an optional row filter and an
/// optional ordered column projection.
///
/// A reader holds one mutable `ScanOptions` value; replacing either field
/// takes effect at the next chunk read and never touches the reader's
/// cursor.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Rows for which the expression evaluates to `true` survive the scan.
    /// `None` keeps every row.
    pub filter: Option<ExprRef>,
    /// The columns to return, in order. `None` keeps every column.
    pub columns: Option<Vec<String>>,
}

impl ScanOptions {
    /// Options that keep every row and every column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this scan pushes nothing down.
    pub fn is_plain(&self) -> bool {
        self.filter.is_none() && self.columns.is_none()
    }
}
