use std::fmt::{Display, Formatter};
use std::str::FromStr;

use graphar_error::{GarError, gar_err};

/// The four adjacency layouts an edge triple can be stored with.
///
/// The layout fixes which side partitions the edges into vertex chunks
/// (`by_source` or `by_dest`) and whether rows inside each vertex chunk are
/// sorted by that side's id. Only ordered layouts carry an offset index, and
/// only layouts aligned with a given side admit a seek by that side's id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AdjListType {
    /// Partitioned by source, rows sorted by (src, dst), offset index present.
    OrderedBySource,
    /// Partitioned by destination, rows sorted by (dst, src), offset index present.
    OrderedByDest,
    /// Partitioned by source, unsorted.
    UnorderedBySource,
    /// Partitioned by destination, unsorted.
    UnorderedByDest,
}

impl AdjListType {
    /// Construct from the `ordered` / `aligned_by` fields of a YAML document.
    pub fn from_parts(ordered: bool, aligned_by: &str) -> Result<Self, GarError> {
        match (ordered, aligned_by) {
            (true, "src") => Ok(AdjListType::OrderedBySource),
            (true, "dst") => Ok(AdjListType::OrderedByDest),
            (false, "src") => Ok(AdjListType::UnorderedBySource),
            (false, "dst") => Ok(AdjListType::UnorderedByDest),
            _ => Err(gar_err!(Parse: "invalid adjacency alignment {:?}", aligned_by)),
        }
    }

    /// Whether rows within a vertex chunk are sorted by the aligned side.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            AdjListType::OrderedBySource | AdjListType::OrderedByDest
        )
    }

    /// Whether edges are partitioned by their source id.
    pub fn is_aligned_by_src(&self) -> bool {
        matches!(
            self,
            AdjListType::OrderedBySource | AdjListType::UnorderedBySource
        )
    }

    /// The `aligned_by` YAML field value.
    pub fn aligned_by(&self) -> &'static str {
        if self.is_aligned_by_src() { "src" } else { "dst" }
    }
}

impl FromStr for AdjListType {
    type Err = GarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ordered_by_source" => Ok(AdjListType::OrderedBySource),
            "ordered_by_dest" => Ok(AdjListType::OrderedByDest),
            "unordered_by_source" => Ok(AdjListType::UnorderedBySource),
            "unordered_by_dest" => Ok(AdjListType::UnorderedByDest),
            _ => Err(gar_err!(Parse: "unsupported adjacency layout {:?}", s)),
        }
    }
}

impl Display for AdjListType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjListType::OrderedBySource => write!(f, "ordered_by_source"),
            AdjListType::OrderedByDest => write!(f, "ordered_by_dest"),
            AdjListType::UnorderedBySource => write!(f, "unordered_by_source"),
            AdjListType::UnorderedByDest => write!(f, "unordered_by_dest"),
        }
    }
}
