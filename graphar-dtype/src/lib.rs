#![deny(missing_docs)]

//! The canonical type system of a GraphAr property graph.
//!
//! Properties declare their types with [`DataType`]; the columnar backend
//! speaks Arrow. This crate owns the bidirectional mapping between the two
//! as well as the textual type-name grammar used by the metadata documents.

mod arrow;
mod dtype;

pub use dtype::*;

/// The type of vertex ids and of global edge offsets within an adjacency
/// layout. Ids are non-negative and dense.
pub type IdType = i64;
