//! Chunked columnar readers for GraphAr property graph archives.
//!
//! An archive stores a property graph as columnar table chunks partitioned
//! by id range: vertices fall into vertex chunks, edges are partitioned by
//! vertex chunk on the aligned side and then cut into fixed-size sub-chunks.
//! The [`reader`] module navigates that layout one chunk at a time, mapping
//! seeks in id space onto file locations and pushing filters and
//! projections into the scans; the [`graph`] module layers row-by-row
//! iteration over the readers.
//!
//! Readers are built from shared, immutable metadata loaded by
//! [`graphar_info`]; each reader exclusively owns its cursor, and every
//! table a reader returns is owned by the caller.

pub mod graph;
pub mod reader;

pub use graphar_dtype::{DataType, IdType};
pub use graphar_error::{GarError, GarResult};
pub use graphar_expr as expr;
pub use graphar_fs::ScanOptions;
pub use graphar_info::{
    AdjList, AdjListType, EdgeInfo, FileType, GraphInfo, InfoVersion, Property, PropertyGroup,
    VertexInfo, consts,
};
