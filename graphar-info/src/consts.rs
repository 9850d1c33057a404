//! Reserved names used throughout the chunk layout.

/// Synthetic vertex-id column appended to plain vertex property reads.
pub const INTERNAL_ID_COL: &str = "_graphArInternalId";

/// Source vertex id column of adjacency chunks.
pub const SRC_INDEX_COL: &str = "_graphArInternalSrcIndex";

/// Destination vertex id column of adjacency chunks.
pub const DST_INDEX_COL: &str = "_graphArInternalDstIndex";

/// The single int64 column of offset chunks.
pub const OFFSET_COL: &str = "_graphArOffset";

/// File holding a little-endian i64 vertex count.
pub const VERTEX_COUNT_FILE: &str = "vertex_count";

/// Prefix of the per-vertex-chunk edge count files (`edge_count<i>`).
pub const EDGE_COUNT_FILE_PREFIX: &str = "edge_count";

/// Prefix of chunk file names (`chunk<k>`).
pub const CHUNK_FILE_PREFIX: &str = "chunk";

/// Prefix of adjacency part directories (`part<i>`).
pub const PART_DIR_PREFIX: &str = "part";
