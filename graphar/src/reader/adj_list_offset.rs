use std::sync::Arc;

use arrow_array::Int64Array;
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_bail};
use graphar_info::{AdjListType, EdgeInfo, FileType, GraphInfo};

use crate::reader::{absolute, ceil_div};

/// Iterates the per-vertex-chunk offset arrays of an ordered adjacency
/// layout. Chunk `i` holds one more entry than the vertex chunk has
/// vertices; consecutive entries bracket each vertex's row range.
#[derive(Debug)]
pub struct AdjListOffsetChunkReader {
    edge_info: Arc<EdgeInfo>,
    adj_type: AdjListType,
    prefix: String,
    file_type: FileType,
    vertex_chunk_size: IdType,
    vertex_num: IdType,
    chunk_num: IdType,
    chunk_index: IdType,
    seek_id: IdType,
    chunk_array: Option<Int64Array>,
}

impl AdjListOffsetChunkReader {
    /// Create a reader over the offset chunks of one ordered layout,
    /// resolving paths against `prefix`.
    pub fn new(
        edge_info: Arc<EdgeInfo>,
        adj_type: AdjListType,
        prefix: impl Into<String>,
    ) -> GarResult<Self> {
        let adj = edge_info.adj_list(adj_type)?;
        if !adj_type.is_ordered() {
            gar_bail!("layout {} carries no offset chunks", adj_type);
        }
        let file_type = adj.file_type();
        let prefix = prefix.into();
        let vertex_chunk_size = edge_info.vertex_chunk_size(adj_type)?;
        let count_path = absolute(&prefix, &edge_info.vertices_num_file_path(adj_type)?);
        let vertex_num = graphar_fs::read_id(&count_path)?;
        let chunk_num = ceil_div(vertex_num, vertex_chunk_size);
        Ok(Self {
            edge_info,
            adj_type,
            prefix,
            file_type,
            vertex_chunk_size,
            vertex_num,
            chunk_num,
            chunk_index: 0,
            seek_id: 0,
            chunk_array: None,
        })
    }

    /// Create a reader for the given edge triple of `graph_info`.
    pub fn from_graph(
        graph_info: &GraphInfo,
        src_label: &str,
        edge_label: &str,
        dst_label: &str,
        adj_type: AdjListType,
    ) -> GarResult<Self> {
        let edge_info = graph_info
            .edge_info(src_label, edge_label, dst_label)?
            .clone();
        Self::new(edge_info, adj_type, graph_info.prefix())
    }

    /// Move the cursor to the offset chunk covering the aligned-side vertex
    /// `id`.
    pub fn seek(&mut self, id: IdType) -> GarResult<()> {
        if id < 0 || id >= self.vertex_num {
            gar_bail!(
                IndexOutOfRange:
                "vertex id {} out of range [0, {}) of edge {:?}",
                id,
                self.vertex_num,
                self.edge_info.edge_label()
            );
        }
        let chunk_index = id / self.vertex_chunk_size;
        if chunk_index != self.chunk_index {
            self.chunk_index = chunk_index;
            self.chunk_array = None;
        }
        self.seek_id = id;
        Ok(())
    }

    /// Advance to the next offset chunk. Failing with an index-out-of-range
    /// error is the end-of-stream signal.
    pub fn next_chunk(&mut self) -> GarResult<()> {
        if self.chunk_index + 1 >= self.chunk_num {
            gar_bail!(
                IndexOutOfRange:
                "offset chunk {} of edge {:?} is the last chunk",
                self.chunk_index,
                self.edge_info.edge_label()
            );
        }
        self.chunk_index += 1;
        self.seek_id = self.chunk_index * self.vertex_chunk_size;
        self.chunk_array = None;
        Ok(())
    }

    /// Decode the current offset chunk, starting at the last seek target.
    pub fn get_chunk(&mut self) -> GarResult<Int64Array> {
        if self.chunk_array.is_none() {
            let relative = self
                .edge_info
                .offset_file_path(self.chunk_index, self.adj_type)?;
            let array = graphar_fs::read_offset_chunk(
                &absolute(&self.prefix, &relative),
                self.file_type,
            )?;
            self.chunk_array = Some(array);
        }
        let array = self
            .chunk_array
            .as_ref()
            .ok_or_else(|| graphar_error::gar_err!("offset chunk not loaded"))?;
        let row_offset = (self.seek_id - self.chunk_index * self.vertex_chunk_size) as usize;
        Ok(array.slice(row_offset, array.len() - row_offset))
    }

    /// The number of offset chunks.
    pub fn chunk_num(&self) -> IdType {
        self.chunk_num
    }
}
