use std::sync::Arc;

use arrow_array::{Int64Array, RecordBatch};
use arrow_schema::SchemaRef;
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_bail, gar_err};
use graphar_expr::{ExprRef, ExpressionExt};
use graphar_fs::ScanOptions;
use graphar_info::{AdjListType, EdgeInfo, FileType, GraphInfo, consts};

use crate::reader::{absolute, adj_list_schema, ceil_div};

/// The shared cursor of the adjacency-grid readers: a vertex chunk index on
/// the aligned side, an edge sub-chunk index within it, and the row the last
/// seek landed on. Owns the lazily-loaded offset array of the current vertex
/// chunk for ordered layouts.
#[derive(Debug)]
pub(crate) struct AdjListCursor {
    edge_info: Arc<EdgeInfo>,
    adj_type: AdjListType,
    prefix: String,
    file_type: FileType,
    vertex_chunk_size: IdType,
    vertex_num: IdType,
    vertex_chunk_num: IdType,
    vertex_chunk_index: IdType,
    chunk_index: IdType,
    seek_offset: IdType,
    edge_num: IdType,
    offset_array: Option<Int64Array>,
}

impl AdjListCursor {
    pub(crate) fn new(
        edge_info: Arc<EdgeInfo>,
        adj_type: AdjListType,
        prefix: String,
    ) -> GarResult<Self> {
        let adj = edge_info.adj_list(adj_type)?;
        let file_type = adj.file_type();
        let vertex_chunk_size = edge_info.vertex_chunk_size(adj_type)?;
        let count_path = absolute(&prefix, &edge_info.vertices_num_file_path(adj_type)?);
        let vertex_num = graphar_fs::read_id(&count_path)?;
        let vertex_chunk_num = ceil_div(vertex_num, vertex_chunk_size);
        let edge_num = if vertex_chunk_num > 0 {
            read_edges_num(&edge_info, adj_type, &prefix, 0)?
        } else {
            0
        };
        Ok(Self {
            edge_info,
            adj_type,
            prefix,
            file_type,
            vertex_chunk_size,
            vertex_num,
            vertex_chunk_num,
            vertex_chunk_index: 0,
            chunk_index: 0,
            seek_offset: 0,
            edge_num,
            offset_array: None,
        })
    }

    pub(crate) fn edge_info(&self) -> &Arc<EdgeInfo> {
        &self.edge_info
    }

    pub(crate) fn adj_type(&self) -> AdjListType {
        self.adj_type
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn file_type(&self) -> FileType {
        self.file_type
    }

    /// The `(vertex chunk, sub-chunk)` grid position.
    pub(crate) fn position(&self) -> (IdType, IdType) {
        (self.vertex_chunk_index, self.chunk_index)
    }

    pub(crate) fn vertex_chunk_num(&self) -> IdType {
        self.vertex_chunk_num
    }

    /// The edge count of the current vertex chunk.
    pub(crate) fn row_num_of_chunk(&self) -> IdType {
        self.edge_num
    }

    /// The row offset of the last seek target within the current sub-chunk.
    pub(crate) fn row_offset_in_chunk(&self) -> IdType {
        self.seek_offset - self.chunk_index * self.edge_info.chunk_size()
    }

    /// The edge count of vertex chunk `i`, read from its count file.
    pub(crate) fn edges_num(&self, vertex_chunk: IdType) -> GarResult<IdType> {
        read_edges_num(&self.edge_info, self.adj_type, &self.prefix, vertex_chunk)
    }

    /// Seek to an edge offset within the current vertex chunk.
    pub(crate) fn seek(&mut self, offset: IdType) -> GarResult<()> {
        if offset < 0 || offset >= self.edge_num {
            gar_bail!(
                IndexOutOfRange:
                "edge offset {} out of range [0, {}) of vertex chunk {}",
                offset,
                self.edge_num,
                self.vertex_chunk_index
            );
        }
        self.chunk_index = offset / self.edge_info.chunk_size();
        self.seek_offset = offset;
        Ok(())
    }

    /// Seek to the first row of the aligned-side vertex `id`. For ordered
    /// layouts the row is resolved through the offset array; unordered
    /// layouts land on the head of the vertex chunk, leaving the scan to the
    /// caller.
    pub(crate) fn seek_vertex(&mut self, id: IdType) -> GarResult<()> {
        if id < 0 || id >= self.vertex_num {
            gar_bail!(
                IndexOutOfRange:
                "vertex id {} out of range [0, {}) of edge {:?}",
                id,
                self.vertex_num,
                self.edge_info.edge_label()
            );
        }
        let vertex_chunk = id / self.vertex_chunk_size;
        self.move_to_vertex_chunk(vertex_chunk)?;
        if self.adj_type.is_ordered() {
            let index_in_chunk = (id - vertex_chunk * self.vertex_chunk_size) as usize;
            let row = {
                let offsets = self.offsets()?;
                if index_in_chunk + 1 >= offsets.len() {
                    gar_bail!(
                        "offset chunk {} has {} entries but vertex {} needs entry {}",
                        vertex_chunk,
                        offsets.len(),
                        id,
                        index_in_chunk
                    );
                }
                offsets.value(index_in_chunk)
            };
            self.chunk_index = row / self.edge_info.chunk_size();
            self.seek_offset = row;
        } else {
            self.chunk_index = 0;
            self.seek_offset = 0;
        }
        Ok(())
    }

    /// Move to the head of vertex chunk `vertex_chunk`.
    pub(crate) fn seek_chunk_index(&mut self, vertex_chunk: IdType) -> GarResult<()> {
        if vertex_chunk < 0 || vertex_chunk >= self.vertex_chunk_num {
            gar_bail!(
                IndexOutOfRange:
                "vertex chunk {} out of range [0, {})",
                vertex_chunk,
                self.vertex_chunk_num
            );
        }
        self.move_to_vertex_chunk(vertex_chunk)?;
        self.chunk_index = 0;
        self.seek_offset = 0;
        Ok(())
    }

    /// Advance to the next non-empty sub-chunk, crossing vertex chunk
    /// boundaries and skipping vertex chunks without edges. The cursor is
    /// unchanged when the end is reached.
    pub(crate) fn next_chunk(&mut self) -> GarResult<()> {
        let mut vertex_chunk = self.vertex_chunk_index;
        let mut edge_num = self.edge_num;
        let mut chunk = self.chunk_index + 1;
        while chunk >= ceil_div(edge_num, self.edge_info.chunk_size()) {
            if vertex_chunk + 1 >= self.vertex_chunk_num {
                gar_bail!(
                    IndexOutOfRange:
                    "past the last adjacency chunk of edge {:?}",
                    self.edge_info.edge_label()
                );
            }
            vertex_chunk += 1;
            edge_num = self.edges_num(vertex_chunk)?;
            chunk = 0;
        }
        if vertex_chunk != self.vertex_chunk_index {
            self.vertex_chunk_index = vertex_chunk;
            self.edge_num = edge_num;
            self.offset_array = None;
        }
        self.chunk_index = chunk;
        self.seek_offset = chunk * self.edge_info.chunk_size();
        Ok(())
    }

    fn move_to_vertex_chunk(&mut self, vertex_chunk: IdType) -> GarResult<()> {
        if vertex_chunk == self.vertex_chunk_index {
            return Ok(());
        }
        self.edge_num = self.edges_num(vertex_chunk)?;
        self.vertex_chunk_index = vertex_chunk;
        self.offset_array = None;
        Ok(())
    }

    fn offsets(&mut self) -> GarResult<&Int64Array> {
        if self.offset_array.is_none() {
            let relative = self
                .edge_info
                .offset_file_path(self.vertex_chunk_index, self.adj_type)?;
            let array =
                graphar_fs::read_offset_chunk(&absolute(&self.prefix, &relative), self.file_type)?;
            self.offset_array = Some(array);
        }
        self.offset_array
            .as_ref()
            .ok_or_else(|| gar_err!("offset chunk not loaded"))
    }
}

fn read_edges_num(
    edge_info: &EdgeInfo,
    adj_type: AdjListType,
    prefix: &str,
    vertex_chunk: IdType,
) -> GarResult<IdType> {
    let relative = edge_info.edges_num_file_path(vertex_chunk, adj_type)?;
    graphar_fs::read_id(&absolute(prefix, &relative))
}

/// Iterates the `(src, dst)` chunks of one edge triple in one adjacency
/// layout.
#[derive(Debug)]
pub struct AdjListChunkReader {
    cursor: AdjListCursor,
    schema: SchemaRef,
    chunk_table: Option<RecordBatch>,
    options: ScanOptions,
}

impl AdjListChunkReader {
    /// Create a reader over one declared layout of `edge_info`, resolving
    /// chunk paths against `prefix`.
    pub fn new(
        edge_info: Arc<EdgeInfo>,
        adj_type: AdjListType,
        prefix: impl Into<String>,
    ) -> GarResult<Self> {
        Ok(Self {
            cursor: AdjListCursor::new(edge_info, adj_type, prefix.into())?,
            schema: adj_list_schema(),
            chunk_table: None,
            options: ScanOptions::new(),
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

    /// Replace the scan options wholesale; takes effect at the next
    /// [`Self::get_chunk`].
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self.chunk_table = None;
        self
    }

    /// Replace the pushdown filter; takes effect at the next
    /// [`Self::get_chunk`].
    pub fn filter(&mut self, filter: ExprRef) {
        self.options.filter = Some(filter);
        self.chunk_table = None;
    }

    /// Replace the column projection; takes effect at the next
    /// [`Self::get_chunk`].
    pub fn select(&mut self, columns: Vec<String>) {
        self.options.columns = Some(columns);
        self.chunk_table = None;
    }

    /// Seek to an edge offset within the current vertex chunk.
    pub fn seek(&mut self, offset: IdType) -> GarResult<()> {
        let position = self.cursor.position();
        self.cursor.seek(offset)?;
        if self.cursor.position() != position {
            self.chunk_table = None;
        }
        Ok(())
    }

    /// Seek to the first edge of source `id`. Only legal for layouts
    /// aligned by source.
    pub fn seek_src(&mut self, id: IdType) -> GarResult<()> {
        if !self.cursor.adj_type().is_aligned_by_src() {
            gar_bail!(
                "can not seek by source id on layout {}",
                self.cursor.adj_type()
            );
        }
        self.seek_vertex(id)
    }

    /// Seek to the first edge of destination `id`. Only legal for layouts
    /// aligned by destination.
    pub fn seek_dst(&mut self, id: IdType) -> GarResult<()> {
        if self.cursor.adj_type().is_aligned_by_src() {
            gar_bail!(
                "can not seek by destination id on layout {}",
                self.cursor.adj_type()
            );
        }
        self.seek_vertex(id)
    }

    /// Move to the head of vertex chunk `vertex_chunk`.
    pub fn seek_chunk_index(&mut self, vertex_chunk: IdType) -> GarResult<()> {
        let position = self.cursor.position();
        self.cursor.seek_chunk_index(vertex_chunk)?;
        if self.cursor.position() != position {
            self.chunk_table = None;
        }
        Ok(())
    }

    /// Advance to the next non-empty sub-chunk. Failing with an
    /// index-out-of-range error is the end-of-stream signal.
    pub fn next_chunk(&mut self) -> GarResult<()> {
        self.cursor.next_chunk()?;
        self.chunk_table = None;
        Ok(())
    }

    /// Decode the current adjacency chunk, starting at the last seek target.
    pub fn get_chunk(&mut self) -> GarResult<RecordBatch> {
        self.validate_pushdown()?;
        if self.chunk_table.is_none() {
            let (vertex_chunk, chunk) = self.cursor.position();
            let relative =
                self.cursor
                    .edge_info()
                    .adj_list_file_path(vertex_chunk, chunk, self.cursor.adj_type())?;
            let path = absolute(self.cursor.prefix(), &relative);
            let batch = graphar_fs::read_chunk(
                &path,
                self.cursor.file_type(),
                &self.schema,
                &self.options,
            )?;
            self.chunk_table = Some(batch);
        }
        let batch = self
            .chunk_table
            .as_ref()
            .ok_or_else(|| gar_err!("chunk table not loaded"))?;
        if self.options.filter.is_some() {
            return Ok(batch.clone());
        }
        let row_offset = self.cursor.row_offset_in_chunk() as usize;
        Ok(batch.slice(row_offset, batch.num_rows() - row_offset))
    }

    /// The edge count of the current vertex chunk.
    pub fn row_num_of_chunk(&self) -> IdType {
        self.cursor.row_num_of_chunk()
    }

    /// The number of vertex chunks on the aligned side.
    pub fn vertex_chunk_num(&self) -> IdType {
        self.cursor.vertex_chunk_num()
    }

    /// The edge count of vertex chunk `i`.
    pub fn edges_num(&self, vertex_chunk: IdType) -> GarResult<IdType> {
        self.cursor.edges_num(vertex_chunk)
    }

    fn seek_vertex(&mut self, id: IdType) -> GarResult<()> {
        let position = self.cursor.position();
        self.cursor.seek_vertex(id)?;
        if self.cursor.position() != position {
            self.chunk_table = None;
        }
        Ok(())
    }

    fn validate_pushdown(&self) -> GarResult<()> {
        let known = [consts::SRC_INDEX_COL, consts::DST_INDEX_COL];
        if let Some(filter) = &self.options.filter {
            for name in filter.references() {
                if !known.contains(&name.as_str()) {
                    gar_bail!("filter references {:?}, which is not an adjacency column", name);
                }
            }
        }
        if let Some(columns) = &self.options.columns {
            for name in columns {
                if !known.contains(&name.as_str()) {
                    gar_bail!("projected column {:?} is not an adjacency column", name);
                }
            }
        }
        Ok(())
    }
}
