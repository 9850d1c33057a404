use std::sync::Arc;

use arrow_array::{Int64Array, RecordBatch};
use arrow_schema::{DataType as ArrowDataType, Field, Schema, SchemaRef};
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_bail, gar_err};
use graphar_expr::{ExprRef, ExpressionExt};
use graphar_fs::ScanOptions;
use graphar_info::{GraphInfo, PropertyGroup, VertexInfo, consts};

use crate::reader::{absolute, ceil_div, discover_vertices_num, group_schema};

/// Iterates the chunks of one property group of one vertex label.
///
/// The cursor tracks the chunk containing the last seek target; plain reads
/// additionally expose the vertex id as a synthetic
/// [`consts::INTERNAL_ID_COL`] column.
#[derive(Debug)]
pub struct VertexPropertyChunkReader {
    vertex_info: Arc<VertexInfo>,
    property_group: Arc<PropertyGroup>,
    prefix: String,
    schema: SchemaRef,
    chunk_index: IdType,
    seek_id: IdType,
    vertex_num: IdType,
    chunk_num: IdType,
    chunk_table: Option<RecordBatch>,
    options: ScanOptions,
}

impl VertexPropertyChunkReader {
    /// Create a reader over one property group, resolving chunk paths
    /// against `prefix`.
    pub fn new(
        vertex_info: Arc<VertexInfo>,
        property_group: Arc<PropertyGroup>,
        prefix: impl Into<String>,
    ) -> GarResult<Self> {
        if !vertex_info.has_property_group(&property_group) {
            gar_bail!(
                KeyNotFound:
                "property group {:?} of vertex label {:?}",
                property_group.prefix(),
                vertex_info.label()
            );
        }
        let prefix = prefix.into();
        let vertex_num = discover_vertices_num(&vertex_info, &prefix)?;
        let chunk_num = ceil_div(vertex_num, vertex_info.chunk_size());
        let schema = group_schema(&property_group)?;
        Ok(Self {
            vertex_info,
            property_group,
            prefix,
            schema,
            chunk_index: 0,
            seek_id: 0,
            vertex_num,
            chunk_num,
            chunk_table: None,
            options: ScanOptions::new(),
        })
    }

    /// Create a reader for the group containing `property`.
    pub fn from_property(graph_info: &GraphInfo, label: &str, property: &str) -> GarResult<Self> {
        let vertex_info = graph_info.vertex_info(label)?.clone();
        let property_group = vertex_info.property_group(property)?.clone();
        Self::new(vertex_info, property_group, graph_info.prefix())
    }

    /// Create a reader for an explicit property group of `label`.
    pub fn from_property_group(
        graph_info: &GraphInfo,
        label: &str,
        property_group: Arc<PropertyGroup>,
    ) -> GarResult<Self> {
        let vertex_info = graph_info.vertex_info(label)?.clone();
        Self::new(vertex_info, property_group, graph_info.prefix())
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

    /// Move the cursor to the chunk containing vertex `id`.
    pub fn seek(&mut self, id: IdType) -> GarResult<()> {
        if id < 0 || id >= self.vertex_num {
            gar_bail!(
                IndexOutOfRange:
                "vertex id {} out of range [0, {}) of label {:?}",
                id,
                self.vertex_num,
                self.vertex_info.label()
            );
        }
        let chunk_index = id / self.vertex_info.chunk_size();
        if chunk_index != self.chunk_index {
            self.chunk_index = chunk_index;
            self.chunk_table = None;
        }
        self.seek_id = id;
        Ok(())
    }

    /// Advance to the next chunk. Failing with an index-out-of-range error
    /// is the end-of-stream signal.
    pub fn next_chunk(&mut self) -> GarResult<()> {
        if self.chunk_index + 1 >= self.chunk_num {
            gar_bail!(
                IndexOutOfRange:
                "vertex chunk {} of label {:?} is the last chunk",
                self.chunk_index,
                self.vertex_info.label()
            );
        }
        self.chunk_index += 1;
        self.seek_id = self.chunk_index * self.vertex_info.chunk_size();
        self.chunk_table = None;
        Ok(())
    }

    /// Decode the current chunk, starting at the last seek target.
    pub fn get_chunk(&mut self) -> GarResult<RecordBatch> {
        self.validate_pushdown()?;
        if self.chunk_table.is_none() {
            let relative = self
                .vertex_info
                .file_path(&self.property_group, self.chunk_index)?;
            let path = absolute(&self.prefix, &relative);
            let mut batch = graphar_fs::read_chunk(
                &path,
                self.property_group.file_type(),
                &self.schema,
                &self.options,
            )?;
            if self.options.is_plain() {
                batch = append_internal_id(
                    batch,
                    self.chunk_index * self.vertex_info.chunk_size(),
                )?;
            }
            self.chunk_table = Some(batch);
        }
        let batch = self
            .chunk_table
            .as_ref()
            .ok_or_else(|| gar_err!("chunk table not loaded"))?;
        // A filtered chunk no longer has id-addressable rows; return it whole.
        if self.options.filter.is_some() {
            return Ok(batch.clone());
        }
        let row_offset =
            (self.seek_id - self.chunk_index * self.vertex_info.chunk_size()) as usize;
        Ok(batch.slice(row_offset, batch.num_rows() - row_offset))
    }

    /// The number of chunks of this label.
    pub fn chunk_num(&self) -> IdType {
        self.chunk_num
    }

    /// The number of vertices of this label.
    pub fn vertices_num(&self) -> IdType {
        self.vertex_num
    }

    /// The property group this reader scans.
    pub fn property_group(&self) -> &Arc<PropertyGroup> {
        &self.property_group
    }

    fn validate_pushdown(&self) -> GarResult<()> {
        if let Some(filter) = &self.options.filter {
            for name in filter.references() {
                if !self.property_group.has_property(&name) {
                    gar_bail!(
                        "filter references property {:?}, which is not in the reader's property group",
                        name
                    );
                }
            }
        }
        if let Some(columns) = &self.options.columns {
            for name in columns {
                if !self.property_group.has_property(name) {
                    gar_bail!(
                        "projected column {:?} is not in the reader's property group",
                        name
                    );
                }
            }
        }
        Ok(())
    }
}

fn append_internal_id(batch: RecordBatch, start: IdType) -> GarResult<RecordBatch> {
    let ids = Int64Array::from_iter_values(start..start + batch.num_rows() as IdType);
    let mut fields = batch.schema().fields().to_vec();
    let mut columns = batch.columns().to_vec();
    fields.push(Arc::new(Field::new(
        consts::INTERNAL_ID_COL,
        ArrowDataType::Int64,
        false,
    )));
    columns.push(Arc::new(ids));
    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        columns,
    )?)
}
