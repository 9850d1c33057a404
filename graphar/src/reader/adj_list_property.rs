use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_schema::SchemaRef;
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_bail, gar_err};
use graphar_expr::{ExprRef, ExpressionExt};
use graphar_fs::ScanOptions;
use graphar_info::{AdjListType, EdgeInfo, GraphInfo, PropertyGroup};

use crate::reader::adj_list::AdjListCursor;
use crate::reader::{absolute, group_schema};

/// Iterates the chunks of one edge property group, on the same
/// `(vertex chunk, sub-chunk)` grid as the adjacency chunks of its layout.
#[derive(Debug)]
pub struct AdjListPropertyChunkReader {
    cursor: AdjListCursor,
    property_group: Arc<PropertyGroup>,
    schema: SchemaRef,
    chunk_table: Option<RecordBatch>,
    options: ScanOptions,
}

impl AdjListPropertyChunkReader {
    /// Create a reader over one property group of one declared layout,
    /// resolving chunk paths against `prefix`.
    pub fn new(
        edge_info: Arc<EdgeInfo>,
        property_group: Arc<PropertyGroup>,
        adj_type: AdjListType,
        prefix: impl Into<String>,
    ) -> GarResult<Self> {
        let declared = edge_info
            .adj_list(adj_type)?
            .property_groups()
            .iter()
            .any(|g| g == &property_group);
        if !declared {
            gar_bail!(
                KeyNotFound:
                "property group {:?} of edge {:?} with layout {}",
                property_group.prefix(),
                edge_info.edge_label(),
                adj_type
            );
        }
        let schema = group_schema(&property_group)?;
        Ok(Self {
            cursor: AdjListCursor::new(edge_info, adj_type, prefix.into())?,
            property_group,
            schema,
            chunk_table: None,
            options: ScanOptions::new(),
        })
    }

    /// Create a reader for the group containing `property` on the given
    /// edge triple of `graph_info`.
    pub fn from_property(
        graph_info: &GraphInfo,
        src_label: &str,
        edge_label: &str,
        dst_label: &str,
        property: &str,
        adj_type: AdjListType,
    ) -> GarResult<Self> {
        let edge_info = graph_info
            .edge_info(src_label, edge_label, dst_label)?
            .clone();
        let property_group = edge_info
            .adj_list(adj_type)?
            .property_group(property)
            .cloned()
            .ok_or_else(|| {
                gar_err!(KeyNotFound: "property {:?} of edge {:?}", property, edge_label)
            })?;
        Self::new(edge_info, property_group, adj_type, graph_info.prefix())
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

    /// Decode the current property chunk, starting at the last seek target.
    pub fn get_chunk(&mut self) -> GarResult<RecordBatch> {
        self.validate_pushdown()?;
        if self.chunk_table.is_none() {
            let (vertex_chunk, chunk) = self.cursor.position();
            let relative = self.cursor.edge_info().property_file_path(
                &self.property_group,
                self.cursor.adj_type(),
                vertex_chunk,
                chunk,
            )?;
            let path = absolute(self.cursor.prefix(), &relative);
            let batch = graphar_fs::read_chunk(
                &path,
                self.property_group.file_type(),
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

    /// The property group this reader scans.
    pub fn property_group(&self) -> &Arc<PropertyGroup> {
        &self.property_group
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
