use std::sync::Arc;

use arrow_array::RecordBatch;
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_bail, gar_err};
use graphar_info::{GraphInfo, VertexInfo};

use crate::graph::NativeType;
use crate::reader::{VertexPropertyChunkReader, discover_vertices_num};

/// All vertices of one label, iterable row by row across every property
/// group.
#[derive(Debug)]
pub struct VerticesCollection {
    vertex_info: Arc<VertexInfo>,
    prefix: String,
    vertices_num: IdType,
}

impl VerticesCollection {
    /// Create a collection over the given label of `graph_info`.
    pub fn new(graph_info: &GraphInfo, label: &str) -> GarResult<Self> {
        let vertex_info = graph_info.vertex_info(label)?.clone();
        let prefix = graph_info.prefix().to_string();
        let vertices_num = discover_vertices_num(&vertex_info, &prefix)?;
        Ok(Self {
            vertex_info,
            prefix,
            vertices_num,
        })
    }

    /// The number of vertices of the label.
    pub fn size(&self) -> IdType {
        self.vertices_num
    }

    /// Iterate every vertex from id 0.
    pub fn iter(&self) -> GarResult<VertexIter> {
        self.make_iter(0)
    }

    /// Iterate from the given vertex id to the end of the label.
    pub fn iter_from(&self, id: IdType) -> GarResult<VertexIter> {
        if id < 0 || id >= self.vertices_num {
            gar_bail!(
                IndexOutOfRange:
                "vertex id {} out of range [0, {}) of label {:?}",
                id,
                self.vertices_num,
                self.vertex_info.label()
            );
        }
        self.make_iter(id)
    }

    fn make_iter(&self, start: IdType) -> GarResult<VertexIter> {
        let readers = self
            .vertex_info
            .property_groups()
            .iter()
            .map(|group| {
                VertexPropertyChunkReader::new(
                    self.vertex_info.clone(),
                    group.clone(),
                    self.prefix.clone(),
                )
            })
            .collect::<GarResult<Vec<_>>>()?;
        Ok(VertexIter {
            readers,
            chunk_size: self.vertex_info.chunk_size(),
            current: start,
            end: self.vertices_num,
            tables: None,
            row: 0,
            failed: false,
        })
    }
}

/// A forward iterator over the vertices of a label.
#[derive(Debug)]
pub struct VertexIter {
    readers: Vec<VertexPropertyChunkReader>,
    chunk_size: IdType,
    current: IdType,
    end: IdType,
    tables: Option<Arc<Vec<RecordBatch>>>,
    row: usize,
    failed: bool,
}

impl VertexIter {
    fn load_tables(&mut self) -> GarResult<Arc<Vec<RecordBatch>>> {
        let mut tables = Vec::with_capacity(self.readers.len());
        for reader in &mut self.readers {
            reader.seek(self.current)?;
            tables.push(reader.get_chunk()?);
        }
        let tables = Arc::new(tables);
        self.tables = Some(tables.clone());
        self.row = 0;
        Ok(tables)
    }
}

impl Iterator for VertexIter {
    type Item = GarResult<Vertex>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.current >= self.end {
            return None;
        }
        let tables = match &self.tables {
            Some(tables) => tables.clone(),
            None => match self.load_tables() {
                Ok(tables) => tables,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            },
        };
        let vertex = Vertex {
            id: self.current,
            row: self.row,
            tables,
        };
        self.current += 1;
        self.row += 1;
        // the chunk tables are sliced to start at the first visited row, so
        // a chunk boundary is simply the next multiple of the chunk size
        if self.current % self.chunk_size == 0 {
            self.tables = None;
        }
        Some(Ok(vertex))
    }
}

/// One vertex row, keeping its chunk's decoded tables alive.
pub struct Vertex {
    id: IdType,
    row: usize,
    tables: Arc<Vec<RecordBatch>>,
}

impl Vertex {
    /// The vertex id.
    pub fn id(&self) -> IdType {
        self.id
    }

    /// Decode the named property as an owned value.
    pub fn property<T: NativeType>(&self, name: &str) -> GarResult<T> {
        for table in self.tables.iter() {
            if let Some(column) = table.column_by_name(name) {
                return T::from_column(column, self.row);
            }
        }
        Err(gar_err!(KeyNotFound: "property {:?}", name))
    }
}
