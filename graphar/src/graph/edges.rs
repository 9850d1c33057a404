use std::sync::Arc;

use arrow_array::RecordBatch;
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_err};
use graphar_info::{AdjListType, EdgeInfo, GraphInfo, consts};

use crate::graph::NativeType;
use crate::reader::{AdjListChunkReader, AdjListPropertyChunkReader};

/// All edges of one triple in one adjacency layout, iterable row by row
/// together with their property groups.
#[derive(Debug)]
pub struct EdgesCollection {
    edge_info: Arc<EdgeInfo>,
    adj_type: AdjListType,
    prefix: String,
}

impl EdgesCollection {
    /// Create a collection over the given triple and layout of `graph_info`.
    pub fn new(
        graph_info: &GraphInfo,
        src_label: &str,
        edge_label: &str,
        dst_label: &str,
        adj_type: AdjListType,
    ) -> GarResult<Self> {
        let edge_info = graph_info
            .edge_info(src_label, edge_label, dst_label)?
            .clone();
        edge_info.adj_list(adj_type)?;
        Ok(Self {
            edge_info,
            adj_type,
            prefix: graph_info.prefix().to_string(),
        })
    }

    /// The total number of edges of this layout.
    pub fn size(&self) -> GarResult<IdType> {
        let reader =
            AdjListChunkReader::new(self.edge_info.clone(), self.adj_type, self.prefix.clone())?;
        let mut total = 0;
        for vertex_chunk in 0..reader.vertex_chunk_num() {
            total += reader.edges_num(vertex_chunk)?;
        }
        Ok(total)
    }

    /// Iterate every edge from the first non-empty vertex chunk.
    pub fn iter(&self) -> GarResult<EdgeIter> {
        let (adj, props) = self.make_readers()?;
        Ok(EdgeIter::new(adj, props))
    }

    /// Iterate from the first edge of source `id`. Only legal for layouts
    /// aligned by source.
    pub fn iter_from_src(&self, id: IdType) -> GarResult<EdgeIter> {
        let (mut adj, mut props) = self.make_readers()?;
        adj.seek_src(id)?;
        for reader in &mut props {
            reader.seek_src(id)?;
        }
        Ok(EdgeIter::new(adj, props))
    }

    /// Iterate from the first edge of destination `id`. Only legal for
    /// layouts aligned by destination.
    pub fn iter_from_dst(&self, id: IdType) -> GarResult<EdgeIter> {
        let (mut adj, mut props) = self.make_readers()?;
        adj.seek_dst(id)?;
        for reader in &mut props {
            reader.seek_dst(id)?;
        }
        Ok(EdgeIter::new(adj, props))
    }

    fn make_readers(
        &self,
    ) -> GarResult<(AdjListChunkReader, Vec<AdjListPropertyChunkReader>)> {
        let adj =
            AdjListChunkReader::new(self.edge_info.clone(), self.adj_type, self.prefix.clone())?;
        let props = self
            .edge_info
            .adj_list(self.adj_type)?
            .property_groups()
            .iter()
            .map(|group| {
                AdjListPropertyChunkReader::new(
                    self.edge_info.clone(),
                    group.clone(),
                    self.adj_type,
                    self.prefix.clone(),
                )
            })
            .collect::<GarResult<Vec<_>>>()?;
        Ok((adj, props))
    }
}

#[derive(Debug)]
struct EdgeChunk {
    adj: RecordBatch,
    props: Vec<RecordBatch>,
}

/// A forward iterator over the edges of one layout.
#[derive(Debug)]
pub struct EdgeIter {
    adj: AdjListChunkReader,
    props: Vec<AdjListPropertyChunkReader>,
    chunk: Option<Arc<EdgeChunk>>,
    row: usize,
    done: bool,
}

impl EdgeIter {
    fn new(adj: AdjListChunkReader, props: Vec<AdjListPropertyChunkReader>) -> Self {
        Self {
            adj,
            props,
            chunk: None,
            row: 0,
            done: false,
        }
    }

    fn load_chunk(&mut self) -> GarResult<Arc<EdgeChunk>> {
        let adj = self.adj.get_chunk()?;
        let props = self
            .props
            .iter_mut()
            .map(|reader| reader.get_chunk())
            .collect::<GarResult<Vec<_>>>()?;
        let chunk = Arc::new(EdgeChunk { adj, props });
        self.chunk = Some(chunk.clone());
        self.row = 0;
        Ok(chunk)
    }

    /// Move every reader to the next sub-chunk; `Ok(false)` is the end.
    fn advance_readers(&mut self) -> GarResult<bool> {
        match self.adj.next_chunk() {
            Ok(()) => {}
            Err(e) if e.is_index_out_of_range() => return Ok(false),
            Err(e) => return Err(e),
        }
        for reader in &mut self.props {
            reader.next_chunk()?;
        }
        self.chunk = None;
        Ok(true)
    }
}

impl Iterator for EdgeIter {
    type Item = GarResult<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            // a vertex chunk with no edges has no chunk files to decode
            if self.chunk.is_none() && self.adj.row_num_of_chunk() == 0 {
                match self.advance_readers() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.done = true;
                        return None;
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
            let chunk = match &self.chunk {
                Some(chunk) => chunk.clone(),
                None => match self.load_chunk() {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
            };
            if self.row < chunk.adj.num_rows() {
                let edge = match Edge::new(chunk, self.row) {
                    Ok(edge) => edge,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                };
                self.row += 1;
                return Some(Ok(edge));
            }
            match self.advance_readers() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// One edge row, keeping its chunk's decoded tables alive.
pub struct Edge {
    source: IdType,
    destination: IdType,
    row: usize,
    chunk: Arc<EdgeChunk>,
}

impl Edge {
    fn new(chunk: Arc<EdgeChunk>, row: usize) -> GarResult<Self> {
        let source = adjacency_id(&chunk.adj, consts::SRC_INDEX_COL, row)?;
        let destination = adjacency_id(&chunk.adj, consts::DST_INDEX_COL, row)?;
        Ok(Self {
            source,
            destination,
            row,
            chunk,
        })
    }

    /// The source vertex id.
    pub fn source(&self) -> IdType {
        self.source
    }

    /// The destination vertex id.
    pub fn destination(&self) -> IdType {
        self.destination
    }

    /// Decode the named edge property as an owned value.
    pub fn property<T: NativeType>(&self, name: &str) -> GarResult<T> {
        for table in &self.chunk.props {
            if let Some(column) = table.column_by_name(name) {
                return T::from_column(column, self.row);
            }
        }
        Err(gar_err!(KeyNotFound: "property {:?}", name))
    }
}

fn adjacency_id(batch: &RecordBatch, column: &str, row: usize) -> GarResult<IdType> {
    let column = batch
        .column_by_name(column)
        .ok_or_else(|| gar_err!(KeyNotFound: "adjacency column {:?}", column))?;
    IdType::from_column(column, row)
}
