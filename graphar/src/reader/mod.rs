//! The chunk readers.
//!
//! Every reader follows the same protocol: construction resolves metadata
//! (failing with a key-not-found error for undeclared labels, triples,
//! properties or layouts), `seek*` operations move the cursor to the chunk
//! containing the target, `get_chunk` decodes the current chunk, and
//! `next_chunk` advances to the next non-empty chunk, failing with an
//! index-out-of-range error past the end — that error is the terminal
//! condition iteration loops observe, not an exceptional state.

use std::path::PathBuf;
use std::sync::Arc;

use arrow_schema::{DataType as ArrowDataType, Field, Schema, SchemaRef};
use graphar_dtype::IdType;
use graphar_error::GarResult;
use graphar_fs::ScanOptions;
use graphar_info::{PropertyGroup, VertexInfo, consts};

mod adj_list;
mod adj_list_offset;
mod adj_list_property;
mod vertex_property;

pub use adj_list::AdjListChunkReader;
pub use adj_list_offset::AdjListOffsetChunkReader;
pub use adj_list_property::AdjListPropertyChunkReader;
pub use vertex_property::VertexPropertyChunkReader;

pub(crate) fn absolute(prefix: &str, relative: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", prefix, relative))
}

pub(crate) fn ceil_div(num: IdType, size: IdType) -> IdType {
    (num + size - 1) / size
}

/// The canonical Arrow schema of a property group's chunk files.
pub(crate) fn group_schema(group: &PropertyGroup) -> GarResult<SchemaRef> {
    let fields = group
        .properties()
        .iter()
        .map(|p| Ok(Field::new(&p.name, p.data_type.to_arrow()?, true)))
        .collect::<GarResult<Vec<_>>>()?;
    Ok(Arc::new(Schema::new(fields)))
}

/// The fixed schema of adjacency chunk files.
pub(crate) fn adj_list_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(consts::SRC_INDEX_COL, ArrowDataType::Int64, false),
        Field::new(consts::DST_INDEX_COL, ArrowDataType::Int64, false),
    ]))
}

/// The number of vertices of a label: the `vertex_count` file when present,
/// otherwise discovered by probing chunk files of the label's first property
/// group and reading the last one's row count.
pub(crate) fn discover_vertices_num(vertex_info: &VertexInfo, prefix: &str) -> GarResult<IdType> {
    let count_path = absolute(prefix, &vertex_info.vertices_num_file_path());
    match graphar_fs::read_id(&count_path) {
        Ok(vertex_num) => return Ok(vertex_num),
        // fall back to probing when the count file does not exist
        Err(e) if e.is_io() => {}
        Err(e) => return Err(e),
    }
    log::debug!(
        "no vertex count file for label {:?}, probing chunks",
        vertex_info.label()
    );
    let Some(group) = vertex_info.property_groups().first() else {
        return Ok(0);
    };
    let chunk_num = graphar_fs::chunk_count_by_probe(|chunk_index| {
        Ok(absolute(prefix, &vertex_info.file_path(group, chunk_index)?))
    })?;
    if chunk_num == 0 {
        return Ok(0);
    }
    let last_path = absolute(prefix, &vertex_info.file_path(group, chunk_num - 1)?);
    let last = graphar_fs::read_chunk(
        &last_path,
        group.file_type(),
        &group_schema(group)?,
        &ScanOptions::new(),
    )?;
    Ok((chunk_num - 1) * vertex_info.chunk_size() + last.num_rows() as IdType)
}
