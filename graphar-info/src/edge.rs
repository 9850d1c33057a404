use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use graphar_dtype::{DataType, IdType};
use graphar_error::{GarResult, gar_bail, gar_err};

use crate::{AdjListType, FileType, InfoVersion, PropertyGroup, consts, ensure_dir_prefix};

/// One adjacency layout variant of an edge triple: where its chunks live,
/// how they are encoded, and which property groups ride along on the same
/// `(vertex chunk, edge sub-chunk)` grid.
#[derive(Debug, Clone)]
pub struct AdjList {
    adj_type: AdjListType,
    file_type: FileType,
    prefix: String,
    property_groups: Vec<Arc<PropertyGroup>>,
}

impl AdjList {
    /// Create an adjacency list entry. When `prefix` is `None` it defaults
    /// to the layout name, e.g. `ordered_by_source/`.
    pub fn new(
        adj_type: AdjListType,
        file_type: FileType,
        prefix: Option<String>,
        property_groups: Vec<Arc<PropertyGroup>>,
    ) -> Self {
        let prefix = match prefix {
            Some(prefix) if !prefix.is_empty() => ensure_dir_prefix(&prefix),
            _ => format!("{}/", adj_type),
        };
        Self {
            adj_type,
            file_type,
            prefix,
            property_groups,
        }
    }

    /// The layout of this entry.
    pub fn adj_type(&self) -> AdjListType {
        self.adj_type
    }

    /// The format of the adjacency and offset chunks.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// The directory of this layout, relative to the edge prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The edge property groups stored on this layout's chunk grid.
    pub fn property_groups(&self) -> &[Arc<PropertyGroup>] {
        &self.property_groups
    }

    /// The group storing the named property.
    pub fn property_group(&self, property: &str) -> Option<&Arc<PropertyGroup>> {
        self.property_groups
            .iter()
            .find(|group| group.has_property(property))
    }
}

/// The metadata of one `(src_label, edge_label, dst_label)` triple.
///
/// Edges are partitioned twice: the aligned side's vertices fall into vertex
/// chunks of `src_chunk_size` (or `dst_chunk_size`), and each vertex chunk's
/// edges are cut into sub-chunks of `chunk_size` rows.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    src_label: String,
    edge_label: String,
    dst_label: String,
    chunk_size: IdType,
    src_chunk_size: IdType,
    dst_chunk_size: IdType,
    directed: bool,
    prefix: String,
    version: InfoVersion,
    adj_lists: Vec<AdjList>,
}

impl EdgeInfo {
    /// Create an edge info. When `prefix` is `None` it defaults to
    /// `edge/<src>_<edge>_<dst>/`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        src_label: impl Into<String>,
        edge_label: impl Into<String>,
        dst_label: impl Into<String>,
        chunk_size: IdType,
        src_chunk_size: IdType,
        dst_chunk_size: IdType,
        directed: bool,
        adj_lists: Vec<AdjList>,
        prefix: Option<String>,
        version: InfoVersion,
    ) -> GarResult<Self> {
        let src_label = src_label.into();
        let edge_label = edge_label.into();
        let dst_label = dst_label.into();
        let prefix = match prefix {
            Some(prefix) if !prefix.is_empty() => ensure_dir_prefix(&prefix),
            _ => format!("edge/{}_{}_{}/", src_label, edge_label, dst_label),
        };
        let info = Self {
            src_label,
            edge_label,
            dst_label,
            chunk_size,
            src_chunk_size,
            dst_chunk_size,
            directed,
            prefix,
            version,
            adj_lists,
        };
        info.validate()?;
        Ok(info)
    }

    /// The source vertex label.
    pub fn src_label(&self) -> &str {
        &self.src_label
    }

    /// The edge label.
    pub fn edge_label(&self) -> &str {
        &self.edge_label
    }

    /// The destination vertex label.
    pub fn dst_label(&self) -> &str {
        &self.dst_label
    }

    /// The number of edge rows per sub-chunk.
    pub fn chunk_size(&self) -> IdType {
        self.chunk_size
    }

    /// The vertex chunk size of the source side.
    pub fn src_chunk_size(&self) -> IdType {
        self.src_chunk_size
    }

    /// The vertex chunk size of the destination side.
    pub fn dst_chunk_size(&self) -> IdType {
        self.dst_chunk_size
    }

    /// Whether the stored graph is directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// The directory of this triple's chunks, relative to the graph prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The format version of the source document.
    pub fn version(&self) -> &InfoVersion {
        &self.version
    }

    /// All adjacency layout entries.
    pub fn adj_lists(&self) -> &[AdjList] {
        &self.adj_lists
    }

    /// Whether the triple is stored with the given layout.
    pub fn has_adj_list(&self, adj_type: AdjListType) -> bool {
        self.adj_lists.iter().any(|a| a.adj_type == adj_type)
    }

    /// The adjacency entry for the given layout.
    pub fn adj_list(&self, adj_type: AdjListType) -> GarResult<&AdjList> {
        self.adj_lists
            .iter()
            .find(|a| a.adj_type == adj_type)
            .ok_or_else(|| {
                gar_err!(
                    KeyNotFound:
                    "adjacency layout {} of edge {:?}",
                    adj_type,
                    self.edge_label
                )
            })
    }

    /// The vertex chunk size of the side the given layout is aligned with.
    pub fn vertex_chunk_size(&self, adj_type: AdjListType) -> GarResult<IdType> {
        self.adj_list(adj_type).map(|a| {
            if a.adj_type().is_aligned_by_src() {
                self.src_chunk_size
            } else {
                self.dst_chunk_size
            }
        })
    }

    /// The group storing the named edge property, searching every layout.
    pub fn property_group(&self, property: &str) -> GarResult<&Arc<PropertyGroup>> {
        self.adj_lists
            .iter()
            .find_map(|a| a.property_group(property))
            .ok_or_else(|| {
                gar_err!(KeyNotFound: "property {:?} of edge {:?}", property, self.edge_label)
            })
    }

    /// The declared type of the named edge property.
    pub fn property_type(&self, property: &str) -> GarResult<&DataType> {
        self.property_group(property)?
            .property(property)
            .map(|p| &p.data_type)
            .ok_or_else(|| {
                gar_err!(KeyNotFound: "property {:?} of edge {:?}", property, self.edge_label)
            })
    }

    /// The adjacency chunk file for vertex chunk `i`, sub-chunk `j`,
    /// relative to the graph prefix.
    pub fn adj_list_file_path(
        &self,
        vertex_chunk_index: IdType,
        chunk_index: IdType,
        adj_type: AdjListType,
    ) -> GarResult<String> {
        let adj = self.adj_list(adj_type)?;
        Ok(format!(
            "{}{}adj_list/{}{}/{}{}",
            self.prefix,
            adj.prefix(),
            consts::PART_DIR_PREFIX,
            vertex_chunk_index,
            consts::CHUNK_FILE_PREFIX,
            chunk_index
        ))
    }

    /// The offset chunk file for vertex chunk `i`. Only ordered layouts
    /// carry offsets.
    pub fn offset_file_path(
        &self,
        vertex_chunk_index: IdType,
        adj_type: AdjListType,
    ) -> GarResult<String> {
        let adj = self.adj_list(adj_type)?;
        if !adj_type.is_ordered() {
            gar_bail!("layout {} carries no offset chunks", adj_type);
        }
        Ok(format!(
            "{}{}offset/{}{}",
            self.prefix,
            adj.prefix(),
            consts::CHUNK_FILE_PREFIX,
            vertex_chunk_index
        ))
    }

    /// The chunk file of an edge property group at `(i, j)`, relative to the
    /// graph prefix.
    pub fn property_file_path(
        &self,
        group: &PropertyGroup,
        adj_type: AdjListType,
        vertex_chunk_index: IdType,
        chunk_index: IdType,
    ) -> GarResult<String> {
        let adj = self.adj_list(adj_type)?;
        if !adj.property_groups.iter().any(|g| g.as_ref() == group) {
            gar_bail!(
                KeyNotFound:
                "property group {:?} of edge {:?} with layout {}",
                group.prefix(),
                self.edge_label,
                adj_type
            );
        }
        Ok(format!(
            "{}{}{}{}{}/{}{}",
            self.prefix,
            adj.prefix(),
            group.prefix(),
            consts::PART_DIR_PREFIX,
            vertex_chunk_index,
            consts::CHUNK_FILE_PREFIX,
            chunk_index
        ))
    }

    /// The aligned-side vertex count file of the given layout, relative to
    /// the graph prefix.
    pub fn vertices_num_file_path(&self, adj_type: AdjListType) -> GarResult<String> {
        let adj = self.adj_list(adj_type)?;
        Ok(format!(
            "{}{}{}",
            self.prefix,
            adj.prefix(),
            consts::VERTEX_COUNT_FILE
        ))
    }

    /// The edge count file of vertex chunk `i`, relative to the graph
    /// prefix.
    pub fn edges_num_file_path(
        &self,
        vertex_chunk_index: IdType,
        adj_type: AdjListType,
    ) -> GarResult<String> {
        let adj = self.adj_list(adj_type)?;
        Ok(format!(
            "{}{}{}{}",
            self.prefix,
            adj.prefix(),
            consts::EDGE_COUNT_FILE_PREFIX,
            vertex_chunk_index
        ))
    }

    /// Check the structural invariants of this info.
    pub fn validate(&self) -> GarResult<()> {
        if self.src_label.is_empty() || self.edge_label.is_empty() || self.dst_label.is_empty() {
            gar_bail!("edge labels must not be empty");
        }
        if self.chunk_size <= 0 || self.src_chunk_size <= 0 || self.dst_chunk_size <= 0 {
            gar_bail!("chunk sizes of edge {:?} must be positive", self.edge_label);
        }
        if self.adj_lists.is_empty() {
            gar_bail!("edge {:?} declares no adjacency layout", self.edge_label);
        }
        let mut layouts = HashSet::new();
        for adj in &self.adj_lists {
            if !layouts.insert(adj.adj_type) {
                gar_bail!(
                    "adjacency layout {} declared twice for edge {:?}",
                    adj.adj_type,
                    self.edge_label
                );
            }
            let mut seen = HashSet::new();
            for group in &adj.property_groups {
                for property in group.property_names() {
                    if !seen.insert(property) {
                        gar_bail!(
                            "property {:?} declared twice for edge {:?}",
                            property,
                            self.edge_label
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse an edge info from a YAML document.
    pub fn from_yaml(yaml: &str) -> GarResult<Self> {
        crate::yaml::edge_info_from_yaml(yaml)
    }

    /// Serialise this info back to a YAML document.
    pub fn dump(&self) -> GarResult<String> {
        crate::yaml::edge_info_to_yaml(self)
    }

    /// Load an edge info from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> GarResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Write this info to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> GarResult<()> {
        Ok(std::fs::write(path, self.dump()?)?)
    }
}
