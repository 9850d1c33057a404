use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use graphar_error::{GarResult, gar_err};

use crate::{EdgeInfo, InfoVersion, VertexInfo, ensure_dir_prefix};

/// The root metadata of an archive: the graph name, the prefix every chunk
/// path is resolved against, and the loaded vertex/edge infos.
#[derive(Debug, Clone)]
pub struct GraphInfo {
    name: String,
    prefix: String,
    version: InfoVersion,
    vertex_infos: HashMap<String, Arc<VertexInfo>>,
    edge_infos: HashMap<(String, String, String), Arc<EdgeInfo>>,
    vertex_paths: Vec<String>,
    edge_paths: Vec<String>,
}

impl GraphInfo {
    /// Assemble a graph info from already-loaded parts. The referenced
    /// document paths default to `<label>.vertex.yml` and
    /// `<src>_<edge>_<dst>.edge.yml`.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        version: InfoVersion,
        vertex_infos: Vec<Arc<VertexInfo>>,
        edge_infos: Vec<Arc<EdgeInfo>>,
    ) -> Self {
        let vertex_paths = vertex_infos
            .iter()
            .map(|v| format!("{}.vertex.yml", v.label()))
            .collect();
        let edge_paths = edge_infos
            .iter()
            .map(|e| {
                format!(
                    "{}_{}_{}.edge.yml",
                    e.src_label(),
                    e.edge_label(),
                    e.dst_label()
                )
            })
            .collect();
        Self {
            name: name.into(),
            prefix: ensure_dir_prefix(&prefix.into()),
            version,
            vertex_infos: vertex_infos
                .into_iter()
                .map(|v| (v.label().to_string(), v))
                .collect(),
            edge_infos: edge_infos
                .into_iter()
                .map(|e| {
                    (
                        (
                            e.src_label().to_string(),
                            e.edge_label().to_string(),
                            e.dst_label().to_string(),
                        ),
                        e,
                    )
                })
                .collect(),
            vertex_paths,
            edge_paths,
        }
    }

    /// Keep the document paths listed by a loaded graph document.
    pub(crate) fn with_document_paths(
        mut self,
        vertex_paths: Vec<String>,
        edge_paths: Vec<String>,
    ) -> Self {
        self.vertex_paths = vertex_paths;
        self.edge_paths = edge_paths;
        self
    }

    /// Load a graph info document and every vertex/edge info it references.
    ///
    /// Referenced documents are resolved relative to the graph document's
    /// directory; the graph prefix defaults to that directory when the
    /// document does not set one.
    pub fn load(path: impl AsRef<Path>) -> GarResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        crate::yaml::graph_info_from_yaml(&yaml, base)
    }

    /// The graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prefix all chunk paths are relative to. Ends with `/` when
    /// non-empty.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The format version of the source document.
    pub fn version(&self) -> &InfoVersion {
        &self.version
    }

    /// All vertex infos, keyed by label.
    pub fn vertex_infos(&self) -> &HashMap<String, Arc<VertexInfo>> {
        &self.vertex_infos
    }

    /// All edge infos, keyed by `(src, edge, dst)`.
    pub fn edge_infos(&self) -> &HashMap<(String, String, String), Arc<EdgeInfo>> {
        &self.edge_infos
    }

    /// The info of the given vertex label.
    pub fn vertex_info(&self, label: &str) -> GarResult<&Arc<VertexInfo>> {
        self.vertex_infos
            .get(label)
            .ok_or_else(|| gar_err!(KeyNotFound: "vertex label {:?}", label))
    }

    /// The info of the given edge triple.
    pub fn edge_info(
        &self,
        src_label: &str,
        edge_label: &str,
        dst_label: &str,
    ) -> GarResult<&Arc<EdgeInfo>> {
        self.edge_infos
            .get(&(
                src_label.to_string(),
                edge_label.to_string(),
                dst_label.to_string(),
            ))
            .ok_or_else(|| {
                gar_err!(KeyNotFound: "edge triple {:?}-{:?}-{:?}", src_label, edge_label, dst_label)
            })
    }

    /// The vertex document paths listed by the graph document, relative to
    /// its directory.
    pub fn vertex_paths(&self) -> &[String] {
        &self.vertex_paths
    }

    /// The edge document paths listed by the graph document, relative to
    /// its directory.
    pub fn edge_paths(&self) -> &[String] {
        &self.edge_paths
    }

    /// Serialise the graph document back to YAML. The referenced vertex and
    /// edge documents are saved separately through their own infos.
    pub fn dump(&self) -> GarResult<String> {
        crate::yaml::graph_info_to_yaml(self)
    }

    /// Write the graph document to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> GarResult<()> {
        Ok(std::fs::write(path, self.dump()?)?)
    }
}
