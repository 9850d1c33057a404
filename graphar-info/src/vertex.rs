use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use graphar_dtype::{DataType, IdType};
use graphar_error::{GarResult, gar_bail, gar_err};

use crate::{InfoVersion, PropertyGroup, consts, ensure_dir_prefix};

/// The metadata of one vertex label: its chunking and its property groups.
///
/// Chunk `k` covers vertex ids `[k * chunk_size, (k + 1) * chunk_size)`; the
/// last chunk may be short.
#[derive(Debug, Clone)]
pub struct VertexInfo {
    label: String,
    chunk_size: IdType,
    prefix: String,
    version: InfoVersion,
    property_groups: Vec<Arc<PropertyGroup>>,
}

impl VertexInfo {
    /// Create a vertex info. When `prefix` is `None` it defaults to
    /// `vertex/<label>/`.
    pub fn new(
        label: impl Into<String>,
        chunk_size: IdType,
        property_groups: Vec<Arc<PropertyGroup>>,
        prefix: Option<String>,
        version: InfoVersion,
    ) -> GarResult<Self> {
        let label = label.into();
        let prefix = match prefix {
            Some(prefix) if !prefix.is_empty() => ensure_dir_prefix(&prefix),
            _ => format!("vertex/{}/", label),
        };
        let info = Self {
            label,
            chunk_size,
            prefix,
            version,
            property_groups,
        };
        info.validate()?;
        Ok(info)
    }

    /// The vertex label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The number of vertices per chunk.
    pub fn chunk_size(&self) -> IdType {
        self.chunk_size
    }

    /// The directory of this label's chunks, relative to the graph prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The format version of the source document.
    pub fn version(&self) -> &InfoVersion {
        &self.version
    }

    /// All property groups of this label.
    pub fn property_groups(&self) -> &[Arc<PropertyGroup>] {
        &self.property_groups
    }

    /// The group storing the named property.
    pub fn property_group(&self, property: &str) -> GarResult<&Arc<PropertyGroup>> {
        self.property_groups
            .iter()
            .find(|group| group.has_property(property))
            .ok_or_else(|| {
                gar_err!(KeyNotFound: "property {:?} of vertex label {:?}", property, self.label)
            })
    }

    /// Whether any group stores the named property.
    pub fn has_property(&self, property: &str) -> bool {
        self.property_groups
            .iter()
            .any(|group| group.has_property(property))
    }

    /// Whether `group` is one of this label's property groups.
    pub fn has_property_group(&self, group: &PropertyGroup) -> bool {
        self.property_groups.iter().any(|g| g.as_ref() == group)
    }

    fn property(&self, property: &str) -> GarResult<&crate::Property> {
        self.property_group(property)?
            .property(property)
            .ok_or_else(|| {
                gar_err!(KeyNotFound: "property {:?} of vertex label {:?}", property, self.label)
            })
    }

    /// The declared type of the named property.
    pub fn property_type(&self, property: &str) -> GarResult<&DataType> {
        self.property(property).map(|p| &p.data_type)
    }

    /// Whether the named property is the primary key.
    pub fn is_primary_key(&self, property: &str) -> GarResult<bool> {
        self.property(property).map(|p| p.is_primary)
    }

    /// A copy of this info extended with one more property group.
    pub fn with_property_group(&self, group: Arc<PropertyGroup>) -> GarResult<Self> {
        for property in group.property_names() {
            if self.has_property(property) {
                gar_bail!(
                    "property {:?} already declared for vertex label {:?}",
                    property,
                    self.label
                );
            }
        }
        let mut extended = self.clone();
        extended.property_groups.push(group);
        extended.validate()?;
        Ok(extended)
    }

    /// The chunk file of `group` at `chunk_index`, relative to the graph
    /// prefix.
    pub fn file_path(&self, group: &PropertyGroup, chunk_index: IdType) -> GarResult<String> {
        if !self.has_property_group(group) {
            gar_bail!(KeyNotFound: "property group {:?} of vertex label {:?}", group.prefix(), self.label);
        }
        Ok(format!(
            "{}{}{}{}",
            self.prefix,
            group.prefix(),
            consts::CHUNK_FILE_PREFIX,
            chunk_index
        ))
    }

    /// The chunk directory of `group`, relative to the graph prefix.
    pub fn path_prefix(&self, group: &PropertyGroup) -> GarResult<String> {
        if !self.has_property_group(group) {
            gar_bail!(KeyNotFound: "property group {:?} of vertex label {:?}", group.prefix(), self.label);
        }
        Ok(format!("{}{}", self.prefix, group.prefix()))
    }

    /// The vertex count file, relative to the graph prefix.
    pub fn vertices_num_file_path(&self) -> String {
        format!("{}{}", self.prefix, consts::VERTEX_COUNT_FILE)
    }

    /// Check the structural invariants of this info.
    pub fn validate(&self) -> GarResult<()> {
        if self.label.is_empty() {
            gar_bail!("vertex label must not be empty");
        }
        if self.chunk_size <= 0 {
            gar_bail!("chunk size of vertex label {:?} must be positive", self.label);
        }
        let mut seen = HashSet::new();
        for group in &self.property_groups {
            for property in group.property_names() {
                if !seen.insert(property) {
                    gar_bail!(
                        "property {:?} declared twice for vertex label {:?}",
                        property,
                        self.label
                    );
                }
            }
        }
        Ok(())
    }

    /// Parse a vertex info from a YAML document.
    pub fn from_yaml(yaml: &str) -> GarResult<Self> {
        crate::yaml::vertex_info_from_yaml(yaml)
    }

    /// Serialise this info back to a YAML document.
    pub fn dump(&self) -> GarResult<String> {
        crate::yaml::vertex_info_to_yaml(self)
    }

    /// Load a vertex info from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> GarResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Write this info to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> GarResult<()> {
        Ok(std::fs::write(path, self.dump()?)?)
    }
}
