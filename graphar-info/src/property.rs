use graphar_dtype::DataType;
use graphar_error::{GarResult, gar_bail};
use itertools::Itertools;

use crate::{FileType, ensure_dir_prefix};

/// A single named property of a vertex or edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The property name, unique within its owning info.
    pub name: String,
    /// The value type.
    pub data_type: DataType,
    /// Whether this property is the primary key of its label.
    pub is_primary: bool,
}

impl Property {
    /// Create a property.
    pub fn new(name: impl Into<String>, data_type: DataType, is_primary: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_primary,
        }
    }
}

/// An ordered set of properties stored together, one columnar file per chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyGroup {
    properties: Vec<Property>,
    file_type: FileType,
    prefix: String,
}

impl PropertyGroup {
    /// Create a property group. When `prefix` is `None` it defaults to the
    /// property names joined with `_`, as a directory.
    pub fn new(
        properties: Vec<Property>,
        file_type: FileType,
        prefix: Option<String>,
    ) -> GarResult<Self> {
        if properties.is_empty() {
            gar_bail!("a property group must declare at least one property");
        }
        let prefix = match prefix {
            Some(prefix) if !prefix.is_empty() => ensure_dir_prefix(&prefix),
            _ => format!("{}/", properties.iter().map(|p| &p.name).join("_")),
        };
        Ok(Self {
            properties,
            file_type,
            prefix,
        })
    }

    /// The properties, in storage order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The columnar format of this group's chunk files.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// The directory of this group's chunks, relative to the owning info's
    /// prefix. Always ends with `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Whether this group stores a property with the given name.
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// The column names of this group's chunk files, in order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}
