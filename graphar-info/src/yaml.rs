//! The raw serde shape of the YAML documents, kept separate from the
//! validated public structs.

use std::path::Path;
use std::sync::Arc;

use graphar_dtype::DataType;
use graphar_error::GarResult;
use serde::{Deserialize, Serialize};

use crate::{
    AdjList, AdjListType, EdgeInfo, GraphInfo, InfoVersion, Property, PropertyGroup, VertexInfo,
};

#[derive(Debug, Serialize, Deserialize)]
struct PropertyDoc {
    name: String,
    data_type: String,
    is_primary: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct PropertyGroupDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    file_type: String,
    properties: Vec<PropertyDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VertexInfoDoc {
    label: String,
    chunk_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    version: String,
    property_groups: Vec<PropertyGroupDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AdjListDoc {
    ordered: bool,
    aligned_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    file_type: String,
    #[serde(default)]
    property_groups: Vec<PropertyGroupDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeInfoDoc {
    src_label: String,
    edge_label: String,
    dst_label: String,
    chunk_size: i64,
    src_chunk_size: i64,
    dst_chunk_size: i64,
    directed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    version: String,
    adj_lists: Vec<AdjListDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GraphInfoDoc {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    version: String,
    #[serde(default)]
    vertices: Vec<String>,
    #[serde(default)]
    edges: Vec<String>,
}

fn property_from_doc(doc: PropertyDoc) -> GarResult<Property> {
    Ok(Property {
        name: doc.name,
        data_type: doc.data_type.parse::<DataType>()?,
        is_primary: doc.is_primary,
    })
}

fn property_group_from_doc(doc: PropertyGroupDoc) -> GarResult<Arc<PropertyGroup>> {
    let properties = doc
        .properties
        .into_iter()
        .map(property_from_doc)
        .collect::<GarResult<Vec<_>>>()?;
    Ok(Arc::new(PropertyGroup::new(
        properties,
        doc.file_type.parse()?,
        doc.prefix,
    )?))
}

fn property_group_to_doc(group: &PropertyGroup) -> PropertyGroupDoc {
    PropertyGroupDoc {
        prefix: Some(group.prefix().to_string()),
        file_type: group.file_type().to_string(),
        properties: group
            .properties()
            .iter()
            .map(|p| PropertyDoc {
                name: p.name.clone(),
                data_type: p.data_type.to_string(),
                is_primary: p.is_primary,
            })
            .collect(),
    }
}

pub(crate) fn vertex_info_from_yaml(yaml: &str) -> GarResult<VertexInfo> {
    let doc: VertexInfoDoc = serde_yaml::from_str(yaml)?;
    let property_groups = doc
        .property_groups
        .into_iter()
        .map(property_group_from_doc)
        .collect::<GarResult<Vec<_>>>()?;
    VertexInfo::new(
        doc.label,
        doc.chunk_size,
        property_groups,
        doc.prefix,
        doc.version.parse::<InfoVersion>()?,
    )
}

pub(crate) fn vertex_info_to_yaml(info: &VertexInfo) -> GarResult<String> {
    let doc = VertexInfoDoc {
        label: info.label().to_string(),
        chunk_size: info.chunk_size(),
        prefix: Some(info.prefix().to_string()),
        version: info.version().to_string(),
        property_groups: info
            .property_groups()
            .iter()
            .map(|g| property_group_to_doc(g))
            .collect(),
    };
    Ok(serde_yaml::to_string(&doc)?)
}

pub(crate) fn edge_info_from_yaml(yaml: &str) -> GarResult<EdgeInfo> {
    let doc: EdgeInfoDoc = serde_yaml::from_str(yaml)?;
    let adj_lists = doc
        .adj_lists
        .into_iter()
        .map(|adj| {
            let adj_type = AdjListType::from_parts(adj.ordered, &adj.aligned_by)?;
            let property_groups = adj
                .property_groups
                .into_iter()
                .map(property_group_from_doc)
                .collect::<GarResult<Vec<_>>>()?;
            Ok(AdjList::new(
                adj_type,
                adj.file_type.parse()?,
                adj.prefix,
                property_groups,
            ))
        })
        .collect::<GarResult<Vec<_>>>()?;
    EdgeInfo::new(
        doc.src_label,
        doc.edge_label,
        doc.dst_label,
        doc.chunk_size,
        doc.src_chunk_size,
        doc.dst_chunk_size,
        doc.directed,
        adj_lists,
        doc.prefix,
        doc.version.parse::<InfoVersion>()?,
    )
}

pub(crate) fn edge_info_to_yaml(info: &EdgeInfo) -> GarResult<String> {
    let doc = EdgeInfoDoc {
        src_label: info.src_label().to_string(),
        edge_label: info.edge_label().to_string(),
        dst_label: info.dst_label().to_string(),
        chunk_size: info.chunk_size(),
        src_chunk_size: info.src_chunk_size(),
        dst_chunk_size: info.dst_chunk_size(),
        directed: info.is_directed(),
        prefix: Some(info.prefix().to_string()),
        version: info.version().to_string(),
        adj_lists: info
            .adj_lists()
            .iter()
            .map(|adj| AdjListDoc {
                ordered: adj.adj_type().is_ordered(),
                aligned_by: adj.adj_type().aligned_by().to_string(),
                prefix: Some(adj.prefix().to_string()),
                file_type: adj.file_type().to_string(),
                property_groups: adj
                    .property_groups()
                    .iter()
                    .map(|g| property_group_to_doc(g))
                    .collect(),
            })
            .collect(),
    };
    Ok(serde_yaml::to_string(&doc)?)
}

pub(crate) fn graph_info_from_yaml(yaml: &str, base: &Path) -> GarResult<GraphInfo> {
    let doc: GraphInfoDoc = serde_yaml::from_str(yaml)?;
    let prefix = doc
        .prefix
        .unwrap_or_else(|| base.to_string_lossy().into_owned());
    let vertex_infos = doc
        .vertices
        .iter()
        .map(|rel| VertexInfo::load(base.join(rel)).map(Arc::new))
        .collect::<GarResult<Vec<_>>>()?;
    let edge_infos = doc
        .edges
        .iter()
        .map(|rel| EdgeInfo::load(base.join(rel)).map(Arc::new))
        .collect::<GarResult<Vec<_>>>()?;
    Ok(GraphInfo::new(
        doc.name,
        prefix,
        doc.version.parse::<InfoVersion>()?,
        vertex_infos,
        edge_infos,
    )
    .with_document_paths(doc.vertices, doc.edges))
}

pub(crate) fn graph_info_to_yaml(info: &GraphInfo) -> GarResult<String> {
    let doc = GraphInfoDoc {
        name: info.name().to_string(),
        prefix: Some(info.prefix().to_string()),
        version: info.version().to_string(),
        vertices: info.vertex_paths().to_vec(),
        edges: info.edge_paths().to_vec(),
    };
    Ok(serde_yaml::to_string(&doc)?)
}
