#![allow(dead_code)]

//! Builds complete archives on disk for the reader tests: a parquet graph
//! shaped like the canonical ldbc sample (903 `person` vertices in chunks
//! of 100, `knows` edges ordered by source) and a small csv graph covering
//! multi-sub-chunk vertex chunks, empty vertex chunks and the unordered
//! and by-destination layouts.

use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, LargeStringArray, RecordBatch};
use arrow_schema::{DataType as ArrowDataType, Field, Schema};
use graphar::{AdjListType, FileType, GraphInfo, IdType, consts};
use tempfile::TempDir;

pub struct SampleGraph {
    pub dir: TempDir,
    pub graph: GraphInfo,
}

pub const PERSON_NUM: IdType = 903;
pub const PERSON_CHUNK_SIZE: IdType = 100;
pub const KNOWS_EDGE_COUNTS: [IdType; 10] = [667, 644, 500, 300, 200, 100, 50, 30, 10, 4];

pub const ACCOUNT_NUM: IdType = 23;
pub const ACCOUNT_CHUNK_SIZE: IdType = 10;
pub const TRANSFER_CHUNK_SIZE: IdType = 4;

fn chunk_path(graph: &GraphInfo, relative: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", graph.prefix(), relative))
}

fn id_batch(names: &[&str], columns: Vec<Vec<i64>>) -> RecordBatch {
    let fields = names
        .iter()
        .map(|n| Field::new(*n, ArrowDataType::Int64, false))
        .collect::<Vec<_>>();
    let arrays = columns
        .into_iter()
        .map(|c| Arc::new(Int64Array::from(c)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn string_batch(names: &[&str], columns: Vec<Vec<String>>) -> RecordBatch {
    let fields = names
        .iter()
        .map(|n| Field::new(*n, ArrowDataType::LargeUtf8, false))
        .collect::<Vec<_>>();
    let arrays = columns
        .into_iter()
        .map(|c| Arc::new(LargeStringArray::from(c)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn offsets_batch(offsets: &[i64]) -> RecordBatch {
    id_batch(&[consts::OFFSET_COL], vec![offsets.to_vec()])
}

fn adj_batch(rows: &[(i64, i64)]) -> RecordBatch {
    id_batch(
        &[consts::SRC_INDEX_COL, consts::DST_INDEX_COL],
        vec![
            rows.iter().map(|r| r.0).collect(),
            rows.iter().map(|r| r.1).collect(),
        ],
    )
}

pub fn creation_date(src: i64, dst: i64) -> String {
    format!("{:04}-{:04}", src, dst)
}

/// The parquet archive most reader tests run against.
pub fn ldbc_sample() -> SampleGraph {
    let dir = tempfile::tempdir().unwrap();
    let person_yaml = r#"
label: person
chunk_size: 100
prefix: vertex/person/
version: gar/v1
property_groups:
  - prefix: id/
    file_type: parquet
    properties:
      - name: id
        data_type: int64
        is_primary: true
  - prefix: firstName_lastName_gender/
    file_type: parquet
    properties:
      - name: firstName
        data_type: string
        is_primary: false
      - name: lastName
        data_type: string
        is_primary: false
      - name: gender
        data_type: string
        is_primary: false
"#;
    let knows_yaml = r#"
src_label: person
edge_label: knows
dst_label: person
chunk_size: 1024
src_chunk_size: 100
dst_chunk_size: 100
directed: false
prefix: edge/person_knows_person/
version: gar/v1
adj_lists:
  - ordered: true
    aligned_by: src
    prefix: ordered_by_source/
    file_type: parquet
    property_groups:
      - prefix: creationDate/
        file_type: parquet
        properties:
          - name: creationDate
            data_type: string
            is_primary: false
"#;
    let graph_yaml = r#"
name: ldbc_sample
version: gar/v1
vertices:
  - person.vertex.yml
edges:
  - person_knows_person.edge.yml
"#;
    std::fs::write(dir.path().join("person.vertex.yml"), person_yaml).unwrap();
    std::fs::write(
        dir.path().join("person_knows_person.edge.yml"),
        knows_yaml,
    )
    .unwrap();
    let graph_path = dir.path().join("ldbc_sample.graph.yml");
    std::fs::write(&graph_path, graph_yaml).unwrap();
    let graph = GraphInfo::load(&graph_path).unwrap();

    write_person_chunks(&graph);
    write_knows_chunks(&graph);
    SampleGraph { dir, graph }
}

fn write_person_chunks(graph: &GraphInfo) {
    let person = graph.vertex_info("person").unwrap();
    graphar_fs::write_id(
        &chunk_path(graph, &person.vertices_num_file_path()),
        PERSON_NUM,
    )
    .unwrap();
    let id_group = person.property_group("id").unwrap();
    let name_group = person.property_group("firstName").unwrap();
    let chunk_num = (PERSON_NUM + PERSON_CHUNK_SIZE - 1) / PERSON_CHUNK_SIZE;
    for k in 0..chunk_num {
        let start = k * PERSON_CHUNK_SIZE;
        let end = PERSON_NUM.min(start + PERSON_CHUNK_SIZE);
        let ids = (start..end).map(|v| 1000 + v).collect();
        graphar_fs::write_chunk(
            &id_batch(&["id"], vec![ids]),
            &chunk_path(graph, &person.file_path(id_group, k).unwrap()),
            FileType::Parquet,
        )
        .unwrap();
        let names = string_batch(
            &["firstName", "lastName", "gender"],
            vec![
                (start..end).map(|v| format!("first{}", v)).collect(),
                (start..end).map(|v| format!("last{}", v)).collect(),
                (start..end)
                    .map(|v| {
                        if v % 2 == 0 { "female" } else { "male" }.to_string()
                    })
                    .collect(),
            ],
        );
        graphar_fs::write_chunk(
            &names,
            &chunk_path(graph, &person.file_path(name_group, k).unwrap()),
            FileType::Parquet,
        )
        .unwrap();
    }
}

/// The `knows` adjacency of vertex chunk `i`, sorted by `(src, dst)`, along
/// with the per-source offsets.
pub fn knows_vertex_chunk(i: usize) -> (Vec<(i64, i64)>, Vec<i64>) {
    let edge_num = KNOWS_EDGE_COUNTS[i];
    let start = i as i64 * PERSON_CHUNK_SIZE;
    let vertices = PERSON_CHUNK_SIZE.min(PERSON_NUM - start);
    let base = edge_num / vertices;
    let remainder = edge_num % vertices;
    let mut rows = Vec::new();
    let mut offsets = vec![0_i64];
    for local in 0..vertices {
        let src = start + local;
        let degree = base + if local < remainder { 1 } else { 0 };
        let mut dsts = (0..degree).map(|t| (src + t + 1) % PERSON_NUM).collect::<Vec<_>>();
        dsts.sort_unstable();
        for dst in dsts {
            rows.push((src, dst));
        }
        offsets.push(rows.len() as i64);
    }
    assert_eq!(rows.len() as i64, edge_num);
    (rows, offsets)
}

fn write_knows_chunks(graph: &GraphInfo) {
    let knows = graph.edge_info("person", "knows", "person").unwrap();
    let adj_type = AdjListType::OrderedBySource;
    graphar_fs::write_id(
        &chunk_path(graph, &knows.vertices_num_file_path(adj_type).unwrap()),
        PERSON_NUM,
    )
    .unwrap();
    let date_group = knows.property_group("creationDate").unwrap();
    for (i, &edge_num) in KNOWS_EDGE_COUNTS.iter().enumerate() {
        let i_id = i as IdType;
        graphar_fs::write_id(
            &chunk_path(graph, &knows.edges_num_file_path(i_id, adj_type).unwrap()),
            edge_num,
        )
        .unwrap();
        let (rows, offsets) = knows_vertex_chunk(i);
        graphar_fs::write_chunk(
            &offsets_batch(&offsets),
            &chunk_path(graph, &knows.offset_file_path(i_id, adj_type).unwrap()),
            FileType::Parquet,
        )
        .unwrap();
        for (j, sub) in rows.chunks(knows.chunk_size() as usize).enumerate() {
            let j_id = j as IdType;
            graphar_fs::write_chunk(
                &adj_batch(sub),
                &chunk_path(
                    graph,
                    &knows.adj_list_file_path(i_id, j_id, adj_type).unwrap(),
                ),
                FileType::Parquet,
            )
            .unwrap();
            let dates = sub
                .iter()
                .map(|&(src, dst)| creation_date(src, dst))
                .collect();
            graphar_fs::write_chunk(
                &string_batch(&["creationDate"], vec![dates]),
                &chunk_path(
                    graph,
                    &knows
                        .property_file_path(date_group, adj_type, i_id, j_id)
                        .unwrap(),
                ),
                FileType::Parquet,
            )
            .unwrap();
        }
    }
}

/// The edge set of the csv graph: `(src, dst)` with `amount = src * 100 + dst`.
pub fn transfer_edges() -> Vec<(i64, i64)> {
    vec![
        (5, 0),
        (7, 0),
        (3, 1),
        (11, 2),
        (11, 4),
        (0, 7),
        (2, 7),
        (21, 8),
        (9, 9),
        (1, 20),
        (2, 20),
        (14, 21),
        (3, 22),
        (22, 22),
    ]
}

/// A csv archive with two layouts of the same edge set. The `account` label
/// has no `vertex_count` file, so vertex counts are discovered by probing;
/// by-destination vertex chunk 1 holds no edges at all.
pub fn csv_sample() -> SampleGraph {
    let dir = tempfile::tempdir().unwrap();
    let account_yaml = r#"
label: account
chunk_size: 10
prefix: vertex/account/
version: gar/v1
property_groups:
  - prefix: id_name/
    file_type: csv
    properties:
      - name: id
        data_type: int64
        is_primary: true
      - name: name
        data_type: string
        is_primary: false
"#;
    let transfer_yaml = r#"
src_label: account
edge_label: transfer
dst_label: account
chunk_size: 4
src_chunk_size: 10
dst_chunk_size: 10
directed: true
prefix: edge/account_transfer_account/
version: gar/v1
adj_lists:
  - ordered: true
    aligned_by: dst
    prefix: ordered_by_dest/
    file_type: csv
    property_groups:
      - prefix: amount/
        file_type: csv
        properties:
          - name: amount
            data_type: int64
            is_primary: false
  - ordered: false
    aligned_by: src
    prefix: unordered_by_source/
    file_type: csv
    property_groups:
      - prefix: amount/
        file_type: csv
        properties:
          - name: amount
            data_type: int64
            is_primary: false
"#;
    let graph_yaml = r#"
name: bank
version: gar/v1
vertices:
  - account.vertex.yml
edges:
  - account_transfer_account.edge.yml
"#;
    std::fs::write(dir.path().join("account.vertex.yml"), account_yaml).unwrap();
    std::fs::write(
        dir.path().join("account_transfer_account.edge.yml"),
        transfer_yaml,
    )
    .unwrap();
    let graph_path = dir.path().join("bank.graph.yml");
    std::fs::write(&graph_path, graph_yaml).unwrap();
    let graph = GraphInfo::load(&graph_path).unwrap();

    write_account_chunks(&graph);
    write_transfer_chunks(&graph);
    SampleGraph { dir, graph }
}

fn write_account_chunks(graph: &GraphInfo) {
    let account = graph.vertex_info("account").unwrap();
    let group = account.property_group("id").unwrap();
    let chunk_num = (ACCOUNT_NUM + ACCOUNT_CHUNK_SIZE - 1) / ACCOUNT_CHUNK_SIZE;
    for k in 0..chunk_num {
        let start = k * ACCOUNT_CHUNK_SIZE;
        let end = ACCOUNT_NUM.min(start + ACCOUNT_CHUNK_SIZE);
        let ids: ArrayRef = Arc::new(Int64Array::from((start..end).collect::<Vec<_>>()));
        let names: ArrayRef = Arc::new(LargeStringArray::from(
            (start..end).map(|v| format!("acct{}", v)).collect::<Vec<_>>(),
        ));
        let batch = RecordBatch::try_new(
            Arc::new(Schema::new(vec![
                Field::new("id", ArrowDataType::Int64, false),
                Field::new("name", ArrowDataType::LargeUtf8, false),
            ])),
            vec![ids, names],
        )
        .unwrap();
        graphar_fs::write_chunk(
            &batch,
            &chunk_path(graph, &account.file_path(group, k).unwrap()),
            FileType::Csv,
        )
        .unwrap();
    }
    // no vertex_count file: readers discover the count by probing
}

fn write_transfer_layout(
    graph: &GraphInfo,
    adj_type: AdjListType,
    partitioned: &[Vec<(i64, i64)>],
    offsets: Option<&[Vec<i64>]>,
) {
    let transfer = graph.edge_info("account", "transfer", "account").unwrap();
    graphar_fs::write_id(
        &chunk_path(graph, &transfer.vertices_num_file_path(adj_type).unwrap()),
        ACCOUNT_NUM,
    )
    .unwrap();
    let amount_group = transfer.property_group("amount").unwrap();
    for (i, rows) in partitioned.iter().enumerate() {
        let i_id = i as IdType;
        graphar_fs::write_id(
            &chunk_path(graph, &transfer.edges_num_file_path(i_id, adj_type).unwrap()),
            rows.len() as IdType,
        )
        .unwrap();
        if let Some(offsets) = offsets {
            graphar_fs::write_chunk(
                &offsets_batch(&offsets[i]),
                &chunk_path(graph, &transfer.offset_file_path(i_id, adj_type).unwrap()),
                FileType::Csv,
            )
            .unwrap();
        }
        for (j, sub) in rows.chunks(TRANSFER_CHUNK_SIZE as usize).enumerate() {
            let j_id = j as IdType;
            graphar_fs::write_chunk(
                &adj_batch(sub),
                &chunk_path(
                    graph,
                    &transfer.adj_list_file_path(i_id, j_id, adj_type).unwrap(),
                ),
                FileType::Csv,
            )
            .unwrap();
            let amounts = sub.iter().map(|&(src, dst)| src * 100 + dst).collect();
            graphar_fs::write_chunk(
                &id_batch(&["amount"], vec![amounts]),
                &chunk_path(
                    graph,
                    &transfer
                        .property_file_path(amount_group, adj_type, i_id, j_id)
                        .unwrap(),
                ),
                FileType::Csv,
            )
            .unwrap();
        }
    }
}

fn write_transfer_chunks(graph: &GraphInfo) {
    let edges = transfer_edges();
    let chunk_of = |id: i64| (id / ACCOUNT_CHUNK_SIZE) as usize;

    // by destination, sorted by (dst, src), with offsets
    let mut by_dest: Vec<Vec<(i64, i64)>> = vec![Vec::new(); 3];
    let mut sorted = edges.clone();
    sorted.sort_unstable_by_key(|&(src, dst)| (dst, src));
    for (src, dst) in sorted {
        by_dest[chunk_of(dst)].push((src, dst));
    }
    let mut dest_offsets = Vec::new();
    for (i, rows) in by_dest.iter().enumerate() {
        let start = i as i64 * ACCOUNT_CHUNK_SIZE;
        let vertices = ACCOUNT_CHUNK_SIZE.min(ACCOUNT_NUM - start);
        let mut offsets = vec![0_i64];
        for local in 0..vertices {
            let dst = start + local;
            let degree = rows.iter().filter(|r| r.1 == dst).count() as i64;
            offsets.push(offsets[offsets.len() - 1] + degree);
        }
        dest_offsets.push(offsets);
    }
    write_transfer_layout(
        graph,
        AdjListType::OrderedByDest,
        &by_dest,
        Some(&dest_offsets),
    );

    // by source, unsorted, no offsets
    let mut by_src: Vec<Vec<(i64, i64)>> = vec![Vec::new(); 3];
    for (src, dst) in edges {
        by_src[chunk_of(src)].push((src, dst));
    }
    write_transfer_layout(graph, AdjListType::UnorderedBySource, &by_src, None);
}
