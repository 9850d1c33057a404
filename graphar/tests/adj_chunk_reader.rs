mod common;

use arrow_array::RecordBatch;
use arrow_array::cast::AsArray;
use arrow_array::types::Int64Type;
use graphar::AdjListType;
use graphar::expr::{eq, lit, property};
use graphar::reader::{
    AdjListChunkReader, AdjListOffsetChunkReader, AdjListPropertyChunkReader,
};
use graphar::{ScanOptions, consts};

use crate::common::{
    KNOWS_EDGE_COUNTS, creation_date, csv_sample, knows_vertex_chunk, ldbc_sample,
    transfer_edges,
};

fn column(batch: &RecordBatch, name: &str) -> Vec<i64> {
    let array = batch
        .column_by_name(name)
        .unwrap()
        .as_primitive::<Int64Type>();
    (0..array.len()).map(|i| array.value(i)).collect()
}

#[test]
fn iterates_and_seeks_within_a_vertex_chunk() {
    let sample = ldbc_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "person",
        "knows",
        "person",
        AdjListType::OrderedBySource,
    )
    .unwrap();

    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 667);

    reader.seek(100).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 567);
    assert_eq!(reader.row_num_of_chunk(), 667);

    reader.next_chunk().unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 644);
    assert!(reader.seek(1024).unwrap_err().is_index_out_of_range());
}

#[test]
fn seeks_by_source_through_the_offset_index() {
    let sample = ldbc_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "person",
        "knows",
        "person",
        AdjListType::OrderedBySource,
    )
    .unwrap();

    reader.seek_src(100).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 644);
    assert!(reader.seek_dst(100).unwrap_err().is_invalid());

    // mid-chunk source: the slice starts at its first row
    reader.seek_src(67).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 667 - 67 * 7);
    assert_eq!(column(&batch, consts::SRC_INDEX_COL)[0], 67);

    reader.seek_src(900).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 4);
    assert!(reader.next_chunk().unwrap_err().is_index_out_of_range());

    assert!(reader.seek_src(903).unwrap_err().is_index_out_of_range());
}

#[test]
fn seek_chunk_index_restarts_a_vertex_chunk() {
    let sample = ldbc_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "person",
        "knows",
        "person",
        AdjListType::OrderedBySource,
    )
    .unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 667);

    reader.seek_chunk_index(1).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 644);

    assert!(reader.seek_chunk_index(10).unwrap_err().is_index_out_of_range());
}

#[test]
fn sources_are_sorted_in_ordered_chunks() {
    let sample = ldbc_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "person",
        "knows",
        "person",
        AdjListType::OrderedBySource,
    )
    .unwrap();
    let mut total = 0;
    loop {
        let batch = reader.get_chunk().unwrap();
        let sources = column(&batch, consts::SRC_INDEX_COL);
        assert!(sources.windows(2).all(|w| w[0] <= w[1]));
        total += batch.num_rows() as i64;
        match reader.next_chunk() {
            Ok(()) => {}
            Err(e) => {
                assert!(e.is_index_out_of_range());
                break;
            }
        }
    }
    assert_eq!(total, KNOWS_EDGE_COUNTS.iter().sum::<i64>());
}

#[test]
fn undeclared_layouts_are_rejected_at_construction() {
    let sample = ldbc_sample();
    assert!(
        AdjListChunkReader::from_graph(
            &sample.graph,
            "person",
            "knows",
            "person",
            AdjListType::OrderedByDest,
        )
        .unwrap_err()
        .is_key_not_found()
    );
    assert!(
        AdjListChunkReader::from_graph(
            &sample.graph,
            "person",
            "likes",
            "person",
            AdjListType::OrderedBySource,
        )
        .unwrap_err()
        .is_key_not_found()
    );
}

#[test]
fn offset_chunks_bracket_every_source() {
    let sample = ldbc_sample();
    let mut reader = AdjListOffsetChunkReader::from_graph(
        &sample.graph,
        "person",
        "knows",
        "person",
        AdjListType::OrderedBySource,
    )
    .unwrap();

    let array = reader.get_chunk().unwrap();
    assert_eq!(array.len(), 101);
    reader.next_chunk().unwrap();
    let array = reader.get_chunk().unwrap();
    assert_eq!(array.len(), 101);

    reader.seek(900).unwrap();
    let array = reader.get_chunk().unwrap();
    assert_eq!(array.len(), 4);
    assert!(reader.next_chunk().unwrap_err().is_index_out_of_range());
    assert!(reader.seek(1024).unwrap_err().is_index_out_of_range());
}

#[test]
fn offsets_agree_with_the_adjacency_rows() {
    let sample = ldbc_sample();
    let mut reader = AdjListOffsetChunkReader::from_graph(
        &sample.graph,
        "person",
        "knows",
        "person",
        AdjListType::OrderedBySource,
    )
    .unwrap();
    for (i, &edge_num) in KNOWS_EDGE_COUNTS.iter().enumerate() {
        if i > 0 {
            reader.seek(i as i64 * 100).unwrap();
        }
        let array = reader.get_chunk().unwrap();
        let (rows, expected_offsets) = knows_vertex_chunk(i);
        assert_eq!(array.len(), expected_offsets.len());
        assert_eq!(array.value(array.len() - 1), edge_num);
        for (k, window) in expected_offsets.windows(2).enumerate() {
            let degree = window[1] - window[0];
            assert_eq!(array.value(k + 1) - array.value(k), degree);
            // the bracketed rows all belong to the k-th source
            let src = i as i64 * 100 + k as i64;
            assert!(
                rows[window[0] as usize..window[1] as usize]
                    .iter()
                    .all(|r| r.0 == src)
            );
        }
    }
}

#[test]
fn offset_reader_requires_an_ordered_layout() {
    let sample = csv_sample();
    assert!(
        AdjListOffsetChunkReader::from_graph(
            &sample.graph,
            "account",
            "transfer",
            "account",
            AdjListType::UnorderedBySource,
        )
        .unwrap_err()
        .is_invalid()
    );
}

#[test]
fn walks_sub_chunks_and_skips_empty_vertex_chunks() {
    let sample = csv_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "account",
        "transfer",
        "account",
        AdjListType::OrderedByDest,
    )
    .unwrap();
    // vertex chunk 0 holds 9 edges in sub-chunks of 4; chunk 1 is empty and
    // is skipped; chunk 2 holds 5 edges
    let mut sizes = Vec::new();
    let mut destinations = Vec::new();
    loop {
        let batch = reader.get_chunk().unwrap();
        sizes.push(batch.num_rows());
        destinations.extend(column(&batch, consts::DST_INDEX_COL));
        match reader.next_chunk() {
            Ok(()) => {}
            Err(e) => {
                assert!(e.is_index_out_of_range());
                break;
            }
        }
    }
    assert_eq!(sizes, vec![4, 4, 1, 4, 1]);
    // by-destination ordering holds within each vertex chunk
    assert!(destinations[0..9].windows(2).all(|w| w[0] <= w[1]));
    assert!(destinations[9..].windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn seeks_by_destination_on_a_by_dest_layout() {
    let sample = csv_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "account",
        "transfer",
        "account",
        AdjListType::OrderedByDest,
    )
    .unwrap();
    assert!(reader.seek_src(7).unwrap_err().is_invalid());

    reader.seek_dst(7).unwrap();
    let batch = reader.get_chunk().unwrap();
    // dst 7 starts at row 5, inside the second sub-chunk
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(column(&batch, consts::DST_INDEX_COL), vec![7, 7, 8]);
    assert_eq!(column(&batch, consts::SRC_INDEX_COL)[0], 0);
}

#[test]
fn unordered_layouts_seek_to_the_vertex_chunk_head() {
    let sample = csv_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "account",
        "transfer",
        "account",
        AdjListType::UnorderedBySource,
    )
    .unwrap();
    assert!(reader.seek_dst(7).unwrap_err().is_invalid());

    reader.seek_src(11).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(reader.row_num_of_chunk(), 3);
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(column(&batch, consts::SRC_INDEX_COL), vec![11, 11, 14]);
}

#[test]
fn property_chunks_follow_the_adjacency_grid() {
    let sample = ldbc_sample();
    let mut reader = AdjListPropertyChunkReader::from_property(
        &sample.graph,
        "person",
        "knows",
        "person",
        "creationDate",
        AdjListType::OrderedBySource,
    )
    .unwrap();

    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 667);
    assert_eq!(
        batch.column_by_name("creationDate").unwrap().as_string::<i64>().value(0),
        creation_date(0, 1)
    );

    reader.seek(100).unwrap();
    assert_eq!(reader.get_chunk().unwrap().num_rows(), 567);
    reader.next_chunk().unwrap();
    assert_eq!(reader.get_chunk().unwrap().num_rows(), 644);
    assert!(reader.seek(1024).unwrap_err().is_index_out_of_range());

    reader.seek_src(900).unwrap();
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_rows(), 4);
    assert_eq!(
        batch.column_by_name("creationDate").unwrap().as_string::<i64>().value(0),
        creation_date(900, 901)
    );
    assert!(reader.seek_dst(100).unwrap_err().is_invalid());
    assert!(reader.next_chunk().unwrap_err().is_index_out_of_range());
}

#[test]
fn property_pushdown_filters_the_grid() {
    let sample = ldbc_sample();
    let options = ScanOptions {
        filter: Some(eq(property("creationDate"), lit(creation_date(0, 1)))),
        columns: Some(vec!["creationDate".to_string()]),
    };
    let mut reader = AdjListPropertyChunkReader::from_property(
        &sample.graph,
        "person",
        "knows",
        "person",
        "creationDate",
        AdjListType::OrderedBySource,
    )
    .unwrap()
    .with_options(options);
    let batch = reader.get_chunk().unwrap();
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.num_rows(), 1);
}

#[test]
fn property_pushdown_outside_the_group_fails_lazily() {
    let sample = ldbc_sample();
    let mut reader = AdjListPropertyChunkReader::from_property(
        &sample.graph,
        "person",
        "knows",
        "person",
        "creationDate",
        AdjListType::OrderedBySource,
    )
    .unwrap();
    reader.filter(eq(property("weight"), lit(1_i64)));
    assert!(reader.get_chunk().unwrap_err().is_invalid());
}

#[test]
fn unknown_edge_properties_are_rejected_at_construction() {
    let sample = ldbc_sample();
    assert!(
        AdjListPropertyChunkReader::from_property(
            &sample.graph,
            "person",
            "knows",
            "person",
            "weight",
            AdjListType::OrderedBySource,
        )
        .unwrap_err()
        .is_key_not_found()
    );
}

#[test]
fn csv_adjacency_matches_the_edge_set() {
    let sample = csv_sample();
    let mut reader = AdjListChunkReader::from_graph(
        &sample.graph,
        "account",
        "transfer",
        "account",
        AdjListType::UnorderedBySource,
    )
    .unwrap();
    let mut seen = Vec::new();
    loop {
        let batch = reader.get_chunk().unwrap();
        let sources = column(&batch, consts::SRC_INDEX_COL);
        let destinations = column(&batch, consts::DST_INDEX_COL);
        seen.extend(sources.into_iter().zip(destinations));
        match reader.next_chunk() {
            Ok(()) => {}
            Err(e) => {
                assert!(e.is_index_out_of_range());
                break;
            }
        }
    }
    let mut expected = transfer_edges();
    expected.sort_unstable();
    seen.sort_unstable();
    assert_eq!(seen, expected);
}
