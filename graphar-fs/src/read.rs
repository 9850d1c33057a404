use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::{BooleanArray, Int64Array, RecordBatch, RecordBatchReader};
use arrow_schema::{ArrowError, DataType as ArrowDataType, Field, Schema, SchemaRef};
use arrow_select::concat::concat_batches;
use arrow_select::filter::filter_record_batch;
use graphar_dtype::IdType;
use graphar_error::{GarError, GarResult, gar_bail, gar_err};
use graphar_expr::{ExprRef, ExpressionExt};
use graphar_info::{FileType, consts};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::{ArrowPredicateFn, ParquetRecordBatchReaderBuilder, RowFilter};

use crate::ScanOptions;

/// Decode one chunk file into a record batch, applying the scan options.
///
/// `schema` is the canonical Arrow schema of the chunk (property-group
/// columns, or the reserved adjacency/offset columns); parquet files carry
/// their own schema and only consult it implicitly, csv files are decoded
/// against it. Projected columns come back in the requested order.
pub fn read_chunk(
    path: &Path,
    file_type: FileType,
    schema: &SchemaRef,
    options: &ScanOptions,
) -> GarResult<RecordBatch> {
    log::debug!("reading {} chunk {}", file_type, path.display());
    let batch = match file_type {
        FileType::Parquet => read_parquet(path, options)?,
        FileType::Csv => read_csv(path, schema, options)?,
        FileType::Orc => gar_bail!("orc chunks are not supported by this backend"),
    };
    project(batch, options)
}

/// Decode an offset chunk: a single non-null int64 column.
pub fn read_offset_chunk(path: &Path, file_type: FileType) -> GarResult<Int64Array> {
    let schema = Arc::new(Schema::new(vec![Field::new(
        consts::OFFSET_COL,
        ArrowDataType::Int64,
        false,
    )]));
    let batch = read_chunk(path, file_type, &schema, &ScanOptions::new())?;
    if batch.num_columns() != 1 {
        gar_bail!(
            "offset chunk {} has {} columns, expected one",
            path.display(),
            batch.num_columns()
        );
    }
    batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .cloned()
        .ok_or_else(|| gar_err!(MismatchedTypes: "int64", batch.column(0).data_type()))
}

/// Discover a chunk count by probing: the number of consecutive existing
/// chunk files, scanning `path_of(0)`, `path_of(1)`, … until the first gap.
pub fn chunk_count_by_probe(
    path_of: impl Fn(IdType) -> GarResult<PathBuf>,
) -> GarResult<IdType> {
    let mut chunk_num = 0;
    while path_of(chunk_num)?.exists() {
        chunk_num += 1;
    }
    log::debug!("probed {} chunk files", chunk_num);
    Ok(chunk_num)
}

/// Read a little-endian i64 count file.
pub fn read_id(path: &Path) -> GarResult<IdType> {
    let bytes = std::fs::read(path)?;
    let bytes: [u8; 8] = bytes
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| gar_err!(Parse: "count file {} is truncated", path.display()))?;
    Ok(IdType::from_le_bytes(bytes))
}

fn read_parquet(path: &Path, options: &ScanOptions) -> GarResult<RecordBatch> {
    let file = File::open(path)?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let file_schema = builder.schema().clone();
    if let Some(filter) = &options.filter {
        let mut indices = filter
            .references()
            .iter()
            .map(|name| file_schema.index_of(name))
            .collect::<Result<Vec<_>, ArrowError>>()?;
        indices.sort_unstable();
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        let filter = filter.clone();
        let predicate = ArrowPredicateFn::new(mask, move |batch| {
            boolean_mask(&filter, &batch).map_err(|e| ArrowError::ComputeError(e.to_string()))
        });
        builder = builder.with_row_filter(RowFilter::new(vec![Box::new(predicate)]));
    }
    if let Some(columns) = &options.columns {
        let mut indices = columns
            .iter()
            .map(|name| file_schema.index_of(name))
            .collect::<Result<Vec<_>, ArrowError>>()?;
        indices.sort_unstable();
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        builder = builder.with_projection(mask);
    }
    let reader = builder.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<Result<Vec<_>, ArrowError>>()?;
    if batches.is_empty() {
        Ok(RecordBatch::new_empty(schema))
    } else {
        Ok(concat_batches(&schema, &batches)?)
    }
}

fn read_csv(path: &Path, schema: &SchemaRef, options: &ScanOptions) -> GarResult<RecordBatch> {
    let file = File::open(path)?;
    // Strings decode as Utf8 and are normalised to the canonical LargeUtf8
    // afterwards.
    let decode_fields = schema
        .fields()
        .iter()
        .map(|f| match f.data_type() {
            ArrowDataType::LargeUtf8 => {
                Arc::new(Field::new(f.name(), ArrowDataType::Utf8, f.is_nullable()))
            }
            _ => f.clone(),
        })
        .collect::<Vec<_>>();
    let decode_schema = Arc::new(Schema::new(decode_fields));
    let reader = arrow_csv::ReaderBuilder::new(decode_schema.clone())
        .with_header(true)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, ArrowError>>()?;
    let batch = if batches.is_empty() {
        RecordBatch::new_empty(decode_schema)
    } else {
        concat_batches(&decode_schema, &batches)?
    };
    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(column, field)| {
            if column.data_type() == field.data_type() {
                Ok(column.clone())
            } else {
                arrow_cast::cast::cast(column, field.data_type()).map_err(GarError::from)
            }
        })
        .collect::<GarResult<Vec<_>>>()?;
    let mut batch = RecordBatch::try_new(schema.clone(), columns)?;
    if let Some(filter) = &options.filter {
        let mask = boolean_mask(filter, &batch)?;
        batch = filter_record_batch(&batch, &mask)?;
    }
    Ok(batch)
}

fn boolean_mask(filter: &ExprRef, batch: &RecordBatch) -> GarResult<BooleanArray> {
    let mask = filter.evaluate(batch)?;
    mask.as_any()
        .downcast_ref::<BooleanArray>()
        .cloned()
        .ok_or_else(|| gar_err!(MismatchedTypes: "bool", mask.data_type()))
}

fn project(batch: RecordBatch, options: &ScanOptions) -> GarResult<RecordBatch> {
    let Some(columns) = &options.columns else {
        return Ok(batch);
    };
    let schema = batch.schema();
    let indices = columns
        .iter()
        .map(|name| schema.index_of(name))
        .collect::<Result<Vec<_>, ArrowError>>()?;
    Ok(batch.project(&indices)?)
}
