use std::fs::File;
use std::path::Path;

use arrow_array::RecordBatch;
use graphar_dtype::IdType;
use graphar_error::{GarResult, gar_bail};
use graphar_info::FileType;
use parquet::arrow::ArrowWriter;

/// Encode one record batch as one chunk file, creating parent directories.
pub fn write_chunk(batch: &RecordBatch, path: &Path, file_type: FileType) -> GarResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    log::debug!("writing {} chunk {}", file_type, path.display());
    match file_type {
        FileType::Parquet => {
            let file = File::create(path)?;
            let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
            writer.write(batch)?;
            writer.close()?;
        }
        FileType::Csv => {
            let file = File::create(path)?;
            let mut writer = arrow_csv::WriterBuilder::new().with_header(true).build(file);
            writer.write(batch)?;
        }
        FileType::Orc => gar_bail!("orc chunks are not supported by this backend"),
    }
    Ok(())
}

/// Write a little-endian i64 count file, creating parent directories.
pub fn write_id(path: &Path, value: IdType) -> GarResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::write(path, value.to_le_bytes())?)
}
