use std::io::Cursor;

use blake3::Hasher;
use polars::prelude::*;
use thiserror::Error;

use crate::config::UploadLimits;
use crate::error::{ReportError, Result};

pub const PARQUET_EXTENSION: &str = ".parquet";
pub const PARQUET_MAGIC: &[u8; 4] = b"PAR1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Invalid file type. Please upload a .parquet file.")]
    InvalidExtension { file_name: String },

    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("File too small to be a valid Parquet file: {size} bytes (minimum {min})")]
    TooSmall { size: usize, min: usize },

    #[error("File does not end with the Parquet magic number")]
    BadMagic,
}

/// Identity of an accepted upload, used for request logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDigest {
    pub file_name: String,
    pub size: usize,
    pub hash: String,
}

/// Framing checks performed before any bytes are handed to the parser.
pub fn inspect_upload(
    file_name: &str,
    contents: &[u8],
    limits: &UploadLimits,
) -> std::result::Result<UploadDigest, UploadRejection> {
    if !file_name.ends_with(PARQUET_EXTENSION) {
        return Err(UploadRejection::InvalidExtension {
            file_name: file_name.to_string(),
        });
    }

    let size = contents.len();
    if size > limits.max_file_size {
        return Err(UploadRejection::TooLarge {
            size,
            max: limits.max_file_size,
        });
    }
    if size < limits.min_file_size {
        return Err(UploadRejection::TooSmall {
            size,
            min: limits.min_file_size,
        });
    }

    if !contents.ends_with(PARQUET_MAGIC) {
        return Err(UploadRejection::BadMagic);
    }

    Ok(UploadDigest {
        file_name: file_name.to_string(),
        size,
        hash: compute_hash(contents),
    })
}

/// Materializes the whole Parquet payload as a single in-memory table.
pub fn read_table(contents: &[u8]) -> Result<DataFrame> {
    ParquetReader::new(Cursor::new(contents))
        .finish()
        .map_err(ReportError::Format)
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
