use std::net::SocketAddr;

use crate::error::{ReportError, Result};

pub const DEFAULT_MAX_FILE_SIZE: usize = 100 * 1024 * 1024;
pub const DEFAULT_MIN_FILE_SIZE: usize = 100;
pub const DEFAULT_MAX_RECORDS: usize = 100_000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

pub const MAX_FILE_SIZE_KEY: &str = "MAX_FILE_SIZE";
pub const MAX_RECORDS_KEY: &str = "MAX_RECORDS";
pub const BIND_ADDR_KEY: &str = "CUR_REPORT_BIND";

/// Limits applied by the sanitizer and aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// Ceiling on input rows and on output groups.
    pub max_records: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

/// Byte limits checked before an upload reaches the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: usize,
    pub min_file_size: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            min_file_size: DEFAULT_MIN_FILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub processing: ProcessingConfig,
    pub upload: UploadLimits,
}

impl ServiceConfig {
    /// Reads `MAX_FILE_SIZE`, `MAX_RECORDS` and `CUR_REPORT_BIND` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_file_size = positive_usize(MAX_FILE_SIZE_KEY, lookup(MAX_FILE_SIZE_KEY))?
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);
        let max_records = positive_usize(MAX_RECORDS_KEY, lookup(MAX_RECORDS_KEY))?
            .unwrap_or(DEFAULT_MAX_RECORDS);

        let bind_raw = lookup(BIND_ADDR_KEY).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ReportError::InvalidConfig {
                key: BIND_ADDR_KEY,
                value: bind_raw.clone(),
                reason: err.to_string(),
            })?;

        if max_file_size < DEFAULT_MIN_FILE_SIZE {
            return Err(ReportError::InvalidConfig {
                key: MAX_FILE_SIZE_KEY,
                value: max_file_size.to_string(),
                reason: format!("must be at least {DEFAULT_MIN_FILE_SIZE} bytes"),
            });
        }

        Ok(Self {
            bind_addr,
            processing: ProcessingConfig { max_records },
            upload: UploadLimits {
                max_file_size,
                min_file_size: DEFAULT_MIN_FILE_SIZE,
            },
        })
    }
}

fn positive_usize(key: &'static str, raw: Option<String>) -> Result<Option<usize>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed
        .parse::<usize>()
        .map_err(|err| ReportError::InvalidConfig {
            key,
            value: raw.clone(),
            reason: err.to_string(),
        })?;

    if value == 0 {
        return Err(ReportError::InvalidConfig {
            key,
            value: raw,
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(Some(value))
}
