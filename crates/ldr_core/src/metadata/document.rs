//! Loading the `.tbc.json` sidecar into a typed document.
//!
//! The sidecar is read-only to the harness and only the keys the
//! validators inspect are modelled; everything else is ignored. A
//! missing per-field sub-record means "skip this field" for the
//! aggregations, but a document without the field sequence at all is
//! malformed and a hard failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the metadata sidecar.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read metadata {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse metadata {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("metadata {path} contains no field records")]
    NoFields { path: PathBuf },
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Quality metrics recorded per field by the VBI processor.
#[derive(Debug, Clone, Deserialize)]
pub struct VitsMetrics {
    /// Peak signal-to-noise of the black level, in dB.
    #[serde(rename = "bPSNR")]
    pub b_psnr: Option<f64>,
}

/// Decoded vertical-blanking-interval data for one field.
#[derive(Debug, Clone, Deserialize)]
pub struct VbiRecord {
    /// The three decoded VBI line values.
    #[serde(rename = "vbiData")]
    pub vbi_data: Option<Vec<i64>>,
}

/// One field record from the sidecar's field sequence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "vitsMetrics")]
    pub vits_metrics: Option<VitsMetrics>,
    pub vbi: Option<VbiRecord>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    fields: Option<Vec<FieldRecord>>,
}

/// The metadata sidecar, reduced to the per-field records the
/// validators need.
#[derive(Debug)]
pub struct MetadataDocument {
    pub fields: Vec<FieldRecord>,
}

impl MetadataDocument {
    /// Load and parse the sidecar at `path`.
    pub fn load(path: &Path) -> MetadataResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    /// Parse a sidecar document from a JSON string. `path` is only
    /// used for diagnostics.
    pub fn from_json(content: &str, path: &Path) -> MetadataResult<Self> {
        let raw: RawDocument =
            serde_json::from_str(content).map_err(|source| MetadataError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let fields = raw.fields.ok_or_else(|| MetadataError::NoFields {
            path: path.to_path_buf(),
        })?;

        Ok(Self { fields })
    }
}
