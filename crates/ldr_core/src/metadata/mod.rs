//! Typed view of the decoder's JSON metadata sidecar.

mod document;
mod metrics;

pub use document::{
    FieldRecord, MetadataDocument, MetadataError, MetadataResult, VbiRecord, VitsMetrics,
};
pub use metrics::{find_vbi_triple, median, median_bpsnr};
