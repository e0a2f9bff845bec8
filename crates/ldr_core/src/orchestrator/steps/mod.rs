//! Pipeline stage implementations.
//!
//! One module per external tool in the fixed decode sequence.

mod chroma;
mod decode;
mod dropout;
mod efm;
mod export;
mod vbi;

pub use chroma::ChromaStep;
pub use decode::DecodeStep;
pub use dropout::DropoutStep;
pub use efm::EfmStep;
pub use export::ExportStep;
pub use vbi::VbiStep;
