//! Data model: run configuration, expectations and artifact naming.

mod artifacts;
mod enums;
mod run;

pub use artifacts::{rgb_frame_count, stereo_sample_pairs, OutputBase};
pub use enums::VideoSystem;
pub use run::{Expectations, RunConfig};
