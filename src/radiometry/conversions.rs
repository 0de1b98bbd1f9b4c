//! Pipeline conversions module
//!
//! Orchestrates decode, calibration and encode of a single band file.

mod band_to_tiff;
mod timing;


pub use band_to_tiff::CalibrationPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
