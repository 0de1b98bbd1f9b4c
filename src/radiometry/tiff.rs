//! TIFF band I/O module
//!
//! Reads single-band integer TIFFs into raw pixel grids and writes calibrated
//! float grids back out with various compression options.

mod reader;
mod writer;
mod standard_tiff_reader;
mod standard_tiff_writer;
pub mod types;

pub use reader::BandImageReader;
pub use writer::TiffWriter;
pub use standard_tiff_reader::StandardTiffReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{BandImageData, TiffCompression, OutputConfig, OutputConfigBuilder};
