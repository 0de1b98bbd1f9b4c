use std::io::Write;
use ndarray::Array2;
use crate::radiometry::common::error::Result;
use crate::radiometry::tiff::types::OutputConfig;

pub trait TiffWriter {
    fn write_band(&self, image: &Array2<f64>, output: &mut dyn Write, config: &OutputConfig) -> Result<()>;
}
