use crate::radiometry::common::error::Result;
use crate::radiometry::tiff::types::BandImageData;

pub trait BandImageReader {
    fn read_band(&self, data: &[u8]) -> Result<BandImageData>;
}
