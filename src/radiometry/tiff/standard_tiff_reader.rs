//! Single-band TIFF reader built on the `tiff` crate.
//!
//! Multispectral cameras store one band per file as 8, 16 or 32 bit grayscale.
//! Float and multi-channel files are not raw sensor counts and are rejected.

use std::io::Cursor;

use ndarray::Array2;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::radiometry::calibration::RawPixels;
use crate::radiometry::common::error::{RadiometryError, Result};
use crate::radiometry::tiff::reader::BandImageReader;
use crate::radiometry::tiff::types::BandImageData;

pub struct StandardTiffReader;

impl BandImageReader for StandardTiffReader {
    fn read_band(&self, data: &[u8]) -> Result<BandImageData> {
        debug!("Decoding band TIFF, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| RadiometryError::DecodeError(e.to_string()))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| RadiometryError::DecodeError(e.to_string()))?;
        let colortype = decoder
            .colortype()
            .map_err(|e| RadiometryError::DecodeError(e.to_string()))?;

        if !matches!(colortype, ColorType::Gray(_)) {
            return Err(RadiometryError::UnsupportedFormat(format!(
                "expected a single-band grayscale image, got {colortype:?}"
            )));
        }

        let (width, height) = (width as usize, height as usize);
        debug!("Decoded band: {}x{} {:?}", width, height, colortype);

        let pixels = match decoder
            .read_image()
            .map_err(|e| RadiometryError::DecodeError(e.to_string()))?
        {
            DecodingResult::U8(values) => RawPixels::U8(to_grid(width, height, values)?),
            DecodingResult::U16(values) => RawPixels::U16(to_grid(width, height, values)?),
            DecodingResult::U32(values) => RawPixels::U32(to_grid(width, height, values)?),
            _ => {
                return Err(RadiometryError::UnsupportedFormat(format!(
                    "{colortype:?} samples are not raw sensor counts"
                )));
            }
        };

        Ok(BandImageData { width, height, pixels })
    }
}

fn to_grid<T>(width: usize, height: usize, values: Vec<T>) -> Result<Array2<T>> {
    let len = values.len();
    Array2::from_shape_vec((height, width), values).map_err(|_| {
        RadiometryError::DecodeError(format!(
            "{len} samples do not fill a {width}x{height} band"
        ))
    })
}
