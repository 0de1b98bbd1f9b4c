use std::io::Write;
use ndarray::Array2;
use tracing::debug;
use crate::radiometry::common::error::{Result, RadiometryError};
use crate::radiometry::tiff::types::{OutputConfig, TiffCompression};
use crate::radiometry::tiff::writer::TiffWriter;

/// Writes calibrated bands as 32-bit float grayscale TIFF.
pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_band(&self, image: &Array2<f64>, output: &mut dyn Write, config: &OutputConfig) -> Result<()> {
        let (height, width) = image.dim();
        debug!("Encoding TIFF image: {}x{}", width, height);

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        // logical row-major order regardless of the array's memory layout
        let samples: Vec<f32> = image.iter().map(|&v| v as f32).collect();

        {
            let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| RadiometryError::EncodeError(e.to_string()))?
                .with_compression(compression);

            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => tiff::tags::Predictor::Horizontal,
                    _ => tiff::tags::Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            encoder.write_image::<tiff::encoder::colortype::Gray32Float>(
                width as u32,
                height as u32,
                &samples,
            ).map_err(|e| RadiometryError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
