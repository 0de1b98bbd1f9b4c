//! Band I/O and output configuration types

use crate::radiometry::batch::OutputKind;
use crate::radiometry::calibration::RawPixels;
use crate::radiometry::reflectance::DEFAULT_USE_SUN_SENSOR;

/// Decoded single-band image
#[derive(Debug, Clone, PartialEq)]
pub struct BandImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw sensor counts, shape `(height, width)`
    pub pixels: RawPixels,
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file, default)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced (command line default)
    DeflateBalanced,
}

/// Configuration for band calibration and output encoding
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    /// Note: Predictor adds processing time, set to None for maximum speed
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Radiance or reflectance output
    pub kind: OutputKind,
    /// Estimate irradiance from the sun sensor when the photo has no measurement
    pub use_sun_sensor: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            kind: OutputKind::Reflectance,
            use_sun_sensor: DEFAULT_USE_SUN_SENSOR,
        }
    }
}

impl OutputConfig {
    pub fn builder() -> OutputConfigBuilder {
        OutputConfigBuilder::default()
    }
}

/// Builder for OutputConfig
#[derive(Default)]
pub struct OutputConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    kind: Option<OutputKind>,
    use_sun_sensor: Option<bool>,
}

impl OutputConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn kind(mut self, kind: OutputKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn use_sun_sensor(mut self, enable: bool) -> Self {
        self.use_sun_sensor = Some(enable);
        self
    }

    pub fn build(self) -> OutputConfig {
        let default = OutputConfig::default();
        OutputConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            kind: self.kind.unwrap_or(default.kind),
            use_sun_sensor: self.use_sun_sensor.unwrap_or(default.use_sun_sensor),
        }
    }
}
