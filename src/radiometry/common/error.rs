use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadiometryError {
    #[error("Image shape {actual:?} does not match calibration (height, width) {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Vignetting polynomial evaluates to {value} at pixel ({x}, {y}), radius {radius}")]
    DegenerateVignettePolynomial {
        x: usize,
        y: usize,
        radius: f64,
        value: f64,
    },

    #[error("Invalid horizontal irradiance: {0}")]
    InvalidIrradiance(f64),

    #[error("Solar elevation {0} rad is at or below the horizon")]
    SolarElevationBelowHorizon(f64),

    #[error("Sun geometry unavailable: {0}")]
    SunGeometryUnavailable(String),

    #[error("{count} non-finite pixel(s) after {stage}")]
    NonFiniteOutput {
        stage: &'static str,
        count: usize,
    },

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode band image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RadiometryError>;
