//! Radiometric calibration module
//!
//! Converts raw multispectral sensor counts (DN) of a single band into radiance and
//! reflectance. The math lives in `vignette`, `radiance`, `irradiance` and `reflectance`;
//! `tiff` and `conversions` wrap it into a file-to-file pipeline.

pub mod common;
pub mod calibration;
pub mod vignette;
pub mod radiance;
pub mod irradiance;
pub mod reflectance;
pub mod batch;
pub mod tiff;
pub mod conversions;

pub use common::{
    RadiometryError,
    Result,
};

pub use calibration::{
    Band,
    CameraCalibration,
    CameraCalibrationBuilder,
    GeoLocation,
    RawPixels,
    RawSample,
    VignettingCenter,
};

pub use vignette::{VignetteMap, vignette_map, pixel_mesh};
pub use radiance::dn_to_radiance;

pub use irradiance::{
    FixedSunGeometry,
    SensorPose,
    SunAngle,
    SunGeometry,
    UnavailableSunGeometry,
    compute_irradiance_scale_factor,
};

pub use reflectance::{DEFAULT_USE_SUN_SENSOR, dn_to_reflectance};
pub use batch::{BandJob, OutputKind, calibrate_batch, irradiance_scale_factors};

pub use tiff::{
    BandImageData,
    BandImageReader,
    OutputConfig,
    OutputConfigBuilder,
    StandardTiffReader,
    StandardTiffWriter,
    TiffCompression,
    TiffWriter,
};

pub use conversions::{
    CalibrationPipeline,
    PipelineTimings,
};
