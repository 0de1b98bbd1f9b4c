//! Camera calibration data model
//!
//! Read-only per-photo calibration parameters and the raw pixel grid types the
//! conversions consume.

mod types;
mod sample;

pub use types::{Band, CameraCalibration, CameraCalibrationBuilder, GeoLocation, VignettingCenter};
pub use sample::{RawPixels, RawSample};
