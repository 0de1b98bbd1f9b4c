//! Calibration parameter types

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::radiometry::common::error::{RadiometryError, Result};

/// Spectral band a photo was captured in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Band {
    Blue,
    Green,
    Red,
    RedEdge,
    Nir,
    /// Long-wave infrared. Raw values are centikelvin, not light counts.
    Lwir,
    Other(String),
}

impl Band {
    pub fn is_thermal(&self) -> bool {
        matches!(self, Band::Lwir)
    }

    pub fn name(&self) -> &str {
        match self {
            Band::Blue => "Blue",
            Band::Green => "Green",
            Band::Red => "Red",
            Band::RedEdge => "RedEdge",
            Band::Nir => "NIR",
            Band::Lwir => "LWIR",
            Band::Other(name) => name,
        }
    }
}

impl From<&str> for Band {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "blue" => Band::Blue,
            "green" => Band::Green,
            "red" => Band::Red,
            "rededge" | "red edge" | "red_edge" => Band::RedEdge,
            "nir" => Band::Nir,
            "lwir" => Band::Lwir,
            _ => Band::Other(name.to_string()),
        }
    }
}

impl From<String> for Band {
    fn from(name: String) -> Self {
        Band::from(name.as_str())
    }
}

impl From<Band> for String {
    fn from(band: Band) -> Self {
        band.name().to_string()
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capture position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Optical center of the vignetting model, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VignettingCenter {
    pub x: f64,
    pub y: f64,
}

/// Radiometric calibration of one captured band image.
///
/// Every correction input is optional. A missing value disables the matching
/// correction step and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    pub band: Band,
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Radiometric calibration coefficients (a1 scale, a2/a3 row gradient)
    pub a1: Option<f64>,
    pub a2: Option<f64>,
    pub a3: Option<f64>,
    /// Sensor black level, in DN
    pub dark_level: Option<f64>,
    /// Exposure time in seconds
    pub exposure_time: Option<f64>,
    pub gain: Option<f64>,
    pub bits_per_sample: Option<u32>,
    pub vignetting_center: Option<VignettingCenter>,
    /// Vignetting polynomial coefficients, lowest degree first starting at r^1
    pub vignetting_polynomial: Option<Vec<f64>>,
    pub location: Option<GeoLocation>,
    pub capture_time: Option<DateTime<Utc>>,
    /// Measured horizontal irradiance
    pub irradiance: Option<f64>,
    /// Spectral irradiance reported by the sun sensor
    pub sun_sensor: Option<f64>,
}

impl CameraCalibration {
    pub fn builder(band: impl Into<Band>, width: usize, height: usize) -> CameraCalibrationBuilder {
        CameraCalibrationBuilder::new(band.into(), width, height)
    }

    /// Loads a calibration sidecar written by the metadata extraction stage.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RadiometryError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            RadiometryError::InvalidCalibration(format!("{}: {}", path.display(), e))
        })
    }

    pub fn is_thermal(&self) -> bool {
        self.band.is_thermal()
    }

    /// Expected pixel grid shape as `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn radiometric_coefficients(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (self.a1, self.a2, self.a3)
    }

    /// Exposure time usable as a divisor. Zero is treated as unknown.
    pub fn effective_exposure_time(&self) -> Option<f64> {
        self.exposure_time.filter(|&t| t != 0.0)
    }
}

/// Builder for CameraCalibration
#[derive(Debug, Clone)]
pub struct CameraCalibrationBuilder {
    calibration: CameraCalibration,
}

impl CameraCalibrationBuilder {
    fn new(band: Band, width: usize, height: usize) -> Self {
        Self {
            calibration: CameraCalibration {
                band,
                width,
                height,
                a1: None,
                a2: None,
                a3: None,
                dark_level: None,
                exposure_time: None,
                gain: None,
                bits_per_sample: None,
                vignetting_center: None,
                vignetting_polynomial: None,
                location: None,
                capture_time: None,
                irradiance: None,
                sun_sensor: None,
            },
        }
    }

    pub fn radiometric_coefficients(mut self, a1: f64, a2: f64, a3: f64) -> Self {
        self.calibration.a1 = Some(a1);
        self.calibration.a2 = Some(a2);
        self.calibration.a3 = Some(a3);
        self
    }

    pub fn a1(mut self, a1: f64) -> Self {
        self.calibration.a1 = Some(a1);
        self
    }

    pub fn dark_level(mut self, dark_level: f64) -> Self {
        self.calibration.dark_level = Some(dark_level);
        self
    }

    pub fn exposure_time(mut self, seconds: f64) -> Self {
        self.calibration.exposure_time = Some(seconds);
        self
    }

    pub fn gain(mut self, gain: f64) -> Self {
        self.calibration.gain = Some(gain);
        self
    }

    pub fn bits_per_sample(mut self, bits: u32) -> Self {
        self.calibration.bits_per_sample = Some(bits);
        self
    }

    pub fn vignetting(mut self, center: VignettingCenter, polynomial: Vec<f64>) -> Self {
        self.calibration.vignetting_center = Some(center);
        self.calibration.vignetting_polynomial = Some(polynomial);
        self
    }

    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.calibration.location = Some(GeoLocation { latitude, longitude });
        self
    }

    pub fn capture_time(mut self, time: DateTime<Utc>) -> Self {
        self.calibration.capture_time = Some(time);
        self
    }

    pub fn irradiance(mut self, irradiance: f64) -> Self {
        self.calibration.irradiance = Some(irradiance);
        self
    }

    pub fn sun_sensor(mut self, spectral_irradiance: f64) -> Self {
        self.calibration.sun_sensor = Some(spectral_irradiance);
        self
    }

    pub fn build(self) -> CameraCalibration {
        self.calibration
    }
}
