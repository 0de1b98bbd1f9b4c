//! Parallel calibration of many band images
//!
//! Every image is independent, so jobs are fanned out over the rayon pool with no
//! coordination. Results keep the input order and each job fails on its own.

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::radiometry::calibration::{CameraCalibration, RawPixels, RawSample};
use crate::radiometry::common::error::Result;
use crate::radiometry::irradiance::{SunGeometry, compute_irradiance_scale_factor};
use crate::radiometry::radiance::dn_to_radiance;
use crate::radiometry::reflectance::dn_to_reflectance;

/// Physical quantity produced from the raw counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    Radiance,
    #[default]
    Reflectance,
}

/// One photo of one band
#[derive(Debug, Clone)]
pub struct BandJob {
    pub calibration: CameraCalibration,
    pub pixels: RawPixels,
}

impl BandJob {
    pub fn new(calibration: CameraCalibration, pixels: RawPixels) -> Self {
        Self { calibration, pixels }
    }

    pub fn run<G: SunGeometry + ?Sized>(
        &self,
        kind: OutputKind,
        use_sun_sensor: bool,
        geometry: &G,
    ) -> Result<Array2<f64>> {
        calibrate_pixels(&self.calibration, &self.pixels, kind, use_sun_sensor, geometry)
    }
}

/// Converts decoded pixels of any supported sample type.
pub fn calibrate_pixels<G: SunGeometry + ?Sized>(
    calibration: &CameraCalibration,
    pixels: &RawPixels,
    kind: OutputKind,
    use_sun_sensor: bool,
    geometry: &G,
) -> Result<Array2<f64>> {
    match pixels {
        RawPixels::U8(raw) => convert(calibration, raw, kind, use_sun_sensor, geometry),
        RawPixels::U16(raw) => convert(calibration, raw, kind, use_sun_sensor, geometry),
        RawPixels::U32(raw) => convert(calibration, raw, kind, use_sun_sensor, geometry),
    }
}

fn convert<T: RawSample, G: SunGeometry + ?Sized>(
    calibration: &CameraCalibration,
    raw: &Array2<T>,
    kind: OutputKind,
    use_sun_sensor: bool,
    geometry: &G,
) -> Result<Array2<f64>> {
    match kind {
        OutputKind::Radiance => dn_to_radiance(calibration, raw),
        OutputKind::Reflectance => dn_to_reflectance(calibration, raw, use_sun_sensor, geometry),
    }
}

pub fn calibrate_batch<G: SunGeometry + Sync + ?Sized>(
    jobs: &[BandJob],
    kind: OutputKind,
    use_sun_sensor: bool,
    geometry: &G,
) -> Vec<Result<Array2<f64>>> {
    info!(jobs = jobs.len(), ?kind, "Calibrating batch");

    let results: Vec<Result<Array2<f64>>> = jobs
        .par_iter()
        .map(|job| job.run(kind, use_sun_sensor, geometry))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    debug!(failed, "Batch complete");
    results
}

/// Irradiance scale factor of every photo, e.g. for flight-wide normalization.
pub fn irradiance_scale_factors<G: SunGeometry + Sync + ?Sized>(
    calibrations: &[CameraCalibration],
    use_sun_sensor: bool,
    geometry: &G,
) -> Vec<Result<f64>> {
    calibrations
        .par_iter()
        .map(|calibration| compute_irradiance_scale_factor(calibration, use_sun_sensor, geometry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radiometry::common::error::RadiometryError;
    use crate::radiometry::irradiance::UnavailableSunGeometry;
    use ndarray::array;
    use std::f64::consts::PI;

    fn job(band: &str, irradiance: Option<f64>, pixels: RawPixels) -> BandJob {
        let (height, width) = pixels.dim();
        let mut calibration = CameraCalibration::builder(band, width, height)
            .bits_per_sample(16)
            .build();
        calibration.irradiance = irradiance;
        BandJob::new(calibration, pixels)
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let jobs = vec![
            job("Red", Some(2.0), RawPixels::U16(array![[0u16, 32768]])),
            job("Green", Some(0.0), RawPixels::U16(array![[1, 2]])),
            job("LWIR", None, RawPixels::U16(array![[27315, 27415]])),
            job("Blue", None, RawPixels::U8(array![[255u8], [0]])),
        ];

        let results = calibrate_batch(&jobs, OutputKind::Reflectance, false, &UnavailableSunGeometry);

        assert_eq!(results.len(), 4);
        let red = results[0].as_ref().unwrap();
        assert_eq!(red[[0, 1]], 0.5 * (PI / 2.0));
        assert!(matches!(results[1], Err(RadiometryError::InvalidIrradiance(_))));
        assert_eq!(results[2].as_ref().unwrap(), &array![[0.0, (27415.0 - 27315.0) * 0.01]]);
        assert_eq!(results[3].as_ref().unwrap(), &array![[255.0 / 65536.0], [0.0]]);
    }

    #[test]
    fn test_radiance_kind_ignores_irradiance() {
        let jobs = vec![job("Red", Some(0.0), RawPixels::U32(array![[65536u32]]))];
        let results = calibrate_batch(&jobs, OutputKind::Radiance, true, &UnavailableSunGeometry);
        assert_eq!(results[0].as_ref().unwrap(), &array![[1.0]]);
    }

    #[test]
    fn test_scale_factors() {
        let calibrations = vec![
            CameraCalibration::builder("Red", 1, 1).irradiance(PI).build(),
            CameraCalibration::builder("LWIR", 1, 1).build(),
            CameraCalibration::builder("Nir", 1, 1).build(),
        ];

        let factors = irradiance_scale_factors(&calibrations, false, &UnavailableSunGeometry);
        let factors: Vec<f64> = factors.into_iter().map(|f| f.unwrap()).collect();
        assert_eq!(factors, vec![1.0, 1.0, 1.0]);
    }
}
