use tracing::{info, instrument};
use std::io::Write;
use std::path::Path;

use crate::radiometry::{
    batch::calibrate_pixels,
    calibration::CameraCalibration,
    common::error::{RadiometryError, Result},
    conversions::timing::{PipelineTimings, Timer},
    irradiance::{SunGeometry, UnavailableSunGeometry},
    tiff::{BandImageReader, OutputConfig, StandardTiffReader, StandardTiffWriter, TiffWriter},
};

pub struct CalibrationPipeline<R: BandImageReader, W: TiffWriter, G: SunGeometry> {
    reader: R,
    writer: W,
    geometry: G,
    config: OutputConfig,
}

impl CalibrationPipeline<StandardTiffReader, StandardTiffWriter, UnavailableSunGeometry> {
    /// Standard TIFF adapters without a solar position model. Photos that need a
    /// sun sensor estimate fail unless `use_sun_sensor` is disabled.
    pub fn new(config: OutputConfig) -> Self {
        Self {
            reader: StandardTiffReader,
            writer: StandardTiffWriter,
            geometry: UnavailableSunGeometry,
            config,
        }
    }
}

impl<R: BandImageReader, W: TiffWriter, G: SunGeometry> CalibrationPipeline<R, W, G> {
    pub fn with_custom(reader: R, writer: W, geometry: G, config: OutputConfig) -> Self {
        Self {
            reader,
            writer,
            geometry,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(RadiometryError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    #[instrument(skip(self, input_data, calibration, output), fields(input_size = input_data.len(), band = %calibration.band))]
    pub fn convert(
        &self,
        input_data: &[u8],
        calibration: &CameraCalibration,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        info!(kind = ?self.config.kind, "Starting band calibration");
        let mut timings = PipelineTimings::new();

        let band = {
            let _span = tracing::info_span!("decode_band").entered();
            let timer = Timer::start("decode");
            let band = self.reader.read_band(input_data)?;
            timings.record(timer);
            band
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = band.width,
                height = band.height
            ).entered();
            self.validate_dimensions(band.width, band.height)?;
        }

        let calibrated = {
            let _span = tracing::info_span!("calibrate").entered();
            let timer = Timer::start("calibrate");
            let calibrated = calibrate_pixels(
                calibration,
                &band.pixels,
                self.config.kind,
                self.config.use_sun_sensor,
                &self.geometry,
            )?;
            timings.record(timer);
            calibrated
        };

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            let timer = Timer::start("encode");
            self.writer.write_band(&calibrated, output, &self.config)?;
            timings.record(timer);
        }

        timings.log_summary();
        info!(
            width = band.width,
            height = band.height,
            "Calibration complete"
        );
        Ok(timings)
    }

    #[instrument(skip(self, input_path, calibration, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        calibration: &CameraCalibration,
        output_path: Q,
    ) -> Result<PipelineTimings> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Calibrating file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                RadiometryError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        // the output file is only created once encoding succeeded
        let mut encoded = Vec::new();
        let timings = self.convert(&input_data, calibration, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, &encoded).map_err(|e| {
                RadiometryError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(timings)
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OutputConfig) {
        self.config = config;
    }
}
