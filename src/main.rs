use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use multispectral_radiometry::logger;
use multispectral_radiometry::radiometry::{
    CalibrationPipeline, CameraCalibration, OutputConfig, OutputKind, TiffCompression,
};

use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::DeflateFast => TiffCompression::DeflateFast,
            CompressionArg::DeflateBalanced => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

/// Calibrate a single multispectral band TIFF to reflectance or radiance
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Raw band TIFF
    input: PathBuf,

    /// Calibration sidecar (JSON)
    #[arg(short, long)]
    calibration: PathBuf,

    /// Output float TIFF
    #[arg(short, long)]
    output: PathBuf,

    /// Stop at radiance, skip irradiance normalization
    #[arg(long, default_value_t = false)]
    radiance: bool,

    /// Do not estimate irradiance from the sun sensor
    #[arg(long, default_value_t = false)]
    no_sun_sensor: bool,

    #[arg(long, value_enum, default_value_t = CompressionArg::DeflateBalanced)]
    compression: CompressionArg,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    info!("Starting multispectral calibration...");

    let calibration = CameraCalibration::from_json_file(&args.calibration)
        .with_context(|| format!("loading calibration {}", args.calibration.display()))?;

    let config = OutputConfig::builder()
        .compression(args.compression.into())
        .kind(if args.radiance { OutputKind::Radiance } else { OutputKind::Reflectance })
        .use_sun_sensor(!args.no_sun_sensor)
        .build();
    let pipeline = CalibrationPipeline::new(config);

    info!("Band: {}", calibration.band);
    info!("Output: {:?}", pipeline.config().kind);
    info!("Compression: {:?}", pipeline.config().compression);

    match pipeline.convert_file(&args.input, &calibration, &args.output) {
        Ok(timings) => info!(
            "Calibration successful in {:.1}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        ),
        Err(e) => {
            error!("Calibration failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
