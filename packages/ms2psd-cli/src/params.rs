use crate::cli::Cli;
use ms2psd_rs::{CornerFrequencies, OutputType, PipelineConfig};
use std::path::Path;

/// Validate that an input file exists and is a regular file.
pub fn validate_file(file_path: &str, what: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("{} file not found: {}", what, file_path));
    }
    if !path.is_file() {
        return Err(format!("{} path is not a file: {}", what, file_path));
    }
    Ok(())
}

/// Validate that an output path can be created: its directory must exist
/// and the path itself must not be a directory.
pub fn validate_output_path(file_path: &str, what: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if path.is_dir() {
        return Err(format!("{} path is a directory: {}", what, file_path));
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(format!(
            "{} directory does not exist: {}",
            what,
            parent.display()
        )),
        _ => Ok(()),
    }
}

/// A diagnostics directory may be missing (it is created) but must not be a file.
pub fn validate_diagnostics_dir(dir: &str) -> Result<(), String> {
    let path = Path::new(dir);
    if path.exists() && !path.is_dir() {
        return Err(format!("Diagnostics path is not a directory: {}", dir));
    }
    Ok(())
}

pub fn validate_sample_rate(sample_rate: Option<f64>) -> Result<(), String> {
    match sample_rate {
        Some(rate) if !rate.is_finite() || rate <= 0.0 => {
            Err(format!("Sample rate must be a positive number, got {}", rate))
        }
        _ => Ok(()),
    }
}

/// Build and validate the pipeline configuration from parsed arguments.
pub fn build_config(args: &Cli) -> Result<PipelineConfig, String> {
    let corners =
        CornerFrequencies::new(args.f1, args.f2, args.f3, args.f4).map_err(|e| e.to_string())?;
    let output_type = OutputType::from_code(args.totype).ok_or_else(|| {
        format!(
            "Unknown output type {}. Valid types: 0 (displacement), 1 (velocity), 2 (acceleration)",
            args.totype
        )
    })?;

    let config = PipelineConfig::new(corners, output_type)
        .with_taper_fraction(args.taper)
        .with_water_level(args.water_level)
        .with_psd_source(args.psd_source.into());
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}
