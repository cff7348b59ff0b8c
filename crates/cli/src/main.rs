use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use skinconsult_core::detection::domain::landmark_detector::LandmarkDetector;
use skinconsult_core::detection::infrastructure::http_landmark_detector::HttpLandmarkDetector;
use skinconsult_core::detection::infrastructure::recorded_landmark_detector::RecordedLandmarkDetector;
use skinconsult_core::detection::infrastructure::topology_checked_detector::TopologyCheckedDetector;
use skinconsult_core::pipeline::consult_customer_use_case::{
    ConsultCustomerUseCase, SimulationOptions,
};
use skinconsult_core::pipeline::consult_staff_use_case::ConsultStaffUseCase;
use skinconsult_core::pipeline::consult_use_case::ConsultUseCase;
use skinconsult_core::pipeline::consultation_logger::{
    ConsultationLogger, NullConsultationLogger, TimingConsultationLogger,
};
use skinconsult_core::recommendation::domain::rule_table::RuleTable;
use skinconsult_core::recommendation::infrastructure::rule_table_loader::load_rule_table;
use skinconsult_core::shared::constants::IMAGE_EXTENSIONS;
use skinconsult_core::shared::image_codec::EncodedFormat;
use skinconsult_core::shared::settings::Settings;
use skinconsult_core::simulation::simulation_engine::SimulationResult;

/// Skin analysis, service recommendations and before/after simulations.
#[derive(Parser)]
#[command(name = "skinconsult")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Face service endpoint (overrides settings).
    #[arg(long, global = true)]
    detector_url: Option<String>,

    /// Recorded detector response to use instead of the face service.
    #[arg(long, global = true)]
    landmarks: Option<PathBuf>,

    /// JSON rule table replacing the built-in rules.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Settings file (default: platform config dir).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Also simulate this many days of product use.
    #[arg(long, global = true)]
    product_days: Option<u32>,

    /// Write the before/after images into this directory.
    #[arg(long, global = true)]
    save_images: Option<PathBuf>,

    /// Simulation image format: jpeg or png.
    #[arg(long, global = true)]
    format: Option<EncodedFormat>,

    /// Log per-stage timings when done.
    #[arg(long, global = true)]
    timings: bool,

    /// Accept landmark sets of any size.
    #[arg(long, global = true)]
    skip_topology_check: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Full analysis for salon staff.
    Staff { image: PathBuf },
    /// Before/after simulation for the customer.
    Customer { image: PathBuf },
    /// Both views of one image.
    Consult { image: PathBuf },
}

impl Command {
    fn image(&self) -> &Path {
        match self {
            Command::Staff { image } | Command::Customer { image } | Command::Consult { image } => {
                image
            }
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let image = cli.command.image();
    validate(image)?;

    let settings = apply_overrides(Settings::load(cli.settings.as_deref())?, &cli);
    let rules = match &settings.rules_path {
        Some(path) => load_rule_table(path)?,
        None => RuleTable::fallback(),
    };
    let options = SimulationOptions {
        product_days: settings.product_days_option(),
        format: settings.image_format,
    };

    let bytes = fs::read(image)?;
    let mut logger: Box<dyn ConsultationLogger> = if cli.timings {
        Box::new(TimingConsultationLogger::new())
    } else {
        Box::new(NullConsultationLogger)
    };

    match &cli.command {
        Command::Staff { .. } => {
            let use_case = ConsultStaffUseCase::new(build_detector(&settings, &cli)?, rules);
            let report = use_case.execute(&bytes, logger.as_mut())?;
            print_json(&report)?;
        }
        Command::Customer { .. } => {
            let use_case =
                ConsultCustomerUseCase::new(build_detector(&settings, &cli)?, rules, options);
            let report = use_case.execute(&bytes, logger.as_mut())?;
            save_images(cli.save_images.as_deref(), &report.images)?;
            print_json(&report)?;
        }
        Command::Consult { .. } => {
            let use_case = ConsultUseCase::new(
                ConsultStaffUseCase::new(build_detector(&settings, &cli)?, rules.clone()),
                ConsultCustomerUseCase::new(build_detector(&settings, &cli)?, rules, options),
            );
            let report = use_case.execute(&bytes, logger.as_mut())?;
            save_images(cli.save_images.as_deref(), &report.customer.images)?;
            print_json(&report)?;
        }
    }

    logger.summary();
    Ok(())
}

/// Command-line flags take precedence over the settings file.
fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(url) = &cli.detector_url {
        settings.detector_url = url.clone();
    }
    if let Some(rules) = &cli.rules {
        settings.rules_path = Some(rules.clone());
    }
    if let Some(days) = cli.product_days {
        settings.product_simulation = true;
        settings.product_days = days;
    }
    if let Some(format) = cli.format {
        settings.image_format = format;
    }
    settings
}

fn build_detector(
    settings: &Settings,
    cli: &Cli,
) -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
    let base: Box<dyn LandmarkDetector> = match &cli.landmarks {
        Some(path) => {
            log::info!("Using recorded landmarks from {}", path.display());
            Box::new(RecordedLandmarkDetector::from_path(path)?)
        }
        None => Box::new(HttpLandmarkDetector::new(
            settings.detector_url.clone(),
            Duration::from_secs(settings.detector_timeout_secs),
        )?),
    };

    if cli.skip_topology_check {
        Ok(base)
    } else {
        Ok(Box::new(TopologyCheckedDetector::new(
            base,
            settings.expected_landmarks,
        )))
    }
}

fn validate(image: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !image.exists() {
        return Err(format!("Input file not found: {}", image.display()).into());
    }
    if !is_image(image) {
        return Err(format!(
            "Unsupported image type: {} (expected one of: {})",
            image.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Writes `before.<ext>` and `after.<ext>`; nothing is written when there
/// was no face to simulate.
fn save_images(dir: Option<&Path>, images: &SimulationResult) -> std::io::Result<()> {
    let Some(dir) = dir else {
        return Ok(());
    };
    if images.before.is_empty() && images.after.is_empty() {
        log::warn!("No simulation images to save");
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    for (name, image) in [("before", &images.before), ("after", &images.after)] {
        if image.is_empty() {
            continue;
        }
        let path = dir.join(format!("{name}.{}", image.format().extension()));
        fs::write(&path, image.bytes())?;
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_json<T: Serialize>(report: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinconsult_core::shared::frame::Frame;
    use skinconsult_core::shared::image_codec::encode;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("face.JPG")));
        assert!(is_image(Path::new("face.webp")));
        assert!(!is_image(Path::new("face.mp4")));
        assert!(!is_image(Path::new("face")));
    }

    #[test]
    fn test_validate_rejects_missing_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate(&dir.path().join("missing.png")).is_err());

        let text = dir.path().join("notes.txt");
        fs::write(&text, "hi").unwrap();
        let err = validate(&text).unwrap_err();
        assert!(err.to_string().starts_with("Unsupported image type"));
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = parse(&[
            "skinconsult",
            "customer",
            "face.png",
            "--detector-url",
            "http://localhost:8001/detect-face",
            "--product-days",
            "7",
            "--format",
            "png",
        ]);
        let settings = apply_overrides(Settings::default(), &cli);
        assert_eq!(settings.detector_url, "http://localhost:8001/detect-face");
        assert_eq!(settings.product_days_option(), Some(7));
        assert_eq!(settings.image_format, EncodedFormat::Png);
        assert_eq!(cli.command.image(), Path::new("face.png"));
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let cli = parse(&["skinconsult", "staff", "face.jpg"]);
        assert_eq!(apply_overrides(Settings::default(), &cli), Settings::default());
        assert!(!cli.timings);
        assert!(!cli.skip_topology_check);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["skinconsult", "staff", "a.png", "--format", "gif"]).is_err());
    }

    #[test]
    fn test_save_images_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let frame = Frame::filled(4, 4, [200, 150, 120]);
        let images = SimulationResult {
            before: encode(&frame, EncodedFormat::Png).unwrap(),
            after: encode(&frame, EncodedFormat::Png).unwrap(),
        };
        let out = dir.path().join("out");
        save_images(Some(&out), &images).unwrap();
        assert!(out.join("before.png").is_file());
        assert!(out.join("after.png").is_file());
    }

    #[test]
    fn test_save_images_skips_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        save_images(Some(&out), &SimulationResult::empty(EncodedFormat::Jpeg)).unwrap();
        assert!(!out.exists());
    }
}
