// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Yomitori: extract text from an image.
//
// Entry point. Parses flags, builds the extraction config, initialises
// logging, and runs the pipeline. Extracted text goes to stdout; logs and
// debug output go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use yomitori_core::config::{DEFAULT_LANGUAGE_DATA_DIR, DEFAULT_TARGET_PIXEL_AREA};
use yomitori_core::error::{Result, YomitoriError};
use yomitori_core::human_errors::humanize_error;
use yomitori_core::{OcrConfig, ProcessingMode};
use yomitori_ocr::{LanguageAvailability, Pipeline, TessdataDirectory};

/// Extract text from an image with Tesseract, with CJK-aware cleanup.
#[derive(Debug, Parser)]
#[command(name = "yomitori", version, about)]
struct Cli {
    /// Image to read.
    #[arg(value_name = "IMAGE_PATH", required_unless_present = "list_languages")]
    image: Option<PathBuf>,

    /// Directory where Tesseract language data files are stored
    /// [default: /usr/share/tessdata].
    #[arg(long = "tessdata", value_name = "DIR")]
    tessdata: Option<PathBuf>,

    /// Images smaller than this many pixels are upscaled before recognition
    /// [default: 500000].
    #[arg(long, value_name = "PIXELS")]
    target_pixel_area: Option<f64>,

    /// Languages to recognise, '+'-separated [default: jpn+eng].
    #[arg(long, value_name = "LANGS")]
    languages: Option<String>,

    /// Preprocessing mode: standard or accelerated [default: standard].
    #[arg(long, value_name = "MODE")]
    mode: Option<ProcessingMode>,

    /// Fail instead of falling back to standard preprocessing when the
    /// accelerated mode is unavailable.
    #[arg(long)]
    no_fallback: bool,

    /// JSON config file. Flags given on the command line take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the installed languages and exit.
    #[arg(long)]
    list_languages: bool,

    /// Print the effective configuration and timing to stderr.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn build_config(&self) -> Result<OcrConfig> {
        let mut config = match &self.config {
            Some(path) => OcrConfig::from_json_file(path)?,
            None => OcrConfig::default(),
        };

        if let Some(dir) = &self.tessdata {
            config.language_data_dir = dir.clone();
        }
        if let Some(area) = self.target_pixel_area {
            config.target_pixel_area = area;
        }
        if let Some(list) = &self.languages {
            config.languages = OcrConfig::parse_languages(list);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.no_fallback {
            config.fallback_to_standard = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Extraction failed");
            let human = humanize_error(&err);
            eprintln!("{human}");
            ExitCode::from(human.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;

    if cli.list_languages {
        for code in TessdataDirectory.list_available(&config.language_data_dir)? {
            println!("{code}");
        }
        return Ok(());
    }

    let Some(image) = cli.image.as_deref() else {
        return Err(YomitoriError::InvalidConfig("no image path given".into()));
    };
    if !image.exists() {
        return Err(YomitoriError::ImageRead {
            path: image.to_path_buf(),
            reason: "No such file or directory".into(),
        });
    }

    if cli.debug {
        eprintln!("Running with the following configuration:");
        eprintln!("{}", config.to_json_pretty()?);
    }
    let started = Instant::now();

    let pipeline = Pipeline::new(TessdataDirectory, engine_for(&config));
    let text = pipeline.extract_text(image, &config)?;
    print!("{text}");

    if cli.debug {
        eprintln!("\nOCR finished in {:?}", started.elapsed());
    }
    Ok(())
}

#[cfg(feature = "tesseract")]
fn engine_for(config: &OcrConfig) -> yomitori_ocr::TesseractEngine {
    yomitori_ocr::TesseractEngine::new(&config.language_data_dir)
}

#[cfg(not(feature = "tesseract"))]
fn engine_for(_config: &OcrConfig) -> yomitori_ocr::UnavailableEngine {
    yomitori_ocr::UnavailableEngine
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("yomitori").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn defaults_match_core_defaults() {
        let config = parse(&["page.png"]).build_config().expect("config");
        assert_eq!(config.language_data_dir, PathBuf::from(DEFAULT_LANGUAGE_DATA_DIR));
        assert_eq!(config.target_pixel_area, DEFAULT_TARGET_PIXEL_AREA);
        assert_eq!(config.language_spec(), "jpn+eng");
        assert_eq!(config.mode, ProcessingMode::Standard);
        assert!(config.fallback_to_standard);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--tessdata",
            "/opt/tessdata",
            "--target-pixel-area",
            "250000",
            "--languages",
            "kor+eng",
            "--mode",
            "accelerated",
            "--no-fallback",
            "page.png",
        ]);
        let config = cli.build_config().expect("config");
        assert_eq!(config.language_data_dir, PathBuf::from("/opt/tessdata"));
        assert_eq!(config.target_pixel_area, 250_000.0);
        assert_eq!(config.languages, vec!["kor", "eng"]);
        assert_eq!(config.mode, ProcessingMode::Accelerated);
        assert!(!config.fallback_to_standard);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"languages": ["chi_sim"], "target_pixel_area": 1000.0}}"#
        )
        .expect("write");
        file.flush().expect("flush");
        let path = file.path().to_str().expect("utf-8 path").to_owned();

        let config = parse(&["--config", &path, "--target-pixel-area", "2000", "page.png"])
            .build_config()
            .expect("config");
        assert_eq!(config.languages, vec!["chi_sim"]);
        assert_eq!(config.target_pixel_area, 2000.0);
    }

    #[test]
    fn empty_language_list_is_rejected() {
        let result = parse(&["--languages", "+", "page.png"]).build_config();
        assert!(matches!(result, Err(YomitoriError::InvalidConfig(_))));
    }

    #[test]
    fn image_path_required_unless_listing() {
        assert!(Cli::try_parse_from(["yomitori"]).is_err());
        assert!(Cli::try_parse_from(["yomitori", "--list-languages"]).is_ok());
    }

    #[test]
    fn missing_image_is_action_required() {
        let cli = parse(&["/nonexistent/page.png"]);
        let err = run(&cli).expect_err("missing image");
        assert!(matches!(err, YomitoriError::ImageRead { .. }));
        assert_eq!(humanize_error(&err).exit_code(), 2);
    }
}
