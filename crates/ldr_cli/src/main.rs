//! ld-regress - regression test harness for the LaserDisc decoding
//! toolchain.
//!
//! Drives the fixed decode sequence against one input sample and
//! checks the caller's expectations after each stage. Exit code 0 on
//! full success; any failure prints a single descriptive line to
//! standard error and exits 1.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use clap::Parser;

use ldr_core::config::{ConfigManager, Settings};
use ldr_core::logging::{LogConfig, LogLevel, RunLogger};
use ldr_core::models::{Expectations, OutputBase, RunConfig, VideoSystem};
use ldr_core::orchestrator::{build_pipeline, Context, RunState};
use ldr_core::tools::{ensure_output_dir, ToolEnv};

/// Default settings file looked up next to the working directory.
const DEFAULT_CONFIG: &str = "ld-regress.toml";

#[derive(Parser, Debug)]
#[command(
    name = "ld-regress",
    version,
    about = "Regression test harness for the LaserDisc decoding toolchain"
)]
struct Cli {
    /// Input sample file to decode.
    input: PathBuf,

    /// Output basename all artifact filenames are derived from.
    #[arg(default_value = "testout/test")]
    output: PathBuf,

    /// Print the commands without executing anything.
    #[arg(long)]
    dry_run: bool,

    /// Treat the sample as PAL (default is NTSC).
    #[arg(long)]
    pal: bool,

    /// The source has no digital audio subcarrier; skip EFM processing.
    #[arg(long = "no-efm")]
    no_efm: bool,

    /// Chroma decoder variant to exercise (repeatable).
    #[arg(long = "decoder", value_name = "NAME")]
    decoders: Vec<String>,

    /// Minimum number of decoded frames per chroma decoder run.
    #[arg(long, value_name = "N")]
    expect_frames: Option<u64>,

    /// Minimum median bPSNR in dB across the decoded fields.
    #[arg(long, value_name = "DB")]
    expect_bpsnr: Option<f64>,

    /// VBI triple that must appear on at least one field, e.g. 9,1,2.
    #[arg(long, value_name = "A,B,C", value_delimiter = ',', allow_hyphen_values = true)]
    expect_vbi: Option<Vec<i64>>,

    /// Minimum number of stereo sample pairs in the digital audio output.
    #[arg(long, value_name = "N")]
    expect_efm_samples: Option<u64>,

    /// Settings file (TOML). Defaults to ld-regress.toml when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the toolchain installation root.
    #[arg(long, value_name = "DIR")]
    tool_root: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn expectations(&self) -> Result<Expectations> {
        let vbi = match &self.expect_vbi {
            Some(values) => {
                let triple: [i64; 3] = values.as_slice().try_into().map_err(|_| {
                    anyhow::anyhow!(
                        "--expect-vbi takes exactly three comma-separated integers, got {}",
                        values.len()
                    )
                })?;
                Some(triple)
            }
            None => None,
        };

        Ok(Expectations {
            min_frames: self.expect_frames,
            min_bpsnr: self.expect_bpsnr,
            vbi,
            min_efm_samples: self.expect_efm_samples,
        })
    }

    fn run_config(&self) -> Result<RunConfig> {
        Ok(RunConfig {
            input: self.input.clone(),
            output_base: OutputBase::new(&self.output),
            system: if self.pal {
                VideoSystem::Pal
            } else {
                VideoSystem::Ntsc
            },
            digital_audio: !self.no_efm,
            chroma_decoders: self.decoders.clone(),
            expect: self.expectations()?,
            dry_run: self.dry_run,
        })
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let manager = match &cli.config {
        Some(path) => {
            let mut manager = ConfigManager::new(path);
            manager
                .load()
                .with_context(|| format!("loading settings from {}", path.display()))?;
            manager
        }
        None => {
            let mut manager = ConfigManager::new(DEFAULT_CONFIG);
            manager.load_or_default().context("loading settings")?;
            manager
        }
    };
    Ok(manager.settings().clone())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_logger(cli: &Cli, settings: &Settings, base: &OutputBase) -> Result<Arc<RunLogger>> {
    let log_config = LogConfig {
        level: if cli.verbose {
            LogLevel::Debug
        } else {
            settings.logging.level
        },
        error_tail: settings.logging.error_tail,
        show_timestamps: settings.logging.show_timestamps,
    };

    let logger = if settings.logging.write_log_file && !cli.dry_run {
        RunLogger::with_file(&base.name(), &settings.paths.logs_folder, log_config)
            .context("creating run log file")?
    } else {
        RunLogger::console(log_config)
    };
    Ok(Arc::new(logger))
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    let config = cli.run_config()?;

    if !config.dry_run && !config.input.exists() {
        bail!("input file not found: {}", config.input.display());
    }

    let tool_root = cli
        .tool_root
        .clone()
        .or_else(|| settings.tools.root.as_ref().map(PathBuf::from));
    let env = ToolEnv::prepare(tool_root).context("resolving toolchain root")?;

    if !config.dry_run {
        ensure_output_dir(&config.output_base).with_context(|| {
            format!("creating output directory for {}", config.output_base)
        })?;
    }

    let logger = build_logger(&cli, &settings, &config.output_base)?;
    logger.info(&format!(
        "Decoding {} as {} (tools in {})",
        config.input.display(),
        config.system,
        env.tool_root().display()
    ));

    let pipeline = build_pipeline(&config);
    let ctx = Context::new(config, settings, env, logger);
    let mut state = RunState::new();

    pipeline.run(&ctx, &mut state)?;
    Ok(())
}

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn minimal_invocation_uses_defaults() {
        let cli = Cli::try_parse_from(["ld-regress", "sample.lds"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("sample.lds"));
        assert_eq!(cli.output, PathBuf::from("testout/test"));
        assert!(!cli.pal);
        assert!(!cli.no_efm);
        assert!(cli.decoders.is_empty());

        let config = cli.run_config().unwrap();
        assert_eq!(config.system, VideoSystem::Ntsc);
        assert!(config.digital_audio);
    }

    #[test]
    fn full_invocation_parses() {
        let cli = Cli::try_parse_from([
            "ld-regress",
            "--pal",
            "--no-efm",
            "--decoder",
            "pal2d",
            "--decoder",
            "transform3d",
            "--expect-frames",
            "25",
            "--expect-bpsnr",
            "28.5",
            "--expect-vbi",
            "9,1,2",
            "--expect-efm-samples",
            "44100",
            "sample.lds",
            "out/run1",
        ])
        .unwrap();

        let config = cli.run_config().unwrap();
        assert_eq!(config.system, VideoSystem::Pal);
        assert!(!config.digital_audio);
        assert_eq!(config.chroma_decoders, vec!["pal2d", "transform3d"]);
        assert_eq!(config.expect.min_frames, Some(25));
        assert_eq!(config.expect.min_bpsnr, Some(28.5));
        assert_eq!(config.expect.vbi, Some([9, 1, 2]));
        assert_eq!(config.expect.min_efm_samples, Some(44100));
    }

    #[test]
    fn vbi_expectation_requires_three_values() {
        let cli =
            Cli::try_parse_from(["ld-regress", "--expect-vbi", "9,1", "sample.lds"]).unwrap();
        let err = cli.run_config().unwrap_err();
        assert!(err.to_string().contains("exactly three"));
    }

    #[test]
    fn missing_input_is_a_parse_error() {
        assert!(Cli::try_parse_from(["ld-regress"]).is_err());
    }
}
