//! The command line interface for the program.
use crate::frame::Animation;
use crate::input::load_report;
use crate::log;
use crate::output::capacity_chart::capacity_chart_figure;
use crate::output::html::write_report;
use crate::output::map::animated_map_figure;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir, write_animation_rows};
use crate::report::ReportData;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to also write the animation table to a CSV file
    #[arg(long)]
    pub debug_output: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build a report.
    Run {
        /// Path to the report directory.
        report_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example reports.
    Example {
        /// The available subcommands for managing example reports.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a report definition and the data it refers to.
    Validate {
        /// The path to the report directory.
        report_dir: PathBuf,
    },
    /// Manage the program settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { report_dir, opts } => handle_run_command(&report_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { report_dir } => handle_validate_command(&report_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ plantmap --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
pub fn handle_run_command(
    report_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(report_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let report = load_report(report_path).context("Failed to load report.")?;
    info!("Loaded report from {}", report_path.display());
    info!("Output folder: {}", output_path.display());

    let animation = Animation::new(&report.entity_sets);
    let frames = animation.frames();
    if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
        info!("Animating {} frames from {first} to {last}", frames.len());
    } else {
        warn!("No plants with a valid event date were found; the map will be empty");
    }

    let debug_output = opts.debug_output || settings.debug_output;
    write_outputs(report_path, output_path, &report, &animation, debug_output)?;
    info!("Report complete!");

    Ok(())
}

/// Write the report and its accompanying files
fn write_outputs(
    report_path: &Path,
    output_path: &Path,
    report: &ReportData,
    animation: &Animation,
    debug_output: bool,
) -> Result<()> {
    let map = animated_map_figure(
        animation,
        &report.definition.title,
        report.definition.colour_by,
    )
    .context("Failed to build map.")?;
    let capacity_chart = report
        .remaining_capacity
        .as_ref()
        .map(capacity_chart_figure)
        .transpose()
        .context("Failed to build capacity chart.")?;
    write_report(
        output_path,
        &report.definition.title,
        &map,
        capacity_chart.as_ref(),
    )
    .context("Failed to write report.")?;

    if debug_output {
        write_animation_rows(output_path, animation.rows())
            .context("Failed to write animation table.")?;
    }

    write_metadata(
        output_path,
        report_path,
        &report.entity_sets,
        animation.frames().len(),
    )
    .context("Failed to save metadata.")?;

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(report_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the report
    let report = load_report(report_path).context("Failed to validate report.")?;
    info!(
        "Report validation successful! {} frames to animate.",
        Animation::new(&report.entity_sets).frames().len()
    );

    Ok(())
}
