use std::path::{Path, PathBuf};

use crate::define_rng;
use crate::error::ContagionError;
use crate::log::{info, LogLevelSpec};
use crate::parameters::Parameters;
#[cfg(feature = "progress_bar")]
use crate::progress::{finish_step_progress, init_step_progress_bar, update_step_progress};
use crate::random::seeded_rng;
use crate::report::{CensusReport, ReportOptions};
use crate::simulation::{Census, Simulation};
use clap::{Args, Command, FromArgMatches as _};

define_rng!(PlacementRng);

/// Default cli arguments for the contagion runner
#[derive(Args, Debug, Clone)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path to a JSON parameters file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Optional directory for the census report; no report is written without it
    #[arg(short, long, default_value = "")]
    pub output_dir: String,

    /// Prefix for report file names
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Replace existing report files
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Log level, either global (`info`) or per module (`warn,contagion::simulation=trace`)
    #[arg(short, long, default_value = "")]
    pub log_level: String,

    /// Number of particles
    #[arg(short, long, default_value = "100")]
    pub population: usize,

    /// Distance each particle travels per tick
    #[arg(short, long, default_value = "5.0")]
    pub speed: f64,

    /// Particles infected at the start
    #[arg(short, long, default_value = "1")]
    pub infected: usize,

    /// Particles requested immune at the start
    #[arg(long, default_value = "0")]
    pub immune: usize,

    /// Stop after this many ticks even if the epidemic is still running
    #[arg(short, long, default_value = "1000")]
    pub max_steps: u64,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

// Library callers and tests get no progress bar.
impl Default for BaseArgs {
    fn default() -> Self {
        Self {
            random_seed: 0,
            config: String::new(),
            output_dir: String::new(),
            file_prefix: String::new(),
            force_overwrite: false,
            log_level: String::new(),
            population: 100,
            speed: 5.0,
            infected: 1,
            immune: 0,
            max_steps: 1000,
            no_progress: true,
        }
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    /// True if the run ended because no particle was infected any more.
    pub completed: bool,
    pub census: Census,
    pub report: Option<PathBuf>,
}

fn create_contagion_cli() -> Command {
    let cli = Command::new("contagion").about("Particle epidemic simulation");
    BaseArgs::augment_args(cli)
}

/// Parses the process arguments and runs a simulation.
///
/// # Errors
/// Returns an error if argument parsing fails or the run fails
pub fn run_with_args() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let matches = create_contagion_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run(&args)?)
}

/// Runs one simulation as described by `args`: tick until no particle is infected or the step
/// limit is reached, writing a census row per tick when an output directory is given.
///
/// # Errors
/// Returns a `ContagionError` if logging, parameters, counts or the report are invalid
pub fn run(args: &BaseArgs) -> Result<RunSummary, ContagionError> {
    if !args.log_level.is_empty() {
        args.log_level.parse::<LogLevelSpec>()?.apply();
    }

    let parameters = if args.config.is_empty() {
        Parameters::default()
    } else {
        info!("loading parameters from: {}", args.config);
        Parameters::from_json_file(Path::new(&args.config))?
    };

    let mut report = if args.output_dir.is_empty() {
        None
    } else {
        let mut report_options = ReportOptions::default();
        report_options
            .directory(PathBuf::from(&args.output_dir))
            .file_prefix(args.file_prefix.clone())
            .overwrite(args.force_overwrite);
        Some(CensusReport::create(&report_options)?)
    };

    let mut rng = seeded_rng::<PlacementRng>(args.random_seed);
    let mut simulation = Simulation::new(
        parameters,
        args.population,
        args.speed,
        args.infected,
        args.immune,
        &mut rng,
    )?;

    let show_progress = !args.no_progress;
    progress_start(show_progress, args.max_steps);

    if let Some(report) = report.as_mut() {
        report.send(&simulation.census())?;
    }
    while !simulation.is_complete() && simulation.time() < args.max_steps {
        simulation.tick();
        if let Some(report) = report.as_mut() {
            report.send(&simulation.census())?;
        }
        progress_update(show_progress, simulation.time());
    }
    progress_finish(show_progress);

    let census = simulation.census();
    let completed = simulation.is_complete();
    if completed {
        info!(
            "epidemic over after {} ticks: {} immune, {} never infected",
            simulation.time(),
            census.immune,
            census.vulnerable
        );
    } else {
        info!(
            "stopped at step limit {} with {} still infected",
            args.max_steps, census.infected
        );
    }

    Ok(RunSummary {
        steps: simulation.time(),
        completed,
        census,
        report: report.map(|report| report.path().to_path_buf()),
    })
}

#[cfg(feature = "progress_bar")]
fn progress_start(enabled: bool, max_steps: u64) {
    if enabled {
        init_step_progress_bar(max_steps);
    }
}

#[cfg(feature = "progress_bar")]
fn progress_update(enabled: bool, step: u64) {
    if enabled {
        update_step_progress(step);
    }
}

#[cfg(feature = "progress_bar")]
fn progress_finish(enabled: bool) {
    if enabled {
        finish_step_progress();
    }
}

#[cfg(not(feature = "progress_bar"))]
fn progress_start(_enabled: bool, _max_steps: u64) {}

#[cfg(not(feature = "progress_bar"))]
fn progress_update(_enabled: bool, _step: u64) {}

#[cfg(not(feature = "progress_bar"))]
fn progress_finish(_enabled: bool) {}
