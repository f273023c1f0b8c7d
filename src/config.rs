//! Contains the [Cfg] struct that parses and stores the command line arguments
//!
//! [Cfg] uses procedural macros from the `clap` library to implement most of the argument parsing and validation logic.
//! The [Cfg] struct implements several options and subcommands, as well as convenience functions to get various parts of the configuration

use crate::util::*;
use clap::Parser;
use clap_complete::Shell;

pub mod custom_checks;
pub mod inputoutput;
pub mod lib;
pub mod prelude;
pub mod selection;
pub mod test_util;
pub mod util;
pub mod view;

/// The [CONFIG] static variable is used to store the [Cfg] created from the parsed command line arguments
pub static CONFIG: OnceLock<Cfg> = OnceLock::new();
/// The [CUSTOM_CHECKS] static variable is used to store the [CustomChecks] created from a TOML file specified through the parsed command line arguments
static CUSTOM_CHECKS: OnceLock<CustomChecks> = OnceLock::new();

/// The [Cfg] struct uses procedural macros and implements the [Config] trait, to provide convenient access to the command line arguments.
#[derive(Parser, Debug)]
#[command(name = "evcount - event selection counter for ALICE")]
#[command(bin_name = "evcount", version)]
#[command(about = "evcount counts events per trigger class after physics selection and vertex requirements.")]
#[command(
    long_about = "\nevcount reads reconstructed event records (JSON Lines) and counts\n\
events per trigger class after physics selection, with an SPD vertex,\n\
and with a track vertex, both integrated and versus centrality.\n\
\n\
Collected counters can be written as JSON/TOML, verified against a\n\
previous output, or merged from several outputs."
)]
#[command(propagate_version = true)]
#[command(styles = lib::styles())]
pub struct Cfg {
    /// Input events file in JSON Lines format (default: stdin)
    #[arg(name = "EVENTS", value_hint = clap::ValueHint::FilePath)]
    file: Option<PathBuf>,

    /// Commands such as `View` or `Merge` that changes what is done with the input
    #[command(subcommand)]
    cmd: Option<Command>,

    /// Verbosity level 0-4 (Errors, Warnings, Info, Debug, Trace)
    #[arg(short = 'v', long = "verbosity", default_value_t = 1, global = true)]
    verbosity: u8,

    /// Max tolerate errors before exiting, if set to 0 -> no limit to errors
    #[arg(
        short = 'e',
        long = "max-tolerate-errors",
        visible_aliases = ["max-errors", "tolerate-errors", "stop-at-error-count"],
        default_value_t = 0,
        global = true
    )]
    max_tolerate_errors: u32,

    /// Set the exit code for if any errors are detected in the input events (cannot be 0)
    #[arg(
        short = 'E',
        long = "any-errors-exit-code",
        visible_alias = "exit-code",
        global = true
    )]
    any_errors_exit_code: Option<u8>,

    /// Multiplicity estimator used for the event centrality
    #[arg(
        short = 'x',
        long = "estimator",
        visible_alias = "centrality-estimator",
        default_value = crate::classify::DEFAULT_ESTIMATOR,
        global = true
    )]
    estimator: String,

    /// Don't show error messages - helpful if there's a large amount of errors and you just want to see the report
    #[arg(short, long, default_value_t = false, global = true)]
    mute_errors: bool,

    /// Generate a check TOML file in the current directory that can be used as a template to configure checks against the collected counters.
    #[arg(short, long, default_value_t = false, global = true, visible_aliases = ["gen-toml", "gen-checks"],)]
    generate_checks_toml: bool,

    /// Path to a checks TOML file that can be used to specify expected counts.
    #[arg(
        short = 'c',
        long,
        global = true,
        visible_aliases = ["custom-checks", "checks-file"],
        value_hint = clap::ValueHint::FilePath
      )]
    checks_toml: Option<PathBuf>,

    /// Output stats (default: none), requires setting a data format option (JSON, TOML)
    #[arg(
        name = "OUTPUT FINAL STATS",
        short = 'S',
        long = "output-stats",
        default_value_t = DataOutputMode::None,
        visible_aliases = ["output-stats-report","output-final-stats"],
        global = true,
        requires = "STATS FORMAT",
    )]
    stats_output: DataOutputMode,

    /// Output stats format (JSON/TOML), requires setting a stats output option
    #[arg(
        name = "STATS FORMAT",
        short = 'D',
        long = "stats-format",
        visible_alias = "stats-data-format",
        global = true,
        requires = "OUTPUT FINAL STATS"
    )]
    stats_output_format: Option<DataOutputFormat>,

    /// Input stats file to read from and verify match with collected stats at end of the run.
    /// The file extension determines the format (JSON/TOML)
    #[arg(
        name = "INPUT STATS FILE",
        short = 'i',
        long = "input-stats-file",
        visible_aliases = ["input-stats", "stats-file", "verify-stats"],
        global = true,
        value_hint = clap::ValueHint::FilePath
    )]
    input_stats_file: Option<PathBuf>,

    /// Generate completion scripts for the specified shell.
    /// Note: The completion script is printed to stdout
    #[arg(
        long = "generate-completions",
        value_hint = clap::ValueHint::Other,
        value_name = "SHELL"
    )]
    pub generate_completions: Option<clap_complete::Shell>,

    /// Output from view commands is styled by default, set this flag to disable styled views
    #[arg(short = 'd', long, global = true, default_value_t = false)]
    disable_styled_views: bool,
}

impl Cfg {
    /// Get a reference to the global config
    pub fn global() -> &'static Cfg {
        CONFIG.get().expect("Config is not initialized")
    }

    /// If a checks TOML file is specified, parse it and set the custom checks static variable.
    /// If the checks TOML file is not specified, but the `--gen-checks-toml` flag is set, generate a checks TOML file in the current directory.
    pub fn handle_custom_checks(&self) -> Result<(), String> {
        if let Some(checks_toml) = &self.checks_toml {
            let custom_checks = custom_checks::custom_checks_from_path(checks_toml)?;
            CUSTOM_CHECKS
                .set(custom_checks)
                .map_err(|_| "Custom checks already initialized".to_string())?;
        } else if self.generate_custom_checks_toml_enabled() {
            custom_checks::generate_custom_checks_toml(custom_checks::CUSTOM_CHECKS_FILE_NAME)
                .map_err(|e| format!("Failed writing custom checks TOML: {e}"))?;
        }
        Ok(())
    }

    /// Generate completion scripts for the specified shell.
    pub fn generate_completion_script(shell: Shell) {
        clap_complete::generate(
            shell,
            &mut <Cfg as clap::CommandFactory>::command(),
            "evcount",
            &mut io::stdout(),
        );
    }
}

/// Implementing the config super trait requires implementing all the sub traits
impl Config for Cfg {}

impl ViewOpt for Cfg {
    #[inline]
    fn view(&self) -> Option<ViewCommands> {
        match &self.cmd {
            Some(Command::View(view_sub_cmd)) => Some(view_sub_cmd.cmd),
            _ => None,
        }
    }
}

impl SelectionOpt for Cfg {
    #[inline]
    fn estimator(&self) -> &str {
        &self.estimator
    }
}

impl InputOutputOpt for Cfg {
    #[inline]
    fn input_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    fn merge_stats_files(&self) -> Option<&[PathBuf]> {
        match &self.cmd {
            Some(Command::Merge(merge_args)) => Some(&merge_args.files),
            _ => None,
        }
    }

    fn stats_output_mode(&self) -> DataOutputMode {
        self.stats_output.clone()
    }

    fn stats_output_format(&self) -> Option<DataOutputFormat> {
        self.stats_output_format
    }

    fn input_stats_file(&self) -> Option<&Path> {
        self.input_stats_file.as_deref()
    }
}

impl UtilOpt for Cfg {
    #[inline]
    fn verbosity(&self) -> u8 {
        self.verbosity
    }
    #[inline]
    fn max_tolerate_errors(&self) -> u32 {
        self.max_tolerate_errors
    }
    fn any_errors_exit_code(&self) -> Option<u8> {
        self.any_errors_exit_code
    }
    fn mute_errors(&self) -> bool {
        self.mute_errors
    }
    #[inline]
    fn disable_styled_views(&self) -> bool {
        self.disable_styled_views
    }
}

impl CustomChecksOpt for Cfg {
    fn custom_checks(&self) -> Option<&CustomChecks> {
        CUSTOM_CHECKS.get()
    }

    fn generate_custom_checks_toml_enabled(&self) -> bool {
        self.generate_checks_toml
    }
}

/// Holds the [ViewCommands] subcommands
#[derive(Debug, Args, Clone, Copy)]
#[command(args_conflicts_with_subcommands = true)]
#[command(arg_required_else_help = true)]
pub struct ViewArgs {
    #[command(subcommand)]
    cmd: ViewCommands,
}

/// Holds the stats files to merge
#[derive(Debug, Args, Clone)]
#[command(arg_required_else_help = true)]
pub struct MergeArgs {
    /// Stats files (JSON/TOML) written by previous runs with `--output-stats`
    #[arg(name = "STATS FILES", required = true, num_args = 1.., value_hint = clap::ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Subcommand, Clone)]
/// Subcommands that change what is done with the input
pub enum Command {
    /// Enable view mode, prints the classification of each event instead of a report. Requires a view type e.g. `events`
    #[command(arg_required_else_help = true)]
    View(ViewArgs),
    /// Merge counters from stats files of separate runs (e.g. run segments processed in parallel) into one report
    #[command(arg_required_else_help = true)]
    Merge(MergeArgs),
}

/// Get the [config][super::config::Cfg] from the command line arguments and set the static [CONFIG] variable.
pub fn init_config() -> Result<(), String> {
    let cfg = <super::config::Cfg as clap::Parser>::parse();
    cfg.validate_args()?;
    cfg.handle_custom_checks()?;
    crate::config::CONFIG
        .set(cfg)
        .map_err(|_| "Config already initialized".to_string())
}
