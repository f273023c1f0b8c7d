#![allow(missing_docs)]

use crate::util::*;

#[derive(Debug, Clone)]
/// Complete configurable Mock config for testing
pub struct MockConfig {
    pub view: Option<ViewCommands>,
    pub verbosity: u8,
    pub max_tolerate_errors: u32,
    pub input_file: Option<PathBuf>,
    pub merge_stats_files: Option<Vec<PathBuf>>,
    pub exit_code_any_errors: Option<u8>,
    pub mute_errors: bool,
    pub estimator: String,
    pub generate_checks_toml: bool,
    pub custom_checks: Option<CustomChecks>,
    pub stats_output_mode: DataOutputMode,
    pub stats_output_format: Option<DataOutputFormat>,
    pub stats_input_file: Option<PathBuf>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            view: None,
            verbosity: 0,
            max_tolerate_errors: 0,
            input_file: None,
            merge_stats_files: None,
            exit_code_any_errors: None,
            mute_errors: false,
            estimator: crate::classify::DEFAULT_ESTIMATOR.to_string(),
            generate_checks_toml: false,
            custom_checks: None,
            stats_output_mode: DataOutputMode::None,
            stats_output_format: None,
            stats_input_file: None,
        }
    }
}

impl Config for MockConfig {}

impl ViewOpt for MockConfig {
    fn view(&self) -> Option<ViewCommands> {
        self.view
    }
}

impl SelectionOpt for MockConfig {
    fn estimator(&self) -> &str {
        &self.estimator
    }
}

impl UtilOpt for MockConfig {
    fn verbosity(&self) -> u8 {
        self.verbosity
    }

    fn max_tolerate_errors(&self) -> u32 {
        self.max_tolerate_errors
    }

    fn any_errors_exit_code(&self) -> Option<u8> {
        self.exit_code_any_errors
    }

    fn mute_errors(&self) -> bool {
        self.mute_errors
    }

    fn disable_styled_views(&self) -> bool {
        true
    }
}

impl InputOutputOpt for MockConfig {
    fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }

    fn merge_stats_files(&self) -> Option<&[PathBuf]> {
        self.merge_stats_files.as_deref()
    }

    fn stats_output_mode(&self) -> DataOutputMode {
        self.stats_output_mode.clone()
    }

    fn stats_output_format(&self) -> Option<DataOutputFormat> {
        self.stats_output_format
    }

    fn input_stats_file(&self) -> Option<&Path> {
        self.stats_input_file.as_deref()
    }
}

impl CustomChecksOpt for MockConfig {
    fn custom_checks(&self) -> Option<&CustomChecks> {
        self.custom_checks.as_ref()
    }

    fn generate_custom_checks_toml_enabled(&self) -> bool {
        self.generate_checks_toml
    }
}
