//! Contains the [Config] super trait, and all the sub traits required by it
//!
//! Implementing the [Config] super trait is required by configs passed to structs in other modules as part of instantiation.

use super::{
    custom_checks::CustomChecksOpt,
    prelude::{InputOutputOpt, SelectionOpt, ViewOpt},
    util::UtilOpt,
};
use crate::util::*;

/// Super trait for all the traits that needed to be implemented by the config struct
// Generic traits that are required by the config struct
pub trait Config: Send + Sync + std::marker::Sized
where
    // Subtraits that group together related configuration options
    Self: UtilOpt + InputOutputOpt + SelectionOpt + ViewOpt + CustomChecksOpt,
{
    /// Validate the arguments of the config
    fn validate_args(&self) -> Result<(), String> {
        if self.any_errors_exit_code().is_some_and(|val| val == 0) {
            return Err("Invalid config: Exit code for any errors cannot be 0".to_string());
        }
        if self.estimator().trim().is_empty() {
            return Err("Invalid config: Centrality estimator cannot be empty".to_string());
        }
        if let Some(merge_files) = self.merge_stats_files() {
            if self.input_file().is_some() {
                return Err(
                    "Invalid config: Cannot read events and merge stats files in the same run"
                        .to_string(),
                );
            }
            if let Some(missing) = merge_files.iter().find(|f| !f.is_file()) {
                return Err(format!(
                    "Invalid config: Stats file to merge does not exist (got: {})",
                    missing.display()
                ));
            }
            merge_files
                .iter()
                .try_for_each(|f| validate_stats_file_extension(f))?;
        }
        // Validate input stats file
        if let Some(path) = self.input_stats_file() {
            if !path.is_file() {
                return Err(format!(
                    "Invalid config: Input stats file does not exist (got: {})",
                    path.to_string_lossy()
                ));
            }
            validate_stats_file_extension(path)?;
        }
        Ok(())
    }
}

fn validate_stats_file_extension(path: &Path) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        None => Err(format!(
            "Invalid config: Stats file has no extension (got: {})",
            path.to_string_lossy()
        )),
        Some("json" | "toml") => Ok(()),
        Some(_) => Err(format!(
            "Invalid config: Stats file has invalid extension, should be JSON or TOML (got: {})",
            path.to_string_lossy()
        )),
    }
}

impl<T> Config for &T
where
    T: Config,
{
    fn validate_args(&self) -> Result<(), String> {
        (*self).validate_args()
    }
}

impl<T> Config for Box<T>
where
    T: Config,
{
    fn validate_args(&self) -> Result<(), String> {
        (**self).validate_args()
    }
}

impl<T> Config for Arc<T>
where
    T: Config,
{
    fn validate_args(&self) -> Result<(), String> {
        (**self).validate_args()
    }
}

/// Styling of the help text
pub fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn test_validate_default_mock() {
        assert!(MockConfig::new().validate_args().is_ok());
    }

    #[test]
    fn test_empty_estimator_invalid() {
        let mut cfg = MockConfig::new();
        cfg.estimator = "  ".to_string();
        assert!(cfg.validate_args().is_err());
    }

    #[test]
    fn test_missing_input_stats_file_invalid() {
        let mut cfg = MockConfig::new();
        cfg.stats_input_file = Some(PathBuf::from("does/not/exist.json"));
        let err = cfg.validate_args().unwrap_err();
        assert!(err.contains("does not exist"), "{err}");
    }

    #[test]
    fn test_stats_file_extension() {
        let tmp_dir = TempDir::new().unwrap();
        let txt = tmp_dir.child("stats.txt");
        let json = tmp_dir.child("stats.json");
        fs::write(&txt, "").unwrap();
        fs::write(&json, "").unwrap();

        let mut cfg = MockConfig::new();
        cfg.stats_input_file = Some(txt);
        assert!(cfg.validate_args().is_err());
        cfg.stats_input_file = Some(json);
        assert!(cfg.validate_args().is_ok());
    }

    #[test]
    fn test_merge_with_events_input_invalid() {
        let tmp_dir = TempDir::new().unwrap();
        let json = tmp_dir.child("stats.json");
        fs::write(&json, "").unwrap();

        let mut cfg = MockConfig::new();
        cfg.merge_stats_files = Some(vec![json]);
        assert!(cfg.validate_args().is_ok());
        cfg.input_file = Some(PathBuf::from("events.jsonl"));
        assert!(cfg.validate_args().is_err());
    }
}
