//! Contains the [CustomChecks] struct that maps to the checks TOML file, and the [CustomChecksOpt] trait to access it.
use crate::util::*;
use descriptive_toml_derive::TomlConfig;
use serde_derive::{Deserialize, Serialize};

/// Default name of the generated checks TOML template.
pub const CUSTOM_CHECKS_FILE_NAME: &str = "custom_checks.toml";

/// Expected counts that the collected counters are checked against at the end of a run.
#[derive(TomlConfig, Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomChecks {
    #[description = "Number of events expected to be read"]
    #[example = "0, 5000"]
    events: Option<u64>,

    #[description = "Number of events expected in the kAny bin after physics selection"]
    #[example = "0, 5000"]
    phys_sel_any: Option<u64>,

    #[description = "Number of events expected in the kAny bin with an SPD vertex"]
    #[example = "0, 4800"]
    spd_vert_any: Option<u64>,

    #[description = "Number of events expected in the kAny bin with a track vertex"]
    #[example = "0, 4500"]
    track_vert_any: Option<u64>,
}

impl CustomChecks {
    /// Expected number of events read, if it is set.
    pub fn events(&self) -> Option<u64> {
        self.events
    }

    /// Expected kAny count after physics selection, if it is set.
    pub fn phys_sel_any(&self) -> Option<u64> {
        self.phys_sel_any
    }

    /// Expected kAny count with an SPD vertex, if it is set.
    pub fn spd_vert_any(&self) -> Option<u64> {
        self.spd_vert_any
    }

    /// Expected kAny count with a track vertex, if it is set.
    pub fn track_vert_any(&self) -> Option<u64> {
        self.track_vert_any
    }
}

/// Parse a checks TOML file into [CustomChecks]
pub fn custom_checks_from_path(path: &Path) -> Result<CustomChecks, String> {
    let toml = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read checks TOML {}: {e}", path.display()))?;
    toml::from_str(&toml).map_err(|e| format!("Failed to parse checks TOML: {e}"))
}

/// Write the default [CustomChecks] template to a file
pub fn generate_custom_checks_toml(file_name: &str) -> io::Result<()> {
    let toml = CustomChecks::default().to_string_pretty_toml();
    fs::write(file_name, toml)?;
    log::info!("Generated checks TOML template: {file_name}");
    Ok(())
}

/// Trait for accessing the custom checks
pub trait CustomChecksOpt {
    /// The parsed checks TOML, if any.
    fn custom_checks(&self) -> Option<&CustomChecks>;

    /// Returns true if any expected count is set.
    fn custom_checks_enabled(&self) -> bool {
        self.custom_checks()
            .is_some_and(|c| *c != CustomChecks::default())
    }

    /// If set, a checks TOML template is generated in the current directory.
    fn generate_custom_checks_toml_enabled(&self) -> bool;

    /// Expected number of events read.
    fn events(&self) -> Option<u64> {
        self.custom_checks().and_then(CustomChecks::events)
    }

    /// Expected kAny count after physics selection.
    fn phys_sel_any(&self) -> Option<u64> {
        self.custom_checks().and_then(CustomChecks::phys_sel_any)
    }

    /// Expected kAny count with an SPD vertex.
    fn spd_vert_any(&self) -> Option<u64> {
        self.custom_checks().and_then(CustomChecks::spd_vert_any)
    }

    /// Expected kAny count with a track vertex.
    fn track_vert_any(&self) -> Option<u64> {
        self.custom_checks().and_then(CustomChecks::track_vert_any)
    }
}

impl<T> CustomChecksOpt for &T
where
    T: CustomChecksOpt,
{
    fn custom_checks(&self) -> Option<&CustomChecks> {
        (*self).custom_checks()
    }
    fn generate_custom_checks_toml_enabled(&self) -> bool {
        (*self).generate_custom_checks_toml_enabled()
    }
}

impl<T> CustomChecksOpt for Box<T>
where
    T: CustomChecksOpt,
{
    fn custom_checks(&self) -> Option<&CustomChecks> {
        (**self).custom_checks()
    }
    fn generate_custom_checks_toml_enabled(&self) -> bool {
        (**self).generate_custom_checks_toml_enabled()
    }
}

impl<T> CustomChecksOpt for Arc<T>
where
    T: CustomChecksOpt,
{
    fn custom_checks(&self) -> Option<&CustomChecks> {
        (**self).custom_checks()
    }
    fn generate_custom_checks_toml_enabled(&self) -> bool {
        (**self).generate_custom_checks_toml_enabled()
    }
}
