//! Contains the [ErrorStats] struct which stores error messages observed in the input events and related data
use crate::util::*;

/// Stores error messages observed during analysis
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    fatal_error: Option<Box<str>>,
    reported_errors: Vec<Box<str>>,
    custom_checks_stats_errors: Vec<Box<str>>,
    total_errors: u64,
    total_warnings: u64,
    unique_error_codes: Option<Vec<String>>,
    unique_warning_codes: Vec<String>,
}

impl ErrorStats {
    /// If processing is done, sort error messages, extract unique error codes etc.
    pub(super) fn finalize_stats(&mut self, mute_errors: bool) {
        if !mute_errors {
            self.sort_error_msgs_by_line();
        }
        self.process_unique_error_codes();
    }

    /// Sort the reported errors by the input line they were found at. Messages without a line go last.
    pub(super) fn sort_error_msgs_by_line(&mut self) {
        let re = Regex::new(r"^line (?<line>[0-9]+):").unwrap();
        self.reported_errors.sort_by_key(|e| {
            re.captures(e)
                .and_then(|caps| caps["line"].parse::<u64>().ok())
                .unwrap_or(u64::MAX)
        });
    }

    pub(super) fn process_unique_error_codes(&mut self) {
        if !self.reported_errors.is_empty() {
            self.unique_error_codes = Some(extract_unique_codes(&self.reported_errors));
        }

        // If there's any errors from the custom checks on stats, find the error codes and add them.
        if !self.custom_checks_stats_errors.is_empty() {
            let unique_custom_error_codes = extract_unique_codes(&self.custom_checks_stats_errors);
            let codes = self.unique_error_codes.get_or_insert_with(Vec::new);
            for code in unique_custom_error_codes {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
    }

    pub(super) fn err_count(&self) -> u64 {
        self.total_errors
    }

    pub(super) fn warn_count(&self) -> u64 {
        self.total_warnings
    }

    pub(super) fn add_err(&mut self, error_msg: Box<str>) {
        self.total_errors += 1;
        self.reported_errors.push(error_msg);
    }

    pub(super) fn add_warning(&mut self, warning_msg: &str) {
        self.total_warnings += 1;
        for code in extract_unique_codes(&[warning_msg.into()]) {
            if !self.unique_warning_codes.contains(&code) {
                self.unique_warning_codes.push(code);
            }
        }
    }

    pub(super) fn add_custom_check_error(&mut self, error_msg: Box<str>) {
        self.total_errors += 1;
        self.custom_checks_stats_errors.push(error_msg);
    }

    pub(super) fn add_fatal_err(&mut self, error_msg: Box<str>) {
        self.fatal_error = Some(error_msg);
    }

    pub(super) fn any_fatal_err(&self) -> bool {
        self.fatal_error.is_some()
    }

    pub(super) fn take_fatal_err(&mut self) -> Option<Box<str>> {
        self.fatal_error.take()
    }

    /// Unique error codes of the reported errors, empty if there are no errors or the stats are not finalized.
    pub(super) fn unique_error_codes_as_slice(&self) -> &[String] {
        self.unique_error_codes.as_deref().unwrap_or_default()
    }

    pub(super) fn unique_warning_codes_as_slice(&self) -> &[String] {
        &self.unique_warning_codes
    }

    /// Return an iterator over all error messages
    pub fn errors_as_slice_iter(&self) -> impl Iterator<Item = &Box<str>> {
        self.reported_errors
            .iter()
            .chain(self.fatal_error.iter())
            .chain(self.custom_checks_stats_errors.iter())
    }

    /// Add the errors of stats collected in another run
    pub(super) fn merge(&mut self, other: &Self) {
        if self.fatal_error.is_none() {
            self.fatal_error = other.fatal_error.clone();
        }
        self.reported_errors
            .extend(other.reported_errors.iter().cloned());
        self.custom_checks_stats_errors
            .extend(other.custom_checks_stats_errors.iter().cloned());
        self.total_errors += other.total_errors;
        self.total_warnings += other.total_warnings;
        for code in &other.unique_warning_codes {
            if !self.unique_warning_codes.contains(code) {
                self.unique_warning_codes.push(code.clone());
            }
        }
        self.unique_error_codes = None;
    }

    pub(super) fn validate_other(&self, other: &Self) -> Result<(), Vec<String>> {
        // This syntax is used to ensure that a compile error is raised if a new field is added to the struct but not added to the validation here
        // Also add it to the `validate_fields` macro!
        let other = Self {
            fatal_error: other.fatal_error.clone(),
            reported_errors: other.reported_errors.clone(),
            custom_checks_stats_errors: other.custom_checks_stats_errors.clone(),
            total_errors: other.total_errors,
            total_warnings: other.total_warnings,
            unique_error_codes: other.unique_error_codes.clone(),
            unique_warning_codes: other.unique_warning_codes.clone(),
        };

        self.validate_fields(&other)
    }

    crate::validate_fields!(
        ErrorStats,
        fatal_error,
        reported_errors,
        custom_checks_stats_errors,
        total_errors,
        total_warnings,
        unique_error_codes,
        unique_warning_codes
    );
}

/// Extract the unique codes like `E10` or `W20` from messages on the form `[E10] ...`
fn extract_unique_codes(messages: &[Box<str>]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    let re = Regex::new(r"\[(?P<code>[EW][0-9]{2,4})\]").unwrap();
    messages.iter().for_each(|msg| {
        re.captures_iter(msg)
            .filter_map(|caps| caps.name("code"))
            .for_each(|code| {
                if !codes.iter().any(|c| c == code.as_str()) {
                    codes.push(code.as_str().to_string());
                }
            });
    });
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unique_codes() {
        let mut error_stats = ErrorStats::default();
        error_stats.add_err("line 8: [E10] Malformed event record".into());
        error_stats.add_err("line 7: [E11] Missing event, skipped".into());
        error_stats.add_err("line 9: [E10] Malformed event record".into());
        error_stats.add_custom_check_error("[E9001] Expected 3 events, but found 2".into());
        error_stats.add_warning("line 5: [W20] No V0M multiplicity");
        error_stats.add_warning("line 6: [W20] No V0M multiplicity");

        error_stats.finalize_stats(false);

        assert_eq!(error_stats.err_count(), 4);
        assert_eq!(error_stats.warn_count(), 2);
        assert_eq!(
            error_stats.unique_error_codes_as_slice(),
            &["E10".to_string(), "E11".to_string(), "E9001".to_string()]
        );
        assert_eq!(error_stats.unique_warning_codes_as_slice(), &["W20".to_string()]);
    }

    #[test]
    fn test_sorted_by_line() {
        let mut error_stats = ErrorStats::default();
        error_stats.add_err("line 12: [E10] b".into());
        error_stats.add_err("[E11] no line".into());
        error_stats.add_err("line 3: [E10] a".into());

        error_stats.finalize_stats(false);

        let msgs: Vec<&str> = error_stats
            .errors_as_slice_iter()
            .map(|e| e.as_ref())
            .collect();
        assert_eq!(msgs, vec!["line 3: [E10] a", "line 12: [E10] b", "[E11] no line"]);
    }

    #[test]
    fn test_no_errors_no_codes() {
        let mut error_stats = ErrorStats::default();
        error_stats.finalize_stats(false);
        assert!(error_stats.unique_error_codes_as_slice().is_empty());
    }

    #[test]
    fn test_fatal() {
        let mut error_stats = ErrorStats::default();
        assert!(!error_stats.any_fatal_err());
        error_stats.add_fatal_err("No such file".into());
        assert!(error_stats.any_fatal_err());
        assert_eq!(error_stats.errors_as_slice_iter().count(), 1);
        assert_eq!(error_stats.take_fatal_err().as_deref(), Some("No such file"));
    }

    #[test]
    fn test_validate_other() {
        let mut a = ErrorStats::default();
        a.add_err("line 1: [E10] x".into());
        a.finalize_stats(false);
        let b = a.clone();
        assert!(a.validate_other(&b).is_ok());

        let errs = a.validate_other(&ErrorStats::default()).unwrap_err();
        assert!(errs.iter().any(|e| e.contains("total_errors")), "{errs:?}");
    }

    #[test]
    fn test_serde_consistency() {
        let mut error_stats = ErrorStats::default();

        error_stats.add_err("line 2: [E11] Error message".into());
        error_stats.add_warning("line 1: [W20] Warning");
        error_stats.finalize_stats(false);

        let error_stats_ser_json = serde_json::to_string(&error_stats).unwrap();
        let error_stats_de_json: ErrorStats = serde_json::from_str(&error_stats_ser_json).unwrap();
        assert_eq!(error_stats, error_stats_de_json);

        let error_stats_ser_toml = toml::to_string(&error_stats).unwrap();
        let error_stats_de_toml: ErrorStats = toml::from_str(&error_stats_ser_toml).unwrap();
        assert_eq!(error_stats, error_stats_de_toml);
    }
}
