//! Re-exports

pub use super::custom_checks::CustomChecksOpt;
pub use super::inputoutput::DataOutputMode;
pub use super::inputoutput::InputOutputOpt;
pub use super::lib::Config;
pub use super::selection::SelectionOpt;
pub use super::test_util::MockConfig;
pub use super::util::UtilOpt;
pub use super::view::ViewCommands;
pub use super::view::ViewOpt;
