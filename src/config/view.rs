//! Contains the [ViewOpt] trait for the view subcommand, and the [ViewCommands] it can take.
use crate::util::*;

/// Possible views of the input events
#[derive(Subcommand, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewCommands {
    /// Print the classification of each event: triggers, vertex class, centrality and the counters it fills
    Events,
}

/// Trait for all view options set by a user
pub trait ViewOpt {
    /// Type of view to generate.
    fn view(&self) -> Option<ViewCommands>;
}

impl<T> ViewOpt for &T
where
    T: ViewOpt,
{
    fn view(&self) -> Option<ViewCommands> {
        (*self).view()
    }
}

impl<T> ViewOpt for Box<T>
where
    T: ViewOpt,
{
    fn view(&self) -> Option<ViewCommands> {
        (**self).view()
    }
}

impl<T> ViewOpt for Arc<T>
where
    T: ViewOpt,
{
    fn view(&self) -> Option<ViewCommands> {
        (**self).view()
    }
}
