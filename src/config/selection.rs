//! Contains the [SelectionOpt] trait for options that change how events are classified.

/// Options for the event classification
pub trait SelectionOpt {
    /// Name of the multiplicity estimator the centrality percentile is read from.
    fn estimator(&self) -> &str;
}

impl<T> SelectionOpt for &T
where
    T: SelectionOpt,
{
    fn estimator(&self) -> &str {
        (*self).estimator()
    }
}

impl<T> SelectionOpt for Box<T>
where
    T: SelectionOpt,
{
    fn estimator(&self) -> &str {
        (**self).estimator()
    }
}

impl<T> SelectionOpt for std::sync::Arc<T>
where
    T: SelectionOpt,
{
    fn estimator(&self) -> &str {
        (**self).estimator()
    }
}
