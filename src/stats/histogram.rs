//! Fixed-binning counting histograms, [Hist1D] and [Hist2D].
//!
//! Bin numbering follows the usual convention of bin `0` being the underflow bin, bins `1..=nbins` covering the axis range,
//! and bin `nbins + 1` being the overflow bin. A value equal to the upper edge of the axis lands in the overflow bin.
use crate::util::*;

/// A fixed-width binned axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    nbins: usize,
    min: f64,
    max: f64,
}

impl Axis {
    /// Create an axis with `nbins` equal-width bins covering `[min, max)`.
    pub fn new(nbins: usize, min: f64, max: f64) -> Self {
        debug_assert!(nbins > 0 && min < max, "Invalid axis: {nbins} [{min}, {max})");
        Self { nbins, min, max }
    }

    /// Number of bins in the axis range.
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Lower edge of the axis.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper edge of the axis.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns the bin that `x` falls in, including the underflow (`0`) and overflow (`nbins + 1`) bins.
    pub fn find_bin(&self, x: f64) -> usize {
        if x < self.min {
            0
        } else if x >= self.max || x.is_nan() {
            self.nbins + 1
        } else {
            let bin = 1 + ((x - self.min) / (self.max - self.min) * self.nbins as f64) as usize;
            bin.min(self.nbins)
        }
    }

    /// Lower edge of an in-range bin.
    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        self.min + (bin as f64 - 1.0) * self.bin_width()
    }

    /// Width of each bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.nbins as f64
    }

    /// Number of bins including underflow and overflow.
    fn total_bins(&self) -> usize {
        self.nbins + 2
    }
}

/// A one-dimensional counting histogram with optional bin labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    name: String,
    title: String,
    axis: Axis,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    contents: Vec<u64>,
}

impl Hist1D {
    /// Create an empty histogram.
    pub fn new(name: impl Into<String>, title: impl Into<String>, axis: Axis) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            axis,
            labels: Vec::new(),
            contents: vec![0; axis.total_bins()],
        }
    }

    /// Set the labels of the in-range bins, in bin order.
    pub fn with_labels<S: ToString>(mut self, labels: &[S]) -> Self {
        debug_assert_eq!(labels.len(), self.axis.nbins());
        self.labels = labels.iter().map(ToString::to_string).collect();
        self
    }

    /// Name of the histogram.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Title of the histogram.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The binning.
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Label of an in-range bin, if labels are set.
    pub fn label(&self, bin: usize) -> Option<&str> {
        bin.checked_sub(1)
            .and_then(|idx| self.labels.get(idx))
            .map(String::as_str)
    }

    /// Count a value.
    pub fn fill(&mut self, x: f64) {
        let bin = self.axis.find_bin(x);
        self.contents[bin] += 1;
    }

    /// Content of a bin, `0` and `nbins + 1` are the underflow and overflow bins.
    pub fn bin_content(&self, bin: usize) -> u64 {
        self.contents.get(bin).copied().unwrap_or(0)
    }

    /// Count in the underflow bin.
    pub fn underflow(&self) -> u64 {
        self.contents[0]
    }

    /// Count in the overflow bin.
    pub fn overflow(&self) -> u64 {
        self.contents[self.axis.nbins() + 1]
    }

    /// Sum of the in-range bins.
    pub fn integral(&self) -> u64 {
        self.contents[1..=self.axis.nbins()].iter().sum()
    }

    /// Number of fills, including underflow and overflow.
    pub fn entries(&self) -> u64 {
        self.contents.iter().sum()
    }

    /// Add the counts of another histogram with the same binning.
    pub fn merge(&mut self, other: &Self) -> Result<(), String> {
        if self.axis != other.axis || self.contents.len() != other.contents.len() {
            return Err(format!(
                "Cannot merge histogram {} with {}: binning differs ({:?} vs. {:?})",
                self.name, other.name, self.axis, other.axis
            ));
        }
        self.contents
            .iter_mut()
            .zip(&other.contents)
            .for_each(|(count, other_count)| *count += other_count);
        Ok(())
    }
}

/// A two-dimensional counting histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist2D {
    name: String,
    title: String,
    x_axis: Axis,
    y_axis: Axis,
    contents: Vec<u64>,
}

impl Hist2D {
    /// Create an empty histogram.
    pub fn new(name: impl Into<String>, title: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            x_axis,
            y_axis,
            contents: vec![0; x_axis.total_bins() * y_axis.total_bins()],
        }
    }

    /// Name of the histogram.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Title of the histogram.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The x binning.
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// The y binning.
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    #[inline]
    fn index(&self, x_bin: usize, y_bin: usize) -> usize {
        x_bin + self.x_axis.total_bins() * y_bin
    }

    /// Count a value pair.
    pub fn fill(&mut self, x: f64, y: f64) {
        let idx = self.index(self.x_axis.find_bin(x), self.y_axis.find_bin(y));
        self.contents[idx] += 1;
    }

    /// Content of a bin, including the underflow and overflow bins of both axes.
    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> u64 {
        if x_bin >= self.x_axis.total_bins() || y_bin >= self.y_axis.total_bins() {
            return 0;
        }
        self.contents[self.index(x_bin, y_bin)]
    }

    /// Counts per x bin, summed over all y bins including y underflow and overflow.
    pub fn x_projection(&self) -> Vec<u64> {
        (0..self.x_axis.total_bins())
            .map(|x_bin| {
                (0..self.y_axis.total_bins())
                    .map(|y_bin| self.bin_content(x_bin, y_bin))
                    .sum()
            })
            .collect()
    }

    /// Sum of the bins that are in range on both axes.
    pub fn integral(&self) -> u64 {
        (1..=self.y_axis.nbins())
            .flat_map(|y_bin| (1..=self.x_axis.nbins()).map(move |x_bin| (x_bin, y_bin)))
            .map(|(x_bin, y_bin)| self.bin_content(x_bin, y_bin))
            .sum()
    }

    /// Number of fills, including underflow and overflow.
    pub fn entries(&self) -> u64 {
        self.contents.iter().sum()
    }

    /// Add the counts of another histogram with the same binning.
    pub fn merge(&mut self, other: &Self) -> Result<(), String> {
        if self.x_axis != other.x_axis
            || self.y_axis != other.y_axis
            || self.contents.len() != other.contents.len()
        {
            return Err(format!(
                "Cannot merge histogram {} with {}: binning differs",
                self.name, other.name
            ));
        }
        self.contents
            .iter_mut()
            .zip(&other.contents)
            .for_each(|(count, other_count)| *count += other_count);
        Ok(())
    }
}
