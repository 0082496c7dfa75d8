use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A one-dimensional histogram with uniform binning
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Histo1D {
    name: String,
    min: f64,
    max: f64,
    /// Sum of weights per bin
    bins: Vec<f64>,
    /// Sum of squared weights per bin
    bins_sq: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
}

impl Histo1D {
    /// A histogram with `nbins` bins between `min` and `max`
    pub fn new(
        name: &str,
        nbins: usize,
        min: f64,
        max: f64,
    ) -> Result<Self, BinningError> {
        if nbins == 0 {
            return Err(BinningError::NoBins(name.to_owned()));
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(BinningError::Range(name.to_owned(), min, max));
        }
        Ok(Self {
            name: name.to_owned(),
            min,
            max,
            bins: vec![0.; nbins],
            bins_sq: vec![0.; nbins],
            underflow: 0.,
            overflow: 0.,
            entries: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nbins(&self) -> usize {
        self.bins.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.nbins() as f64
    }

    /// The bin containing `x`, or `None` if `x` is out of range
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        if x < self.min || x >= self.max {
            return None;
        }
        let idx = ((x - self.min) / self.bin_width()).floor() as usize;
        Some(std::cmp::min(idx, self.nbins() - 1))
    }

    /// Add `weight` to the bin containing `x`
    pub fn fill(&mut self, x: f64, weight: f64) {
        self.entries += 1;
        match self.bin_index(x) {
            Some(idx) => {
                self.bins[idx] += weight;
                self.bins_sq[idx] += weight * weight;
            }
            None if x < self.min => self.underflow += weight,
            None => self.overflow += weight,
        }
    }

    /// The sum of weights in the bin with index `idx`
    pub fn bin(&self, idx: usize) -> f64 {
        self.bins[idx]
    }

    /// The sum of weights in the bin containing `x`
    pub fn bin_at(&self, x: f64) -> f64 {
        self.bin_index(x).map(|idx| self.bins[idx]).unwrap_or_default()
    }

    /// The statistical uncertainty of the bin with index `idx`
    pub fn bin_err(&self, idx: usize) -> f64 {
        self.bins_sq[idx].sqrt()
    }

    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Number of fills
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of all weights in range
    pub fn integral(&self) -> f64 {
        self.bins.iter().sum()
    }

    fn clear(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0.);
        self.bins_sq.iter_mut().for_each(|b| *b = 0.);
        self.underflow = 0.;
        self.overflow = 0.;
        self.entries = 0;
    }

    fn has_same_binning(&self, other: &Self) -> bool {
        self.name == other.name
            && self.min == other.min
            && self.max == other.max
            && self.nbins() == other.nbins()
    }

    fn add(&mut self, other: &Self) {
        debug_assert!(self.has_same_binning(other));
        for (b, o) in self.bins.iter_mut().zip(&other.bins) {
            *b += o;
        }
        for (b, o) in self.bins_sq.iter_mut().zip(&other.bins_sq) {
            *b += o;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
    }
}

/// Handle to a histogram booked in [Histograms]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HistoId(usize);

/// Collection of booked histograms
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Histograms {
    histos: Vec<Histo1D>,
}

/// Invalid histogram binning
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BinningError {
    #[error("Histogram {0} needs at least one bin")]
    NoBins(String),
    #[error("Histogram {0} has invalid range [{1}, {2})")]
    Range(String, f64, f64),
}

/// Error merging histogram collections
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("Cannot merge {0} histograms into {1}")]
    Size(usize, usize),
    #[error("Histogram {0} has different binning than {1}")]
    Binning(String, String),
}

impl Histograms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book a new histogram
    pub fn book(
        &mut self,
        name: &str,
        nbins: usize,
        min: f64,
        max: f64,
    ) -> Result<HistoId, BinningError> {
        self.histos.push(Histo1D::new(name, nbins, min, max)?);
        Ok(HistoId(self.histos.len() - 1))
    }

    /// Fill the histogram with handle `id`
    ///
    /// Handles from a different collection that don't exist here are
    /// ignored with a warning.
    pub fn fill(&mut self, id: HistoId, x: f64, weight: f64) {
        match self.histos.get_mut(id.0) {
            Some(h) => h.fill(x, weight),
            None => warn!("No histogram booked for {id:?}"),
        }
    }

    pub fn get(&self, id: HistoId) -> Option<&Histo1D> {
        self.histos.get(id.0)
    }

    /// Look up a histogram by name
    pub fn by_name(&self, name: &str) -> Option<&Histo1D> {
        self.histos.iter().find(|h| h.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Histo1D> {
        self.histos.iter()
    }

    pub fn len(&self) -> usize {
        self.histos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histos.is_empty()
    }

    /// Add the contents of `other` to this collection
    ///
    /// Both collections must have been booked in the same way.
    pub fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        if self.len() != other.len() {
            return Err(MergeError::Size(other.len(), self.len()));
        }
        for (h, o) in self.histos.iter().zip(&other.histos) {
            if !h.has_same_binning(o) {
                return Err(MergeError::Binning(
                    o.name.clone(),
                    h.name.clone(),
                ));
            }
        }
        for (h, o) in self.histos.iter_mut().zip(&other.histos) {
            h.add(o)
        }
        Ok(())
    }

    /// Empty copy with the same booking
    pub fn cleared(&self) -> Self {
        let mut res = self.clone();
        res.histos.iter_mut().for_each(Histo1D::clear);
        res
    }
}

impl<'a> IntoIterator for &'a Histograms {
    type Item = &'a Histo1D;
    type IntoIter = std::slice::Iter<'a, Histo1D>;

    fn into_iter(self) -> Self::IntoIter {
        self.histos.iter()
    }
}
