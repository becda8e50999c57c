use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A one-dimensional histogram with uniform binning
///
/// Entries outside the axis range are tracked in separate underflow
/// and overflow counters.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Histogram {
    name: String,
    low: N64,
    high: N64,
    bins: Vec<u64>,
    underflow: u64,
    overflow: u64,
}

impl Histogram {
    /// Construct a named histogram with `nbins` equal bins over
    /// [`low`, `high`)
    pub fn new(
        name: &str,
        nbins: usize,
        low: f64,
        high: f64,
    ) -> Result<Self, HistogramDefError> {
        if nbins == 0 || !(high > low) {
            return Err(HistogramDefError {
                name: name.to_owned(),
                nbins,
                low,
                high,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            low: n64(low),
            high: n64(high),
            bins: vec![0; nbins],
            underflow: 0,
            overflow: 0,
        })
    }

    /// Record one entry
    pub fn fill(&mut self, value: f64) {
        if value < self.low.raw() {
            self.underflow += 1;
        } else if value >= self.high.raw() {
            self.overflow += 1;
        } else {
            let frac = (value - self.low.raw())
                / (self.high.raw() - self.low.raw());
            let bin = (frac * self.bins.len() as f64) as usize;
            // guard against the upper edge under rounding
            let bin = bin.min(self.bins.len() - 1);
            self.bins[bin] += 1;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-bin counts, excluding under- and overflow
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Total number of entries including under- and overflow
    pub fn entries(&self) -> u64 {
        self.bins.iter().sum::<u64>() + self.underflow + self.overflow
    }

    /// The lower edge of bin `i`
    pub fn bin_low_edge(&self, i: usize) -> f64 {
        let width =
            (self.high.raw() - self.low.raw()) / self.bins.len() as f64;
        self.low.raw() + width * i as f64
    }
}

/// Invalid histogram axis definition
#[derive(Debug, Clone, Error)]
#[error("Invalid definition for histogram {name}: {nbins} bins over [{low}, {high})")]
pub struct HistogramDefError {
    name: String,
    nbins: usize,
    low: f64,
    high: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_count() {
        let mut hist = Histogram::new("pt", 10, 0., 100.).unwrap();
        hist.fill(5.);
        hist.fill(5.);
        hist.fill(95.);
        assert_eq!(hist.bins()[0], 2);
        assert_eq!(hist.bins()[9], 1);
        assert_eq!(hist.entries(), 3);
    }

    #[test]
    fn out_of_range() {
        let mut hist = Histogram::new("eta", 80, -4., 4.).unwrap();
        hist.fill(-4.5);
        hist.fill(4.);
        hist.fill(0.);
        assert_eq!(hist.underflow(), 1);
        assert_eq!(hist.overflow(), 1);
        assert_eq!(hist.entries(), 3);
    }

    #[test]
    fn edges() {
        let hist = Histogram::new("m", 4, 0., 8.).unwrap();
        assert_eq!(hist.bin_low_edge(0), 0.);
        assert_eq!(hist.bin_low_edge(3), 6.);
    }

    #[test]
    fn bad_definition() {
        assert!(Histogram::new("empty", 0, 0., 1.).is_err());
        assert!(Histogram::new("inverted", 10, 1., 0.).is_err());
    }
}
