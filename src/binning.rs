//! Histograms over fixed bins on `[0, 1]`
//!
//! Bins are left-closed and right-open, except the last one which is closed,
//! so that every value in `[0, 1]` belongs to exactly one bin.
//!
use crate::SetupError;
use is_sorted::IsSorted;

///
/// Ascending boundaries of `n` bins
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Build from explicit boundaries
    ///
    /// At least two edges are needed to form a bin, and they must be
    /// strictly increasing.
    ///
    pub fn new(edges: Vec<f64>) -> Result<Self, SetupError> {
        if edges.len() < 2 {
            return Err(SetupError::NoBins);
        } else if !IsSorted::is_sorted(&mut edges.iter())
            || edges.iter().any(|e| e.is_nan())
            || edges.windows(2).any(|w| w[0] == w[1])
        {
            return Err(SetupError::UnsortedGrid);
        }
        Ok(Self { edges })
    }

    /// `n_bins` bins of equal width covering `[0, 1]`
    pub fn unit_interval(n_bins: usize) -> Result<Self, SetupError> {
        if n_bins == 0 {
            return Err(SetupError::NoBins);
        }
        let edges = (0..=n_bins)
            .map(|i| i as f64 / n_bins as f64)
            .collect();
        Self::new(edges)
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.edges
    }

    /// Lower edge and width of each bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.edges.windows(2).map(|w| (w[0], w[1] - w[0]))
    }

    /// Index of the bin containing `val`
    ///
    /// Values below the first edge fall into the first bin and values at or
    /// above the last edge into the last bin.
    ///
    pub fn locate(&self, val: f64) -> usize {
        let last_bin = self.n_bins() - 1;
        search_sorted(&self.edges, val).unwrap_or(if val < self.edges[0] { 0 } else { last_bin })
    }
}

///
/// Search sorted grid of values and find the lower bound
///
/// Returns `i` such that `grid[i] <= val < grid[i + 1]`
///
fn search_sorted<T>(grid: &[T], val: T) -> Option<usize>
where
    T: PartialOrd,
{
    let first = grid.first()?;
    let last = grid.last()?;

    if !(first..last).contains(&&val) {
        return None;
    }

    // Grid is sorted and `val` is inside it, so all comparisons are defined
    match grid.binary_search_by(|k| k.partial_cmp(&val).unwrap_or(std::cmp::Ordering::Less)) {
        Ok(j) => Some(j),
        Err(j) => Some(j - 1),
    }
}

///
/// Counts of values per bin
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    pub fn zeros(n_bins: usize) -> Self {
        Self {
            counts: vec![0; n_bins],
        }
    }

    pub fn get(&self, idx: usize) -> u64 {
        self.counts[idx]
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Largest count over all bins
    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Number of values counted so far
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn increment(&mut self, idx: usize) -> u64 {
        self.counts[idx] += 1;
        self.counts[idx]
    }
}

///
/// Bin edges together with the frequencies accumulated over them
///
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: BinEdges,
    freqs: FrequencyTable,
}

impl Histogram {
    pub fn new(edges: BinEdges) -> Self {
        let freqs = FrequencyTable::zeros(edges.n_bins());
        Self { edges, freqs }
    }

    /// Count `val` in its bin
    ///
    /// Returns the index of the bin and its new frequency.
    ///
    pub fn bin(&mut self, val: f64) -> (usize, u64) {
        let idx = self.edges.locate(val);
        (idx, self.freqs.increment(idx))
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    pub fn freqs(&self) -> &FrequencyTable {
        &self.freqs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_of_sorted_grid() {
        let grid = [-0.5, 1.0, 2.0, 6.0];

        // Out of range
        assert_eq!(None, search_sorted(&grid, -0.6));
        assert_eq!(None, search_sorted(&grid, 6.0));
        assert_eq!(None, search_sorted(&grid, 9.0));

        // In range
        assert_eq!(Some(0), search_sorted(&grid, -0.5));
        assert_eq!(Some(0), search_sorted(&grid, 0.0));

        assert_eq!(Some(1), search_sorted(&grid, 1.0));
        assert_eq!(Some(1), search_sorted(&grid, 1.5));

        assert_eq!(Some(2), search_sorted(&grid, 5.0));
    }

    #[test]
    fn test_unit_interval_edges() {
        let edges = BinEdges::unit_interval(4).unwrap();
        assert_eq!(&[0.0, 0.25, 0.5, 0.75, 1.0], edges.as_slice());
        assert_eq!(4, edges.n_bins());

        let bins: Vec<_> = edges.bins().collect();
        assert_eq!((0.5, 0.25), bins[2]);
    }

    #[test]
    fn test_invalid_edges() {
        assert_eq!(Err(SetupError::NoBins), BinEdges::unit_interval(0));
        assert_eq!(Err(SetupError::NoBins), BinEdges::new(vec![0.0]));
        assert_eq!(
            Err(SetupError::UnsortedGrid),
            BinEdges::new(vec![0.0, 0.7, 0.5, 1.0])
        );
        assert_eq!(
            Err(SetupError::UnsortedGrid),
            BinEdges::new(vec![0.0, f64::NAN, 1.0])
        );
        // Empty bin in the middle
        assert_eq!(
            Err(SetupError::UnsortedGrid),
            BinEdges::new(vec![0.0, 0.5, 0.5, 1.0])
        );
        assert_eq!(
            Err(SetupError::UnsortedGrid),
            BinEdges::new(vec![1.0, 1.0])
        );
    }

    #[test]
    fn test_bin_boundaries() {
        let edges = BinEdges::unit_interval(48).unwrap();

        assert_eq!(0, edges.locate(0.0));
        assert_eq!(47, edges.locate(1.0));
        assert_eq!(47, edges.locate(1.0 - f64::EPSILON));

        // Left-closed, right-open
        assert_eq!(1, edges.locate(edges.as_slice()[1]));
        assert_eq!(24, edges.locate(0.5));
    }

    #[test]
    fn test_out_of_range_clamped() {
        let edges = BinEdges::unit_interval(10).unwrap();

        assert_eq!(0, edges.locate(-0.2));
        assert_eq!(0, edges.locate(f64::NEG_INFINITY));
        assert_eq!(9, edges.locate(1.3));
        assert_eq!(9, edges.locate(f64::INFINITY));
    }

    #[test]
    fn test_index_always_valid() {
        let edges = BinEdges::unit_interval(48).unwrap();

        for i in 0..=10_000 {
            let val = i as f64 / 10_000.0;
            let idx = edges.locate(val);
            assert!(idx < 48, "{val} mapped to {idx}");
            let lo = edges.as_slice()[idx];
            let hi = edges.as_slice()[idx + 1];
            assert!(lo <= val && (val < hi || (idx == 47 && val == hi)));
        }
    }

    #[test]
    fn test_histogram_conservation() {
        let mut hist = Histogram::new(BinEdges::unit_interval(8).unwrap());
        assert_eq!(0, hist.freqs().total());

        let values = [0.0, 0.1, 0.1, 0.99, 1.0, 0.5, 0.125];
        for (k, v) in values.iter().enumerate() {
            hist.bin(*v);
            assert_eq!(k as u64 + 1, hist.freqs().total());
        }

        assert_eq!(&[3, 1, 0, 0, 1, 0, 0, 2], hist.freqs().as_slice());
        assert_eq!(3, hist.freqs().max());
    }

    #[test]
    fn test_bin_returns_new_frequency() {
        let mut hist = Histogram::new(BinEdges::unit_interval(2).unwrap());
        assert_eq!((1, 1), hist.bin(0.7));
        assert_eq!((1, 2), hist.bin(1.0));
        assert_eq!((0, 1), hist.bin(0.2));
    }
}
