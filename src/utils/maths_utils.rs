use argminmax::ArgMinMax;
use std::cmp::{max, min};

/// A fixed `[start_range, end_range]` price axis split into `n_chunks` equal
/// buckets. This is the binning backbone of the liquidation heatmap.
#[derive(serde::Deserialize, serde::Serialize, Default, Debug, Clone)]
pub struct RangeF64 {
    pub start_range: f64,
    pub end_range: f64,
    pub n_chunks: usize,
}

impl RangeF64 {
    pub fn new(start_range: f64, end_range: f64, n_chunks: usize) -> Self {
        debug_assert!(end_range > start_range, "range must have positive extent");
        debug_assert!(n_chunks > 0, "need at least one chunk");
        Self {
            start_range,
            end_range,
            n_chunks,
        }
    }

    #[inline]
    pub fn n_chunks(&self) -> usize {
        self.n_chunks
    }

    pub fn min_max(&self) -> (f64, f64) {
        (self.start_range, self.end_range)
    }

    pub fn range_length(&self) -> f64 {
        self.end_range - self.start_range
    }

    pub fn chunk_size(&self) -> f64 {
        self.range_length() / (self.n_chunks as f64)
    }

    /// How many chunks does the closed band `[x_low, x_high]` touch?
    /// The band is clipped to the range first; a band entirely outside
    /// the range touches zero chunks.
    pub fn count_intersecting_chunks(&self, mut x_low: f64, mut x_high: f64) -> usize {
        // Swap the values over if necessary
        if x_high < x_low {
            (x_low, x_high) = (x_high, x_low);
        }
        if x_high < self.start_range || x_low > self.end_range {
            return 0;
        }
        let first_chunk_index = max(
            0,
            ((x_low - self.start_range) / self.chunk_size()).floor() as isize,
        );
        let last_chunk_index = min(
            (self.n_chunks - 1) as isize,
            ((x_high - self.start_range) / self.chunk_size()).floor() as isize,
        );
        if last_chunk_index < first_chunk_index {
            return 0;
        }
        // Inclusive of both ends
        (last_chunk_index - first_chunk_index + 1) as usize
    }

    pub fn chunk_index(&self, value: f64) -> usize {
        let index = (value - self.start_range) / self.chunk_size();
        let chunk_index = if index < 0.0 { 0 } else { index as usize };

        // Clamping handles floating-point inaccuracies at the boundary.
        chunk_index.min(self.n_chunks - 1)
    }

    pub fn chunk_bounds(&self, chunk_index: usize) -> (f64, f64) {
        debug_assert!(chunk_index < self.n_chunks);
        let lower_bound = self.start_range + chunk_index as f64 * self.chunk_size();
        let upper_bound = self.start_range + (chunk_index + 1) as f64 * self.chunk_size();
        (lower_bound, upper_bound)
    }
}

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

// Normalizes a vector of (positive) f64 to 0.0 to 1.0. Guarantees largest value is 1.0
// Smallest output value will be 0.0 iff smallest input value = 0.0
pub fn normalize_max(vec: &[f64]) -> Vec<f64> {
    if vec.is_empty() {
        return Vec::new();
    }
    let max_value = get_max(vec);
    match max_value {
        val if val <= 0.0 => vec.to_vec(),
        val => vec.iter().map(|&x| x / val).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_index_clamps_at_boundaries() {
        let range = RangeF64::new(100.0, 200.0, 10);
        assert_eq!(range.chunk_index(100.0), 0);
        assert_eq!(range.chunk_index(105.0), 0);
        assert_eq!(range.chunk_index(199.9), 9);
        // Exactly at the top edge still maps to the last chunk
        assert_eq!(range.chunk_index(200.0), 9);
    }

    #[test]
    fn test_count_intersecting_chunks() {
        let range = RangeF64::new(0.0, 100.0, 10);
        assert_eq!(range.count_intersecting_chunks(5.0, 5.0), 1);
        assert_eq!(range.count_intersecting_chunks(5.0, 25.0), 3);
        // Swapped arguments behave the same
        assert_eq!(range.count_intersecting_chunks(25.0, 5.0), 3);
        // Entirely outside the range
        assert_eq!(range.count_intersecting_chunks(150.0, 160.0), 0);
        assert_eq!(range.count_intersecting_chunks(-20.0, -10.0), 0);
        // Straddling an edge gets clipped
        assert_eq!(range.count_intersecting_chunks(-10.0, 15.0), 2);
    }

    #[test]
    fn test_normalize_max() {
        let normalized = normalize_max(&[1.0, 2.0, 4.0]);
        assert_eq!(normalized, vec![0.25, 0.5, 1.0]);
        assert!(normalize_max(&[]).is_empty());
    }
}
