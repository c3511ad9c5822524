/// Which extremum a swing marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwingKind {
    /// Local maximum of the bar highs over the comparison window.
    High,
    /// Local minimum of the bar lows over the comparison window.
    Low,
}

/// A local price extremum attached to one bar of a timeseries.
///
/// A bar may carry at most one High and one Low marker. Because the detector
/// compares with >= / <=, flat runs of equal extremes mark every bar in the
/// run, so adjacent swings with identical prices are expected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    /// Index of the bar this marker is attached to.
    pub index: usize,
    /// The bar's high (for High swings) or low (for Low swings).
    pub price: f64,
    pub kind: SwingKind,
}

impl SwingPoint {
    pub fn new(index: usize, price: f64, kind: SwingKind) -> Self {
        Self { index, price, kind }
    }
}
