use std::fmt;

/// The position side whose liquidation a zone estimates.
/// Long liquidations sit below swing lows, short liquidations above swing highs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter,
)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Long => write!(f, "Long Liquidations"),
            Side::Short => write!(f, "Short Liquidations"),
        }
    }
}

/// One projected liquidation estimate, produced from exactly one
/// (swing point, leverage tier) pair. Immutable once created; the whole
/// collection is regenerated on every analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidationZone {
    /// Estimated liquidation price, strictly positive.
    pub price: f64,
    pub side: Side,
    /// The leverage multiple this estimate assumes (e.g. 25 for 25x).
    pub leverage: u32,
}
