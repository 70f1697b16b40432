/// Samples per axis of the density evaluation grid.
pub const GRID_RESOLUTION: usize = 100;

/// Smallest overall score handed back to callers. Routing cost functions
/// downstream must never see a non-positive weight.
pub const SCORE_FLOOR: f64 = 0.0001;

/// Sub-type name used by categories that carry no sub-type partition.
pub const UNKNOWN_SUBTYPE: &str = "unknown";

/// Signal name of the raw traffic measurement.
pub const TRAFFIC_SIGNAL: &str = "traffic";

pub const DEFAULT_PLACE: &str = "chicago";
pub const DEFAULT_PERIOD: &str = "sunday";

/// Weight applied to any signal that has no explicit entry.
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// Signals weighted by the default configuration.
pub const DEFAULT_WEIGHTED_SIGNALS: [&str; 3] = [TRAFFIC_SIGNAL, "crimes", "crashes"];
