//! Time-window selection.
//!
//! Events are bucketed by the boundary at which their window starts. A
//! query resolves to the greatest boundary not exceeding the query time,
//! or to the smallest boundary when the query precedes all of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Start boundary of a time window (seconds of day, or whatever unit the
/// context store was bucketed in). Ordered numerically.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowBoundary(i64);

impl WindowBoundary {
    pub fn new(value: i64) -> Self {
        WindowBoundary(value)
    }

    #[inline]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WindowBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WindowBoundary {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(WindowBoundary)
    }
}

impl From<i64> for WindowBoundary {
    fn from(value: i64) -> Self {
        WindowBoundary(value)
    }
}

/// Select the window containing `query_time`.
///
/// Windows include their start boundary: a query exactly on a boundary
/// selects that boundary. Returns `None` only for an empty boundary set.
pub fn select_window<I>(boundaries: I, query_time: f64) -> Option<WindowBoundary>
where
    I: IntoIterator<Item = WindowBoundary>,
{
    let mut sorted: Vec<WindowBoundary> = boundaries.into_iter().collect();
    sorted.sort_unstable();

    let first = *sorted.first()?;
    let mut last = first;

    for boundary in sorted {
        if boundary.value() as f64 > query_time {
            return Some(last);
        }

        last = boundary;
    }

    Some(last)
}
