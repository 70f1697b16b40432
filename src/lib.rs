pub mod cache;
pub mod constants;
pub mod context;
pub mod contextual;
pub mod error;
pub mod grid;
pub mod kde;
pub mod location;
pub mod scoring;
pub mod source;
pub mod weights;
pub mod window;

pub use contextual::{Breakdown, ContextualScorer, ContextualScorerBuilder, SignalScore};
pub use context::{Category, CategoryShape, ContextStore, RawContextStore, WindowedPoints};
pub use error::{ContextError, Result};
pub use location::GeoPoint;
pub use source::{ContextSource, InMemorySource, JsonDirectorySource};
pub use weights::WeightConfig;
pub use window::{select_window, WindowBoundary};
