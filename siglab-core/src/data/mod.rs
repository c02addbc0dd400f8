//! Data layer: the feature frame, derived features, schema validation,
//! timeframe handling, and synthetic sample series.

pub mod features;
pub mod frame;
pub mod sample;
pub mod schema;
pub mod timeframe;

pub use features::{add_basic_features, FeatureParams};
pub use frame::{FeatureFrame, FrameError};
pub use sample::synthetic_candles;
pub use schema::{validate_features, SchemaError};
pub use timeframe::{find_gaps, parse_label, periods_per_year, Gap, TimeframeError};
