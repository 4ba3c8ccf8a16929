pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod observability;
pub mod server;
pub mod types;

// Application use cases and the ports they depend on
pub mod app;
// Adapters implementing those ports
pub mod infra;

pub use app::neo_use_case::NeoClient;
pub use error::{NeoError, Result};
pub use normalize::{normalize, normalize_with, NormalizeOutcome};
pub use types::{NormalizeStrategy, NormalizedAsteroid, RawFeedResponse, RecordRef};
