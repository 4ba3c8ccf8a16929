/// Upstream NEO API defaults and response contract constants

pub const DEFAULT_NEO_API_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_PORT: u16 = 8000;

pub const FEED_PATH: &str = "feed";
pub const LOOKUP_PATH: &str = "neo";

/// Upstream rejects feed windows longer than this
pub const MAX_FEED_WINDOW_DAYS: i64 = 7;
pub const FEED_DATE_FORMAT: &str = "%Y-%m-%d";

// Decimal places kept for each normalized field
pub const DIAMETER_PLACES: i32 = 3;
pub const DISTANCE_PLACES: i32 = 5;
pub const VELOCITY_PLACES: i32 = 2;

// Error bodies returned by the lookup endpoint
pub const MSG_ID_REQUIRED: &str = "Asteroid ID required";
pub const MSG_LOOKUP_FAILED: &str = "Failed to fetch asteroid data";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";

pub const SKIPPED_RECORDS_HEADER: &str = "x-skipped-records";
