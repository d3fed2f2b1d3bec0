// Default values shared across the frontend - these are the single source of
// truth for block geometry and timing.

// Block visual defaults
pub const BLOCK_WIDTH: f64 = 250.0;
pub const BLOCK_HEADER_HEIGHT: f64 = 32.0;
pub const DEFAULT_BLOCK_X: f64 = 40.0;
pub const DEFAULT_BLOCK_Y: f64 = 40.0;
/// Horizontal gap between blocks placed as a run by the pattern import.
pub const BLOCK_GAP_X: f64 = 40.0;
/// Cascade offset applied per existing block when placing from the palette,
/// so freshly added blocks do not stack exactly on top of each other.
pub const PLACE_CASCADE_STEP: f64 = 28.0;

// Connection curve shape
pub const CURVE_REACH_RATIO: f64 = 0.6;
pub const MIN_CURVE_REACH: f64 = 80.0;
pub const CONNECTION_LINE_COLOR: &str = "#95a5a6";
pub const CONNECTION_LINE_WIDTH: f64 = 2.0;

// Drag behaviour
/// Minimum interval between throttled connection redraws (~60 Hz).
pub const DRAG_REDRAW_INTERVAL_MS: u64 = 16;
/// Z-index applied to the actively dragged block.
pub const DRAG_Z_INDEX: &str = "1000";
pub const BLOCK_Z_INDEX: &str = "1";

/// Delay before the automatic re-chain pass that follows a block removal,
/// so dependent DOM state can settle first.
pub const RECHAIN_SETTLE_MS: u32 = 120;

// localStorage keys written by the login page and read on every load
pub const STORAGE_KEY_USERNAME: &str = "username";
pub const STORAGE_KEY_LEVEL: &str = "level";
pub const STORAGE_KEY_PERMISSIONS: &str = "permissions";

pub const LOGIN_PAGE_URL: &str = "login.html";
