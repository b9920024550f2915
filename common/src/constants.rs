use std::time::Duration;

/// Zoom (latitude span, degrees) below which every restaurant is drawn as its own pin.
pub const INDIVIDUAL_PIN_THRESHOLD: f64 = 0.008;
/// Maximum number of singleton pins drawn in individual-pin mode.
pub const MAX_INDIVIDUAL_PINS: usize = 50;
/// Grid cell size as a fraction of the visible latitude span.
pub const CLUSTERING_FACTOR: f64 = 0.015;
/// Lower bound for the grid cell size, in degrees.
pub const MIN_GRID_SIZE: f64 = 0.01;
/// Zoom above which single-member grid cells are hidden.
pub const SINGLETON_FILTER_THRESHOLD: f64 = 0.05;

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(150);
pub const SIMILARITY_TOLERANCE: f64 = 0.0005;
pub const CACHE_TTL: Duration = Duration::from_secs(300);
pub const MAX_CACHE_SIZE: usize = 20;
pub const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);
pub const TRANSITION_SETTLE: Duration = Duration::from_millis(250);

/// Cache keys keep four decimal places (about 11 meters of latitude).
pub const CACHE_KEY_SCALE: f64 = 10_000.0;
