// Single source of truth for all default values.

// --- Store ---
pub const DEFAULT_MAX_ENTRIES: usize = 20;
pub const DEFAULT_MEMORY_CEILING_MB: u64 = 15;
pub const DEFAULT_MEMORY_SLACK: f64 = 1.1;
pub const DEFAULT_IDLE_TTL_SECS: u64 = 600; // 10 minutes

// --- Pool ---
pub const DEFAULT_POOL_PER_TYPE_CAP: usize = 8;
pub const DEFAULT_POOL_GLOBAL_CAP: usize = 30;
pub const DEFAULT_POOL_IDLE_TTL_SECS: u64 = 600;

// --- Prediction ---
pub const DEFAULT_PREDICTION_TOP_N: usize = 3;
pub const DEFAULT_PREFETCH_MIN_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_DIAGNOSTIC_MIN_CONFIDENCE: f64 = 0.2;
pub const DEFAULT_PREDICTION_WINDOW: usize = 200;
pub const DEFAULT_RECORDER_CAPACITY: usize = 1_000;
pub const DEFAULT_RECORDER_RETAIN: usize = 800;

// --- Pressure ---
pub const DEFAULT_WARNING_CACHE_FRACTION: f64 = 0.25;
pub const DEFAULT_WARNING_POOL_FRACTION: f64 = 0.30;
pub const DEFAULT_CRITICAL_CACHE_FRACTION: f64 = 0.50;
pub const DEFAULT_CRITICAL_POOL_FRACTION: f64 = 0.60;

// --- Scheduler ---
pub const DEFAULT_WORKER_THREADS: usize = 2;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 240; // 4 minutes

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
