/// Atrium version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum length of a cache key in bytes.
pub const MAX_KEY_LEN: usize = 256;

/// Bytes per megabyte, used when converting the configured memory ceiling.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Eviction sweeps remove at least `len / EVICTION_BATCH_DIVISOR` entries.
pub const EVICTION_BATCH_DIVISOR: usize = 4;

/// Upper bound on background worker threads.
pub const MAX_WORKER_THREADS: usize = 4;

/// Type tag used when a caller does not supply one.
pub const DEFAULT_TYPE_TAG: &str = "panel";

/// Memory estimate for panels navigated to without a registered estimate.
pub const DEFAULT_ESTIMATED_BYTES: u64 = 256 * 1024;

/// Upper bound on configured TTLs and intervals (one year, in seconds).
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;
