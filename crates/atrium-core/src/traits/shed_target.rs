/// A component that can give memory back under pressure.
///
/// Implemented by the cache store and the object pool; the pressure
/// controller only sees this trait.
pub trait IShedTarget: Send + Sync {
    /// Component name for logs and reports.
    fn name(&self) -> &str;

    /// Evict `max(1, floor(len * fraction))` entries, least valuable first.
    /// Returns the number evicted (0 when empty).
    fn shed_fraction(&self, fraction: f64) -> usize;

    /// Evict everything that can be evicted. Returns the number evicted.
    fn shed_all(&self) -> usize;
}

/// Number of entries a fractional shed removes from `len` entries.
///
/// Rounds down with a minimum of one, and never more than `len`.
pub fn shed_count(len: usize, fraction: f64) -> usize {
    if len == 0 || fraction <= 0.0 {
        return 0;
    }
    let count = (len as f64 * fraction.min(1.0)).floor() as usize;
    count.clamp(1, len)
}
