// Time-boxed cache for slow-changing reference data (hero catalog, rosters).

use std::cell::Cell;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Source of "now" for the cache, swappable in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock { now: Cell::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        let next = chrono::Duration::from_std(by)
            .ok()
            .and_then(|step| self.now.get().checked_add_signed(step));
        if let Some(next) = next {
            self.now.set(next);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Holds one loaded value and reloads it once it is older than `ttl`.
pub struct TimedCache<T, C: Clock = SystemClock> {
    ttl: Duration,
    clock: C,
    entry: Option<(T, DateTime<Utc>)>,
}

impl<T> TimedCache<T, SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        TimedCache::with_clock(ttl, SystemClock)
    }
}

impl<T, C: Clock> TimedCache<T, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        TimedCache {
            ttl,
            clock,
            entry: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether a value is held and still within its TTL.
    pub fn is_fresh(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(_, loaded_at)| !self.expired(*loaded_at))
    }

    /// The cached value, reloading through `load` when empty or stale. A
    /// failed load leaves any previous value in place.
    pub fn get_or_load<E>(&mut self, load: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        let entry = match self.entry.take() {
            Some(entry) if !self.expired(entry.1) => entry,
            stale => {
                debug!("cache miss, reloading");
                match load() {
                    Ok(value) => (value, self.clock.now()),
                    Err(e) => {
                        self.entry = stale;
                        return Err(e);
                    }
                }
            }
        };
        Ok(&self.entry.insert(entry).0)
    }

    /// Drop the held value so the next `get_or_load` reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    fn expired(&self, loaded_at: DateTime<Utc>) -> bool {
        let age = self.clock.now().signed_duration_since(loaded_at);
        age.to_std().map_or(false, |age| age >= self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-09T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn cache(ttl_secs: u64) -> TimedCache<u32, ManualClock> {
        TimedCache::with_clock(Duration::from_secs(ttl_secs), ManualClock::new(start()))
    }

    #[test]
    fn loads_once_within_ttl() {
        let mut c = cache(60);
        let mut loads = 0;
        for _ in 0..3 {
            let v = *c
                .get_or_load(|| {
                    loads += 1;
                    Ok::<_, ()>(7)
                })
                .unwrap();
            assert_eq!(v, 7);
            c.clock().advance(Duration::from_secs(10));
        }
        assert_eq!(loads, 1);
    }

    #[test]
    fn reloads_after_ttl() {
        let mut c = cache(60);
        c.get_or_load(|| Ok::<_, ()>(1)).unwrap();
        c.clock().advance(Duration::from_secs(60));
        assert!(!c.is_fresh());
        assert_eq!(*c.get_or_load(|| Ok::<_, ()>(2)).unwrap(), 2);
        assert!(c.is_fresh());
    }

    #[test]
    fn invalidate_forces_reload() {
        let mut c = cache(3600);
        c.get_or_load(|| Ok::<_, ()>(1)).unwrap();
        c.invalidate();
        assert!(!c.is_fresh());
        assert_eq!(*c.get_or_load(|| Ok::<_, ()>(2)).unwrap(), 2);
    }

    #[test]
    fn failed_reload_propagates_error() {
        let mut c = cache(1);
        c.get_or_load(|| Ok::<_, &str>(1)).unwrap();
        c.clock().advance(Duration::from_secs(5));
        assert_eq!(c.get_or_load(|| Err("disk gone")), Err("disk gone"));
    }

    #[test]
    fn system_clock_cache_starts_empty() {
        let c: TimedCache<String> = TimedCache::new(Duration::from_secs(1));
        assert!(!c.is_fresh());
    }
}
