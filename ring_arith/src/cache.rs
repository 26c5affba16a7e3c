use crate::config::CacheConfig;
use crate::dft::ntt::TransformContext;
use crate::error::Result;
use fnv::FnvHashMap;
use once_cell::sync::{Lazy, OnceCell};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tracing::{debug, trace};

/// (n, q)
type Key = (usize, u64);

#[derive(Debug)]
struct Slot {
    cell: Arc<OnceCell<Arc<TransformContext>>>,
    last_used: AtomicU64,
}

impl Slot {
    fn new(tick: u64) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            last_used: AtomicU64::new(tick),
        }
    }

    fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Thread-safe memoized store of [`TransformContext`] keyed by (n, q).
///
/// Each key is built at most once. Concurrent first requests for the same
/// key block on a per-key cell and all receive the same `Arc`, while builds
/// for distinct keys run outside the map lock. A failed build leaves no
/// entry behind.
///
/// Unbounded by default. With [`CacheConfig::with_max_entries`] the least
/// recently used contexts are dropped from the cache; handles already given
/// out stay valid.
#[derive(Debug)]
pub struct TransformCache {
    config: CacheConfig,
    slots: RwLock<FnvHashMap<Key, Slot>>,
    clock: AtomicU64,
}

static GLOBAL: Lazy<TransformCache> = Lazy::new(TransformCache::default);

impl Default for TransformCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl TransformCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            slots: RwLock::new(FnvHashMap::default()),
            clock: AtomicU64::new(0),
        }
    }

    /// The process-wide cache, unbounded.
    pub fn global() -> &'static TransformCache {
        &GLOBAL
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the context for (n, q), building it on first request.
    pub fn get_or_create(&self, n: usize, q: u64) -> Result<Arc<TransformContext>> {
        let key: Key = (n, q);
        let tick: u64 = self.tick();

        let cell: Arc<OnceCell<Arc<TransformContext>>> = {
            let slots = self.read();
            match slots.get(&key) {
                Some(slot) => {
                    slot.last_used.store(tick, Ordering::Relaxed);
                    Some(slot.cell.clone())
                }
                None => None,
            }
        }
        .unwrap_or_else(|| {
            let mut slots = self.write();
            let slot: &mut Slot = slots.entry(key).or_insert_with(|| Slot::new(tick));
            slot.last_used.store(tick, Ordering::Relaxed);
            slot.cell.clone()
        });

        if let Some(ctx) = cell.get() {
            trace!(n, q, "transform context cache hit");
            return Ok(ctx.clone());
        }

        let built: Result<Arc<TransformContext>> = cell
            .get_or_try_init(|| {
                let start: Instant = Instant::now();
                let ctx: TransformContext = TransformContext::new(n, q)?;
                debug!(n, q, elapsed = ?start.elapsed(), "built transform context");
                Ok(Arc::new(ctx))
            })
            .cloned();

        match built {
            Ok(ctx) => {
                self.evict(key);
                Ok(ctx)
            }
            Err(err) => {
                self.discard(key, &cell);
                debug!(n, q, error = %err, "transform context build failed");
                Err(err)
            }
        }
    }

    /// Forward root powers of (n, q), building the context if needed.
    pub fn forward_roots(&self, n: usize, q: u64) -> Result<RootPowers> {
        Ok(RootPowers {
            context: self.get_or_create(n, q)?,
            direction: Direction::Forward,
        })
    }

    /// Inverse root powers of (n, q), building the context if needed.
    pub fn inverse_roots(&self, n: usize, q: u64) -> Result<RootPowers> {
        Ok(RootPowers {
            context: self.get_or_create(n, q)?,
            direction: Direction::Inverse,
        })
    }

    /// Whether a built context for (n, q) is held. Does not count as a use.
    pub fn contains(&self, n: usize, q: u64) -> bool {
        self.read().get(&(n, q)).is_some_and(Slot::is_ready)
    }

    /// Number of built contexts held.
    pub fn len(&self) -> usize {
        self.read().values().filter(|slot| slot.is_ready()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every held context.
    pub fn clear(&self) {
        self.write().retain(|_, slot| !slot.is_ready());
    }

    #[inline(always)]
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    // The map is only mutated by single insert/remove calls, a poisoned
    // guard still sees a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, FnvHashMap<Key, Slot>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FnvHashMap<Key, Slot>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn discard(&self, key: Key, cell: &Arc<OnceCell<Arc<TransformContext>>>) {
        let mut slots = self.write();
        if slots
            .get(&key)
            .is_some_and(|slot| Arc::ptr_eq(&slot.cell, cell) && !slot.is_ready())
        {
            slots.remove(&key);
        }
    }

    /// Drops least recently used contexts until the configured bound holds.
    /// Never drops `keep` nor slots still being built.
    fn evict(&self, keep: Key) {
        let Some(max_entries) = self.config.max_entries else {
            return;
        };
        let mut slots = self.write();
        while slots.len() > max_entries.get() {
            let oldest: Option<Key> = slots
                .iter()
                .filter(|(key, slot)| **key != keep && slot.is_ready())
                .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| *key);
            match oldest {
                Some(key) => {
                    slots.remove(&key);
                    debug!(n = key.0, q = key.1, "evicted transform context");
                }
                None => break,
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Read-only view of the forward or inverse root powers of a context,
/// psi^(+-i) at index bit_reverse(i). Keeps the context alive.
#[derive(Clone, Debug)]
pub struct RootPowers {
    context: Arc<TransformContext>,
    direction: Direction,
}

impl RootPowers {
    pub fn context(&self) -> &Arc<TransformContext> {
        &self.context
    }
}

impl Deref for RootPowers {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        match self.direction {
            Direction::Forward => self.context.forward_roots(),
            Direction::Inverse => self.context.inverse_roots(),
        }
    }
}

impl AsRef<[u64]> for RootPowers {
    fn as_ref(&self) -> &[u64] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::num::NonZeroUsize;

    #[test]
    fn same_context_on_repeat() {
        let cache: TransformCache = TransformCache::default();
        assert!(cache.is_empty());
        let a: Arc<TransformContext> = cache.get_or_create(4, 17).unwrap();
        let b: Arc<TransformContext> = cache.get_or_create(4, 17).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(4, 17));
        assert!(!cache.contains(8, 17));
    }

    #[test]
    fn failed_build_leaves_no_entry() {
        let cache: TransformCache = TransformCache::default();
        assert_eq!(
            cache.get_or_create(3, 17).err(),
            Some(Error::UnsupportedLength { n: 3 })
        );
        assert!(cache.get_or_create(4, 21).is_err());
        assert!(cache.get_or_create(64, 17).is_err());
        assert!(cache.is_empty());
        assert!(cache.read().is_empty());
    }

    #[test]
    fn root_powers() {
        let cache: TransformCache = TransformCache::default();
        let forward: RootPowers = cache.forward_roots(4, 17).unwrap();
        let inverse: RootPowers = cache.inverse_roots(4, 17).unwrap();
        assert_eq!(&*forward, &[1, 13, 9, 15]);
        assert_eq!(inverse.as_ref(), &[1, 4, 2, 8]);
        assert!(Arc::ptr_eq(forward.context(), inverse.context()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_used_eviction() {
        let cache: TransformCache =
            TransformCache::new(CacheConfig::default().with_max_entries(NonZeroUsize::new(2).unwrap()));
        let small: Arc<TransformContext> = cache.get_or_create(4, 17).unwrap();
        let evicted: Arc<TransformContext> = cache.get_or_create(8, 17).unwrap();
        cache.get_or_create(4, 17).unwrap();
        // contains() is not a use.
        assert!(cache.contains(8, 17));
        cache.get_or_create(16, 97).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(4, 17));
        assert!(cache.contains(16, 97));
        assert!(!cache.contains(8, 17));

        // Handles outlive eviction.
        assert_eq!(evicted.forward_roots().len(), 8);
        assert!(Arc::ptr_eq(&small, &cache.get_or_create(4, 17).unwrap()));

        let rebuilt: Arc<TransformContext> = cache.get_or_create(8, 17).unwrap();
        assert!(!Arc::ptr_eq(&evicted, &rebuilt));
        assert_eq!(evicted.forward_roots(), rebuilt.forward_roots());
    }

    #[test]
    fn clear() {
        let cache: TransformCache = TransformCache::default();
        cache.get_or_create(4, 17).unwrap();
        cache.get_or_create(8, 17).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
