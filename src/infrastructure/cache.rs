//! In-process query cache shared by all services.
//!
//! Reads go through [`QueryCache::fetch`] with a [`QueryKey`] (entity name,
//! parameters, scope). Writes invalidate key prefixes once they have
//! succeeded, so the next read reloads from the database. Concurrent reads of
//! the same key share one in-flight load. The number of stored results is
//! bounded; expired entries go first, then the oldest.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::domain::DomainError;

pub const DEFAULT_MAX_ENTRIES: usize = 4096;

type Erased = Arc<dyn Any + Send + Sync>;
type SharedLoad = Shared<BoxFuture<'static, Result<Erased, DomainError>>>;

/// Who a cached value belongs to. User-scoped entries are dropped on sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Public,
    User(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    entity: &'static str,
    params: Vec<String>,
    scope: Scope,
}

impl QueryKey {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            params: Vec::new(),
            scope: Scope::Public,
        }
    }

    pub fn param(mut self, value: impl ToString) -> Self {
        self.params.push(value.to_string());
        self
    }

    pub fn for_user(mut self, user_id: i32) -> Self {
        self.scope = Scope::User(user_id);
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// `prefix` matches keys of the same entity and scope whose params start with its params.
    fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.entity == prefix.entity
            && self.scope == prefix.scope
            && self.params.starts_with(&prefix.params)
    }
}

struct CacheEntry {
    value: Erased,
    fetched_at: Instant,
}

/// Invalidation counters a load was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    epoch: u64,
    entity: u64,
    user: u64,
}

#[derive(Clone)]
struct InFlight {
    id: u64,
    stamp: Stamp,
    load: SharedLoad,
}

pub struct QueryCache {
    ttl: Duration,
    max_entries: usize,
    entries: DashMap<QueryKey, CacheEntry>,
    inflight: DashMap<QueryKey, InFlight>,
    /// Bumped by `clear`
    epoch: AtomicU64,
    /// Bumped per entity by `invalidate` and `invalidate_entity`
    entity_generations: DashMap<&'static str, u64>,
    /// Bumped per user by `invalidate_user`
    user_generations: DashMap<i32, u64>,
    next_load_id: AtomicU64,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: DashMap::new(),
            inflight: DashMap::new(),
            epoch: AtomicU64::new(0),
            entity_generations: DashMap::new(),
            user_generations: DashMap::new(),
            next_load_id: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key`, or run `loader` and cache its result.
    ///
    /// Errors are returned to every waiter but never cached. A load that was
    /// started before an invalidation touching its entity or user is returned
    /// to its waiters but not stored.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> Result<T, DomainError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>> + Send + 'static,
    {
        if let Some(value) = self.lookup::<T>(&key) {
            tracing::debug!(entity = key.entity, params = ?key.params, "cache hit");
            return Ok(value);
        }

        let flight = match self.inflight.entry(key.clone()) {
            Entry::Occupied(existing) => {
                tracing::debug!(entity = key.entity, "joining in-flight load");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                tracing::debug!(entity = key.entity, params = ?key.params, "cache miss");
                let flight = InFlight {
                    id: self.next_load_id.fetch_add(1, Ordering::Relaxed),
                    stamp: self.stamp(&key),
                    load: loader()
                        .map(|result| result.map(|value| Arc::new(value) as Erased))
                        .boxed()
                        .shared(),
                };
                slot.insert(flight.clone());
                flight
            }
        };

        let result = flight.load.clone().await;
        self.inflight
            .remove_if(&key, |_, current| current.id == flight.id);

        let value = result?;
        if self.stamp(&key) == flight.stamp {
            self.store(key, value.clone());
        }

        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| DomainError::Internal("cached value has unexpected type".to_string()))
    }

    fn stamp(&self, key: &QueryKey) -> Stamp {
        let user = match key.scope {
            Scope::User(user_id) => self.user_generations.get(&user_id).map_or(0, |g| *g),
            Scope::Public => 0,
        };
        Stamp {
            epoch: self.epoch.load(Ordering::SeqCst),
            entity: self.entity_generations.get(key.entity).map_or(0, |g| *g),
            user,
        }
    }

    fn lookup<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        {
            let entry = self.entries.get(key)?;
            if entry.fetched_at.elapsed() < self.ttl {
                return entry.value.downcast_ref::<T>().cloned();
            }
        }
        self.entries
            .remove_if(key, |_, entry| entry.fetched_at.elapsed() >= self.ttl);
        None
    }

    fn store(&self, key: QueryKey, value: Erased) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict();
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Make room for one entry: drop expired entries, then the oldest ones.
    fn evict(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        while self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.fetched_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
        tracing::debug!(remaining = self.entries.len(), "evicted cache entries");
    }

    /// Drop every entry under `prefix` and detach matching in-flight loads.
    pub fn invalidate(&self, prefix: &QueryKey) {
        self.bump_entity(prefix.entity);
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        self.inflight.retain(|key, _| !key.starts_with(prefix));
        let dropped = before.saturating_sub(self.entries.len());
        tracing::debug!(entity = prefix.entity, params = ?prefix.params, dropped, "invalidated");
    }

    /// Drop every entry of `entity`, in all scopes.
    pub fn invalidate_entity(&self, entity: &'static str) {
        self.bump_entity(entity);
        self.entries.retain(|key, _| key.entity != entity);
        self.inflight.retain(|key, _| key.entity != entity);
    }

    /// Drop everything cached on behalf of `user_id`.
    pub fn invalidate_user(&self, user_id: i32) {
        *self.user_generations.entry(user_id).or_insert(0) += 1;
        let scope = Scope::User(user_id);
        self.entries.retain(|key, _| key.scope != scope);
        self.inflight.retain(|key, _| key.scope != scope);
        tracing::debug!(user_id, "cleared user-scoped cache entries");
    }

    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
        self.inflight.clear();
    }

    fn bump_entity(&self, entity: &'static str) {
        *self.entity_generations.entry(entity).or_insert(0) += 1;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_loader(
        calls: &Arc<AtomicUsize>,
        value: i32,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<i32, DomainError>> {
        let calls = calls.clone();
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("artists");

        assert_eq!(cache.fetch(key.clone(), counting_loader(&calls, 1)).await, Ok(1));
        assert_eq!(cache.fetch(key, counting_loader(&calls, 2)).await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_load() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("artworks").param("featured");

        let (a, b) = tokio::join!(
            cache.fetch(key.clone(), counting_loader(&calls, 10)),
            cache.fetch(key.clone(), counting_loader(&calls, 20)),
        );

        assert_eq!(a, Ok(10));
        assert_eq!(b, Ok(10));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_reload() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("artists").param(3);

        cache.fetch(key.clone(), counting_loader(&calls, 1)).await.unwrap();
        cache.invalidate(&QueryKey::new("artists"));
        let reloaded = cache.fetch(key, counting_loader(&calls, 2)).await;

        assert_eq!(reloaded, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_respects_param_prefix() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let one = QueryKey::new("artists").param(1);
        let two = QueryKey::new("artists").param(2);

        cache.fetch(one.clone(), counting_loader(&calls, 1)).await.unwrap();
        cache.fetch(two.clone(), counting_loader(&calls, 2)).await.unwrap();
        cache.invalidate(&QueryKey::new("artists").param(1));

        assert_eq!(cache.fetch(two, counting_loader(&calls, 99)).await, Ok(2));
        assert_eq!(cache.fetch(one, counting_loader(&calls, 11)).await, Ok(11));
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::new("collectors");

        let failed: Result<i32, _> = cache
            .fetch(key.clone(), || async { Err(DomainError::Database("down".into())) })
            .await;
        assert!(failed.is_err());

        let ok = cache.fetch(key, || async { Ok(5) }).await;
        assert_eq!(ok, Ok(5));
    }

    #[tokio::test]
    async fn user_scope_is_cleared_independently() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let mine = QueryKey::new("favorites").for_user(1);
        let theirs = QueryKey::new("favorites").for_user(2);

        cache.fetch(mine.clone(), counting_loader(&calls, 1)).await.unwrap();
        cache.fetch(theirs.clone(), counting_loader(&calls, 2)).await.unwrap();
        cache.invalidate_user(1);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fetch(theirs, counting_loader(&calls, 0)).await, Ok(2));
        assert_eq!(cache.fetch(mine, counting_loader(&calls, 3)).await, Ok(3));
    }

    #[tokio::test]
    async fn zero_ttl_always_reloads() {
        let cache = QueryCache::new(Duration::ZERO);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("journal");

        cache.fetch(key.clone(), counting_loader(&calls, 1)).await.unwrap();
        cache.fetch(key, counting_loader(&calls, 2)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_removes_entries() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch(QueryKey::new("artists").param(1), counting_loader(&calls, 1))
            .await
            .unwrap();
        cache
            .fetch(QueryKey::new("journal"), counting_loader(&calls, 2))
            .await
            .unwrap();
        cache.invalidate(&QueryKey::new("artists"));

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn entry_count_is_bounded() {
        let cache = QueryCache::with_capacity(Duration::from_secs(60), 3);
        for i in 0..10 {
            cache
                .fetch(QueryKey::new("journal").param(i), move || async move {
                    Ok::<_, DomainError>(i)
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(cache.len(), 3);

        // the newest result survives eviction
        let calls = Arc::new(AtomicUsize::new(0));
        let newest = cache
            .fetch(QueryKey::new("journal").param(9), counting_loader(&calls, 0))
            .await;
        assert_eq!(newest, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn load_started_before_invalidation_is_not_stored() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::new("artworks").param("featured");
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let (first, ()) = tokio::join!(
            cache.fetch(key.clone(), move || async move {
                let _ = gate.await;
                Ok::<_, DomainError>(1)
            }),
            async {
                tokio::task::yield_now().await;
                cache.invalidate(&QueryKey::new("artworks"));
                let _ = release.send(());
            },
        );

        assert_eq!(first, Ok(1));
        assert!(cache.is_empty());

        let calls = Arc::new(AtomicUsize::new(0));
        let reloaded = cache.fetch(key, counting_loader(&calls, 2)).await;
        assert_eq!(reloaded, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unrelated_invalidation_keeps_in_flight_result() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::new("artworks").param("featured");
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let (first, ()) = tokio::join!(
            cache.fetch(key.clone(), move || async move {
                let _ = gate.await;
                Ok::<_, DomainError>(1)
            }),
            async {
                tokio::task::yield_now().await;
                cache.invalidate(&QueryKey::new("collectors"));
                cache.invalidate_user(7);
                let _ = release.send(());
            },
        );
        assert_eq!(first, Ok(1));

        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(cache.fetch(key, counting_loader(&calls, 2)).await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
