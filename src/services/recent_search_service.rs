use std::{env, time::Duration};

use moka::{future::Cache, ops::compute::Op};

use crate::models::search::{RecentSearchItem, MAX_RECENT_SEARCHES};

const DEFAULT_CAPACITY: u64 = 10_000;
const IDLE_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Per-user most-recent-first list of search result clicks.
///
/// Lives in process memory: entries are evicted after a week of inactivity or
/// when the cache is full, and are lost on restart.
#[derive(Clone)]
pub struct RecentSearchStore {
    lists: Cache<String, Vec<RecentSearchItem>>,
}

impl RecentSearchStore {
    pub fn new(capacity: u64) -> Self {
        Self {
            lists: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(IDLE_EXPIRY)
                .build(),
        }
    }

    pub fn from_env() -> Self {
        let capacity = env::var("RECENT_SEARCH_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CAPACITY);
        Self::new(capacity)
    }

    fn key(user_id: &str) -> String {
        format!("user:{user_id}:recentSearches")
    }

    /// Moves `item` to the front, dropping any older entry for the same
    /// target, then trims to [`MAX_RECENT_SEARCHES`].
    ///
    /// The update is computed atomically per key, so concurrent appends for
    /// one user never lose each other's writes.
    pub async fn append(&self, user_id: &str, item: RecentSearchItem) -> Vec<RecentSearchItem> {
        let result = self
            .lists
            .entry(Self::key(user_id))
            .and_compute_with(|existing| {
                let mut list = existing.map(|entry| entry.into_value()).unwrap_or_default();
                list.retain(|entry| !entry.same_target(&item));
                list.insert(0, item);
                list.truncate(MAX_RECENT_SEARCHES);
                std::future::ready(Op::Put(list))
            })
            .await;

        result
            .into_entry()
            .map(|entry| entry.into_value())
            .unwrap_or_default()
    }

    pub async fn list(&self, user_id: &str) -> Vec<RecentSearchItem> {
        let mut list = self.lists.get(&Self::key(user_id)).await.unwrap_or_default();
        list.truncate(MAX_RECENT_SEARCHES);
        list
    }

    pub async fn clear(&self, user_id: &str) {
        self.lists.invalidate(&Self::key(user_id)).await;
    }
}
