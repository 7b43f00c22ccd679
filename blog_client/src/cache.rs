//! Client-side query cache.
//!
//! Each read is stored under a [`QueryKey`]; mutations drop the keys whose
//! contents they may have changed so the next read refetches.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    PostList,
    Post(i64),
    Comments(i64),
    BlogInfo,
    CurrentUser,
}

#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.lock().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(?key, error = %err, "dropping unreadable cache entry");
                self.invalidate(key);
                None
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.lock().insert(key, value);
            }
            Err(err) => tracing::warn!(?key, error = %err, "value not cacheable"),
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn invalidate(&self, key: &QueryKey) {
        if self.lock().remove(key).is_some() {
            tracing::debug!(?key, "cache entry invalidated");
        }
    }

    pub fn invalidate_all(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(key);
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Value>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_and_invalidate() {
        let cache = QueryCache::new();
        cache.put(QueryKey::Post(1), &vec![1, 2, 3]);
        assert_eq!(cache.get::<Vec<i32>>(&QueryKey::Post(1)), Some(vec![1, 2, 3]));
        assert!(cache.get::<Vec<i32>>(&QueryKey::Post(2)).is_none());

        cache.invalidate(&QueryKey::Post(1));
        assert!(!cache.contains(&QueryKey::Post(1)));
    }

    #[test]
    fn keys_are_scoped_by_id() {
        let cache = QueryCache::new();
        cache.put(QueryKey::Comments(1), &"one");
        cache.put(QueryKey::Comments(2), &"two");
        cache.invalidate_all(&[QueryKey::Comments(1), QueryKey::PostList]);
        assert!(!cache.contains(&QueryKey::Comments(1)));
        assert!(cache.contains(&QueryKey::Comments(2)));
    }

    #[test]
    fn mistyped_entries_are_dropped() {
        let cache = QueryCache::new();
        cache.put(QueryKey::BlogInfo, &"not an object");
        assert!(cache.get::<Vec<String>>(&QueryKey::BlogInfo).is_none());
        assert!(!cache.contains(&QueryKey::BlogInfo));
    }

    #[test]
    fn clones_share_entries() {
        let cache = QueryCache::new();
        let other = cache.clone();
        other.put(QueryKey::CurrentUser, &"me");
        assert!(cache.contains(&QueryKey::CurrentUser));
        cache.clear();
        assert!(!other.contains(&QueryKey::CurrentUser));
    }
}
