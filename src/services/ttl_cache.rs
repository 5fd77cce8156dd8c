// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local keyed cache with per-entry expiry.
//!
//! Expired entries are invisible to readers immediately and are physically
//! removed by `purge_expired`, which the server calls periodically.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Cache shared between clones.
#[derive(Clone)]
pub struct TtlCache<V> {
    entries: Arc<DashMap<String, Entry<V>>>,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Insert or replace the value for `key`.
    pub fn insert(&self, key: impl Into<String>, value: V, expires_at: DateTime<Utc>) {
        self.entries
            .insert(key.into(), Entry { value, expires_at });
    }

    /// Value for `key` if it has not expired at `now`.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| now <= entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Value and expiry for `key`, even if expired.
    pub fn get_with_expiry(&self, key: &str) -> Option<(V, DateTime<Utc>)> {
        self.entries
            .get(key)
            .map(|entry| (entry.value.clone(), entry.expires_at))
    }

    /// Modify the value for `key` in place, keeping its expiry.
    ///
    /// Returns `None` without calling `f` if the key is absent or expired.
    pub fn update<F, R>(&self, key: &str, now: DateTime<Utc>, f: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        match self.entries.get_mut(key) {
            Some(mut entry) if now <= entry.expires_at => Some(f(&mut entry.value)),
            _ => None,
        }
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Atomically remove the entry for `key` if `f` accepts its value and expiry.
    pub fn remove_if<F>(&self, key: &str, f: F) -> Option<(V, DateTime<Utc>)>
    where
        F: FnOnce(&V, DateTime<Utc>) -> bool,
    {
        self.entries
            .remove_if(key, |_, entry| f(&entry.value, entry.expires_at))
            .map(|(_, entry)| (entry.value, entry.expires_at))
    }

    /// Drop every entry that expired before `now`. Returns how many were dropped.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.expires_at);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
