//! In-process implementation of the atomic KV primitives
//!
//! Development fallback when no store URL is configured, and the test double
//! for everything above this layer. A single mutex around the map makes every
//! operation atomic; critical sections never await, so the lock is held only
//! for the map access itself.
//!
//! Not suitable for multi-instance deployments: instances would each count
//! their own votes.

use async_trait::async_trait;
use parking_lot::Mutex;
use reveal_core::{AtomicKv, StoreError, StoreResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum StoredValue {
    Scalar(String),
    Hash(HashMap<String, i64>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: StoredValue,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory store with lazy key expiry
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the entry if its TTL has elapsed, then run `f` on what remains
    fn with_live_entry<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut HashMap<String, Entry>, Option<&mut Entry>) -> T,
    ) -> T {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        // Split borrow: look up after the expiry sweep
        if entries.contains_key(key) {
            let mut entry = entries.remove(key).expect("checked above");
            let result = f(&mut entries, Some(&mut entry));
            entries.insert(key.to_string(), entry);
            result
        } else {
            f(&mut entries, None)
        }
    }
}

#[async_trait]
impl AtomicKv for MemoryKv {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.with_live_entry(key, |_, entry| entry.is_some()))
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_live_entry(key, |_, entry| match entry {
            Some(Entry {
                value: StoredValue::Scalar(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(_) => Err(StoreError::Backend("wrong value type".to_string())),
            None => Ok(None),
        })
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            Entry {
                value: StoredValue::Scalar(value.to_string()),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<bool> {
        Ok(self.with_live_entry(key, |entries, entry| {
            if entry.is_some() {
                false
            } else {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: StoredValue::Scalar(value.to_string()),
                        expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
                    },
                );
                true
            }
        }))
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.with_live_entry(key, |entries, entry| match entry {
            Some(Entry {
                value: StoredValue::Scalar(s),
                ..
            }) => {
                let current: i64 = s
                    .parse()
                    .map_err(|_| StoreError::Backend("value is not an integer".to_string()))?;
                *s = (current + 1).to_string();
                Ok(current + 1)
            }
            Some(_) => Err(StoreError::Backend("wrong value type".to_string())),
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: StoredValue::Scalar("1".to_string()),
                        expires_at: None,
                    },
                );
                Ok(1)
            }
        })
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        Ok(self.with_live_entry(key, |_, entry| match entry {
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + Duration::from_secs(ttl_seconds));
                true
            }
            None => false,
        }))
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<i64>> {
        Ok(self.with_live_entry(key, |_, entry| match entry {
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => {
                let remaining = at.saturating_duration_since(Instant::now());
                Some(remaining.as_secs_f64().ceil() as i64)
            }
            Some(_) => Some(-1),
            None => None,
        }))
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, i64)]) -> StoreResult<()> {
        self.with_live_entry(key, |entries, entry| match entry {
            Some(Entry {
                value: StoredValue::Hash(map),
                ..
            }) => {
                for (field, value) in fields {
                    map.insert((*field).to_string(), *value);
                }
                Ok(())
            }
            Some(_) => Err(StoreError::Backend("wrong value type".to_string())),
            None => {
                let map = fields
                    .iter()
                    .map(|(field, value)| ((*field).to_string(), *value))
                    .collect();
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: StoredValue::Hash(map),
                        expires_at: None,
                    },
                );
                Ok(())
            }
        })
    }

    async fn hash_incr(&self, key: &str, field: &str, by: i64) -> StoreResult<i64> {
        self.with_live_entry(key, |entries, entry| match entry {
            Some(Entry {
                value: StoredValue::Hash(map),
                ..
            }) => {
                let counter = map.entry(field.to_string()).or_insert(0);
                *counter += by;
                Ok(*counter)
            }
            Some(_) => Err(StoreError::Backend("wrong value type".to_string())),
            None => {
                let mut map = HashMap::new();
                map.insert(field.to_string(), by);
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: StoredValue::Hash(map),
                        expires_at: None,
                    },
                );
                Ok(by)
            }
        })
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        self.with_live_entry(key, |_, entry| match entry {
            Some(Entry {
                value: StoredValue::Hash(map),
                ..
            }) => Ok(map
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect()),
            Some(_) => Err(StoreError::Backend("wrong value type".to_string())),
            None => Ok(HashMap::new()),
        })
    }
}
