//! Redis implementation of the atomic KV primitives
//!
//! Each trait method maps to exactly one Redis command, so the atomicity
//! guarantees are Redis's own: INCR, HINCRBY, and SET NX EX are single-key
//! atomic operations server-side.

use async_trait::async_trait;
use redis::AsyncCommands;
use reveal_core::{AtomicKv, StoreError, StoreResult};
use std::collections::HashMap;

use crate::pool::RedisPool;

/// Redis-backed store
#[derive(Debug, Clone)]
pub struct RedisKv {
    pool: RedisPool,
}

impl RedisKv {
    /// Create a Redis-backed store over an existing pool
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

fn command_err(e: redis::RedisError) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl AtomicKv for RedisKv {
    async fn ping(&self) -> StoreResult<()> {
        self.pool.health_check().await
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.pool.get().await?;
        conn.exists(key).await.map_err(command_err)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        conn.get(key).await.map_err(command_err)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(command_err)
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let mut conn = self.pool.get().await?;
        // SET key value NX EX ttl replies OK on success, nil when the key
        // already exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(command_err)?;
        Ok(reply.is_some())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.pool.get().await?;
        conn.incr(key, 1).await.map_err(command_err)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let mut conn = self.pool.get().await?;
        conn.expire(key, ttl_seconds as i64)
            .await
            .map_err(command_err)
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<i64>> {
        let mut conn = self.pool.get().await?;
        let ttl: i64 = conn.ttl(key).await.map_err(command_err)?;
        // Redis returns -2 if the key doesn't exist, -1 if it has no TTL
        if ttl == -2 {
            Ok(None)
        } else {
            Ok(Some(ttl))
        }
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, i64)]) -> StoreResult<()> {
        let mut conn = self.pool.get().await?;
        conn.hset_multiple::<_, _, _, ()>(key, fields)
            .await
            .map_err(command_err)
    }

    async fn hash_incr(&self, key: &str, field: &str, by: i64) -> StoreResult<i64> {
        let mut conn = self.pool.get().await?;
        conn.hincr(key, field, by).await.map_err(command_err)
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.pool.get().await?;
        conn.hgetall(key).await.map_err(command_err)
    }
}
