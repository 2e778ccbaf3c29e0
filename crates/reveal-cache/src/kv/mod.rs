//! `AtomicKv` implementations

mod memory_kv;
mod redis_kv;

pub use memory_kv::MemoryKv;
pub use redis_kv::RedisKv;
