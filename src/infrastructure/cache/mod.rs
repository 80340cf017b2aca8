//! Cache infrastructure - Hotel cache backends

mod factory;
mod in_memory;
mod redis;
mod sweeper;

pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCacheConfig, InMemoryHotelCache};
pub use redis::{RedisCacheConfig, RedisHotelCache};
pub use sweeper::{spawn_sweeper, sweep_once};
