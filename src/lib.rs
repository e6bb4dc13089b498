pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod store;
pub mod utils;

pub use cache::{CacheBackend, MemoryCache, RedisCache, TokenRecord};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, ConfigError, StoreError, StoreResult};
pub use store::{TokenStore, Verification};
