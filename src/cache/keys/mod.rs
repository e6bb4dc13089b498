/// 缓存键模块

pub mod token_keys;

pub use token_keys::{pattern_for, strip_prefix, token_key};
