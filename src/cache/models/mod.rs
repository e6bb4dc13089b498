/// 缓存数据模型

pub mod token;

pub use token::TokenRecord;
