pub mod redis_store;
pub mod repositories;
