//! Cache adapters for the `aside` entity cache port.

pub mod moka_cache;

pub use moka_cache::MokaCache;
