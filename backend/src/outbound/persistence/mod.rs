//! Record store adapters.

pub mod memory;
pub mod rest;

pub use self::memory::InMemoryRecordStore;
pub use self::rest::RestRecordStore;
