//! Adapter implementations
//!
//! Adapters implement the ports with concrete technologies:
//! - reqwest HTTP client for the family finance REST API
//! - JSON file (with file locking) for the KeyValueStore port
//! - In-memory map for the KeyValueStore port

pub mod api;
pub mod file_store;
pub mod memory_store;

pub use api::{ApiClient, LoginResponse};
pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
