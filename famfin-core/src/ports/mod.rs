//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The session store
//! depends only on these traits, not on concrete implementations.

mod key_value_store;

pub use key_value_store::{KeyValueStore, TOKEN_KEY, USER_KEY};
