//! Key-value persistence port

use async_trait::async_trait;

use crate::domain::result::Result;

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "userToken";

/// Storage key holding the serialized user profile JSON
pub const USER_KEY: &str = "userData";

/// Device-local string key-value storage.
///
/// Implementations must apply `set_many` and `remove_many` as a single
/// write: either every entry lands or none does.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries at once
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Remove several keys at once; missing keys are not an error
    async fn remove_many(&self, keys: &[&str]) -> Result<()>;
}
