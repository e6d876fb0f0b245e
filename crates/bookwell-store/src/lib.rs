//! Persisted key-value storage for the Bookwell client.
//!
//! The session layer needs somewhere to keep the bearer token, the last
//! business identifier, and the cached subscription snapshot between app
//! launches. On a device that's the platform's async key-value store; on
//! desktop hosts it's [`JsonFileStore`]; in tests it's [`MemoryStore`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Route Layer (above)    ← reads derived session state
//!     ↕
//! Session Layer          ← persists and clears credentials
//!     ↕
//! Store Layer (this crate)  ← string keys, string values
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::future::Future;

/// An async, string-keyed, string-valued persisted store.
///
/// All methods take `&self`: implementations hold their own interior
/// mutability so a single store can be shared by reference.
///
/// # Example
///
/// ```rust
/// use bookwell_store::{KeyValueStore, MemoryStore};
///
/// # tokio_test_block(async {
/// let store = MemoryStore::new();
/// store.set("token", "abc").await.unwrap();
/// assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes every key.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
