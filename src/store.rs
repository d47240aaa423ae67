//! Storage contracts and built-in implementations for the access/refresh token pair.
//!
//! Two layers live here. [`KeyValueStore`] is the storage medium: a string-keyed slot
//! map such as a browser-style local store, a JSON file, or process memory.
//! [`TokenStore`] is the capability the retry machinery talks to; the storage strategy
//! decides which implementation backs it.

pub mod file;
pub mod memory;
pub mod strategy;

pub use file::FileKv;
pub use memory::MemoryKv;
pub use strategy::*;

// self
use crate::{
	_prelude::*,
	token::{TokenPair, TokenSecret, TokenSlot},
};

/// Boxed future returned by storage operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value storage medium addressed by plain string keys.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()>;
}

/// Token persistence capability consumed by the request and response interceptors.
///
/// Implementations must never touch the network. Concurrent writers are not
/// serialized; the last [`set`](TokenStore::set) wins.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Reads the token held in `slot`.
	fn get(&self, slot: TokenSlot) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Persists a renewed token pair.
	fn set(&self, pair: TokenPair) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`KeyValueStore`] and [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
