//! Thread-safe in-memory [`KeyValueStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreFuture},
};

type SlotMap = Arc<RwLock<HashMap<String, String>>>;

/// Process-local key-value medium; clones share the same slots.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv(SlotMap);
impl MemoryKv {
	/// Seeds the medium with initial entries.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Returns the value stored under `key` without going through the async contract.
	pub fn peek(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	/// Inserts a value directly, bypassing the async contract.
	pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
		self.0.write().insert(key.into(), value.into());
	}
}
impl KeyValueStore for MemoryKv {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(key).cloned()) })
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key.to_owned(), value.to_owned());

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn clones_share_slots() {
		let medium = MemoryKv::with_entries([("at", "A1")]);
		let clone = medium.clone();

		clone.set("rt", "R1").await.expect("Memory writes should not fail.");

		assert_eq!(medium.get("at").await.expect("Memory reads should not fail."), Some("A1".into()));
		assert_eq!(medium.peek("rt"), Some("R1".into()));
		assert_eq!(medium.peek("missing"), None);
	}
}
