//! [`TokenStore`] implementations selected by [`StorageStrategy`].

// self
use crate::{
	_prelude::*,
	config::{StorageKeys, StorageStrategy, WrapperConfig},
	store::{KeyValueStore, StoreFuture, TokenStore},
	token::{TokenPair, TokenSecret, TokenSlot},
};

/// Builds the token store backing `config`'s strategy on top of `medium`.
///
/// Strategies without named slots ignore `medium` and run detached.
pub fn token_store_for(config: &WrapperConfig, medium: Arc<dyn KeyValueStore>) -> Arc<dyn TokenStore> {
	match (config.strategy(), config.storage_keys()) {
		(StorageStrategy::LocalKeyValue, Some(keys)) =>
			Arc::new(KeyValueTokenStore::new(keys.clone(), medium)),
		_ => Arc::new(DetachedTokenStore),
	}
}

/// Local key-value strategy: each slot lives under its configured key name.
#[derive(Clone)]
pub struct KeyValueTokenStore {
	keys: StorageKeys,
	medium: Arc<dyn KeyValueStore>,
}
impl KeyValueTokenStore {
	/// Binds `keys` to a storage medium.
	pub fn new(keys: StorageKeys, medium: Arc<dyn KeyValueStore>) -> Self {
		Self { keys, medium }
	}

	/// Key names this store addresses.
	pub fn keys(&self) -> &StorageKeys {
		&self.keys
	}
}
impl Debug for KeyValueTokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeyValueTokenStore").field("keys", &self.keys).finish()
	}
}
impl TokenStore for KeyValueTokenStore {
	fn get(&self, slot: TokenSlot) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move {
			let value = self.medium.get(self.keys.key_for(slot)).await?;

			Ok(value.map(TokenSecret::new))
		})
	}

	/// Writes the access slot, then the refresh slot.
	///
	/// When the refresh write fails, a previously stored access token is written back so
	/// the medium never pairs a renewed access token with a stale refresh token. A slot
	/// that was empty before stays renewed because the medium has no delete operation.
	fn set(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let previous = self.medium.get(&self.keys.access_token).await?;

			self.medium.set(&self.keys.access_token, pair.access_token.expose()).await?;

			if let Err(err) =
				self.medium.set(&self.keys.refresh_token, pair.refresh_token.expose()).await
			{
				if let Some(previous) = previous
					&& let Err(_restore) = self.medium.set(&self.keys.access_token, &previous).await
				{
					#[cfg(feature = "tracing")]
					tracing::warn!(error = %_restore, "failed to restore the previous access token");
				}

				return Err(err);
			}

			Ok(())
		})
	}
}

/// No-persistence strategy: reads yield nothing, writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedTokenStore;
impl TokenStore for DetachedTokenStore {
	fn get(&self, _slot: TokenSlot) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async { Ok(None) })
	}

	fn set(&self, _pair: TokenPair) -> StoreFuture<'_, ()> {
		Box::pin(async { Ok(()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::{KeyValueStore, MemoryKv, StoreError};

	/// Memory medium that refuses writes to one key.
	struct RejectingKv {
		inner: MemoryKv,
		rejected: &'static str,
	}
	impl KeyValueStore for RejectingKv {
		fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
			self.inner.get(key)
		}

		fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
			if key == self.rejected {
				return Box::pin(async move {
					Err(StoreError::Backend { message: format!("{key} is read-only") })
				});
			}

			self.inner.set(key, value)
		}
	}

	fn local_config() -> WrapperConfig {
		WrapperConfig::builder("https://api.x", "/auth/refresh", StorageStrategy::LocalKeyValue)
			.access_token_key("at")
			.refresh_token_key("rt")
			.build()
			.expect("Local configuration should build.")
	}

	#[tokio::test]
	async fn key_value_store_addresses_configured_slots() {
		let medium = Arc::new(MemoryKv::with_entries([("rt", "R1")]));
		let store = token_store_for(&local_config(), medium.clone());

		assert_eq!(store.get(TokenSlot::Access).await.expect("Read should succeed."), None);
		assert_eq!(
			store.get(TokenSlot::Refresh).await.expect("Read should succeed."),
			Some(TokenSecret::new("R1"))
		);

		store.set(TokenPair::new("A2", "R2")).await.expect("Write should succeed.");

		assert_eq!(medium.peek("at"), Some("A2".into()));
		assert_eq!(medium.peek("rt"), Some("R2".into()));
	}

	#[tokio::test]
	async fn detached_store_degrades_silently() {
		let config =
			WrapperConfig::builder("https://api.x", "/auth/refresh", StorageStrategy::Detached)
				.build()
				.expect("Detached configuration should build.");
		let medium = Arc::new(MemoryKv::with_entries([("at", "A1")]));
		let store = token_store_for(&config, medium.clone());

		store.set(TokenPair::new("A2", "R2")).await.expect("Detached writes are no-ops.");

		assert_eq!(store.get(TokenSlot::Access).await.expect("Detached reads succeed."), None);
		assert_eq!(medium.peek("at"), Some("A1".into()));
	}

	#[tokio::test]
	async fn failed_refresh_write_restores_previous_access_token() {
		let inner = MemoryKv::with_entries([("at", "A1"), ("rt", "R1")]);
		let medium = Arc::new(RejectingKv { inner: inner.clone(), rejected: "rt" });
		let store = token_store_for(&local_config(), medium);
		let err = store
			.set(TokenPair::new("A2", "R2"))
			.await
			.expect_err("Rejected refresh write should fail the pair write.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert_eq!(inner.peek("at"), Some("A1".into()));
		assert_eq!(inner.peek("rt"), Some("R1".into()));
	}
}
