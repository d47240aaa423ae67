//! Bearer-token decorator for HTTP clients: attach stored tokens to private requests,
//! recover from a single expired-token 401 by refreshing and replaying once, and keep
//! token persistence behind a pluggable store.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod obs;
pub mod refresh;
pub mod store;
pub mod token;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ReqwestAuthWrapper,
		config::{StorageStrategy, WrapperConfig},
		store::{KeyValueStore, MemoryKv},
		transport::ReqwestTransport,
	};

	/// Storage key for the access token used across integration tests.
	pub const ACCESS_KEY: &str = "at";
	/// Storage key for the refresh token used across integration tests.
	pub const REFRESH_KEY: &str = "rt";

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Local key-value configuration rooted at `base_url` with version `v1`, refresh endpoint
	/// `/auth/refresh`, and the [`ACCESS_KEY`]/[`REFRESH_KEY`] slots.
	pub fn local_test_config(base_url: &str) -> WrapperConfig {
		WrapperConfig::builder(base_url, "/auth/refresh", StorageStrategy::LocalKeyValue)
			.version("v1")
			.access_token_key(ACCESS_KEY)
			.refresh_token_key(REFRESH_KEY)
			.build()
			.expect("Local test configuration should be valid.")
	}

	/// Constructs a wrapper backed by an in-memory key-value medium and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_wrapper(config: WrapperConfig) -> (ReqwestAuthWrapper, Arc<MemoryKv>) {
		let medium_backend = Arc::new(MemoryKv::default());
		let medium: Arc<dyn KeyValueStore> = medium_backend.clone();
		let wrapper = ReqwestAuthWrapper::with_transport(config, test_reqwest_transport(), medium);

		(wrapper, medium_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
#[cfg(test)] use {color_eyre as _, httpmock as _};
