//! Entry point: configure once, then obtain one intercepted client per endpoint.

pub mod factory;

pub use factory::*;

// self
use crate::{
	_prelude::*,
	config::WrapperConfig,
	refresh::RefreshInvoker,
	store::{self, KeyValueStore, TokenStore},
	transport::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Wrapper specialized for the crate's default reqwest transport.
pub type ReqwestAuthWrapper = AuthWrapper<ReqwestTransport>;
#[cfg(feature = "reqwest")]
/// Client instance specialized for the crate's default reqwest transport.
pub type ReqwestClientInstance = ClientInstance<ReqwestTransport>;

/// Joins `base_url`, the optional `version` segment, and `endpoint` by plain concatenation.
///
/// No well-formedness check happens here; a bad URL surfaces later as a transport error.
pub fn join_url(base_url: &str, version: Option<&str>, endpoint: &str) -> String {
	match version.filter(|v| !v.is_empty()) {
		Some(version) => format!("{base_url}/{version}{endpoint}"),
		None => format!("{base_url}{endpoint}"),
	}
}

/// Per-endpoint options accepted by [`AuthWrapper::obtain_client`].
#[derive(Clone, Debug)]
pub struct ClientOptions {
	/// Endpoint path appended to the versioned base URL.
	pub endpoint: String,
	/// Attach the stored bearer token to every request (defaults to `true`).
	pub is_private: bool,
	/// Extra headers merged into every request; they win on collision.
	pub headers: HeaderMap,
}
impl ClientOptions {
	/// Creates private options for `endpoint` with no extra headers.
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self { endpoint: endpoint.into(), is_private: true, headers: HeaderMap::new() }
	}

	/// Marks the endpoint as public: no bearer token is attached.
	pub fn public(mut self) -> Self {
		self.is_private = false;

		self
	}

	/// Overrides the private flag.
	pub fn with_private(mut self, is_private: bool) -> Self {
		self.is_private = is_private;

		self
	}

	/// Adds one extra header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Replaces the extra headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}
}
impl From<&str> for ClientOptions {
	fn from(endpoint: &str) -> Self {
		Self::new(endpoint)
	}
}
impl From<String> for ClientOptions {
	fn from(endpoint: String) -> Self {
		Self::new(endpoint)
	}
}

/// Token-refresh decorator configured once and shared by every endpoint client.
///
/// The wrapper owns the transport, the token store selected by the configured
/// strategy, and the refresh invoker. Each [`obtain_client`](Self::obtain_client)
/// call returns a fresh [`ClientInstance`]; instances share nothing mutable except
/// the token store.
pub struct AuthWrapper<T>
where
	T: ?Sized + HttpTransport,
{
	config: WrapperConfig,
	factory: ClientFactory<T>,
}
impl<T> AuthWrapper<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a wrapper that persists tokens into `medium` per the configured strategy.
	pub fn with_transport(
		config: WrapperConfig,
		transport: impl Into<Arc<T>>,
		medium: Arc<dyn KeyValueStore>,
	) -> Self {
		let store = store::token_store_for(&config, medium);

		Self::with_token_store(config, transport, store)
	}

	/// Creates a wrapper around a caller-provided [`TokenStore`] implementation.
	pub fn with_token_store(
		config: WrapperConfig,
		transport: impl Into<Arc<T>>,
		store: Arc<dyn TokenStore>,
	) -> Self {
		let transport = transport.into();
		let invoker = Arc::new(RefreshInvoker::from_config(transport.clone(), &config));
		let factory = ClientFactory::new(config.base_url(), transport, store, invoker);

		Self { config, factory }
	}

	/// Builds an intercepted client bound to `{base_url}[/{version}]{endpoint}`.
	pub fn obtain_client(&self, options: impl Into<ClientOptions>) -> ClientInstance<T> {
		self.factory.create(self.config.version(), options.into())
	}

	/// Configuration this wrapper was built from.
	pub fn config(&self) -> &WrapperConfig {
		&self.config
	}

	/// Token store shared by every client instance.
	pub fn token_store(&self) -> &Arc<dyn TokenStore> {
		self.factory.token_store()
	}
}
#[cfg(feature = "reqwest")]
impl AuthWrapper<ReqwestTransport> {
	/// Creates a wrapper that provisions its own reqwest-backed transport.
	pub fn new(config: WrapperConfig, medium: Arc<dyn KeyValueStore>) -> Self {
		Self::with_transport(config, ReqwestTransport::default(), medium)
	}
}
impl<T> Debug for AuthWrapper<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthWrapper")
			.field("config", &self.config)
			.field("factory", &self.factory)
			.finish()
	}
}
