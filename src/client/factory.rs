//! Construction of transport-bound client instances and their dispatch loop.

// self
use crate::{
	_prelude::*,
	client::{ClientOptions, join_url},
	interceptor::{RequestInterceptor, ResponseInterceptor, RetryState, Transition},
	obs::DispatchSpan,
	refresh::{RefreshInvoker, RefreshMetrics},
	store::TokenStore,
	transport::{ApiResponse, HttpTransport, RequestContext},
};

/// Builds [`ClientInstance`] values scoped to one base URL.
pub struct ClientFactory<T>
where
	T: ?Sized + HttpTransport,
{
	base_url: String,
	transport: Arc<T>,
	store: Arc<dyn TokenStore>,
	invoker: Arc<RefreshInvoker<T>>,
}
impl<T> ClientFactory<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a factory sharing `transport`, `store`, and `invoker` across instances.
	pub fn new(
		base_url: impl Into<String>,
		transport: Arc<T>,
		store: Arc<dyn TokenStore>,
		invoker: Arc<RefreshInvoker<T>>,
	) -> Self {
		Self { base_url: base_url.into(), transport, store, invoker }
	}

	/// Creates a client bound to `{base_url}[/{version}]{options.endpoint}` with both
	/// interceptors attached.
	pub fn create(&self, version: Option<&str>, options: ClientOptions) -> ClientInstance<T> {
		let base_url = join_url(&self.base_url, version, &options.endpoint);
		let metrics = Arc::new(RefreshMetrics::default());
		let request =
			RequestInterceptor::new(self.store.clone(), options.is_private, options.headers);
		let response =
			ResponseInterceptor::new(self.store.clone(), self.invoker.clone(), metrics.clone());

		ClientInstance {
			inner: Arc::new(ClientInner {
				base_url,
				transport: self.transport.clone(),
				request,
				response,
				metrics,
			}),
		}
	}

	/// Token store handed to every instance.
	pub fn token_store(&self) -> &Arc<dyn TokenStore> {
		&self.store
	}
}
impl<T> Debug for ClientFactory<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientFactory")
			.field("base_url", &self.base_url)
			.field("invoker", &self.invoker)
			.finish()
	}
}

struct ClientInner<T>
where
	T: ?Sized + HttpTransport,
{
	base_url: String,
	transport: Arc<T>,
	request: RequestInterceptor,
	response: ResponseInterceptor<T>,
	metrics: Arc<RefreshMetrics>,
}

/// Transport handle bound to one endpoint, carrying both interceptors.
///
/// Clones share the same endpoint and counters. Separate
/// [`obtain_client`](crate::client::AuthWrapper::obtain_client) calls never do.
pub struct ClientInstance<T>
where
	T: ?Sized + HttpTransport,
{
	inner: Arc<ClientInner<T>>,
}
impl<T> ClientInstance<T>
where
	T: ?Sized + HttpTransport,
{
	/// Full base URL of the bound endpoint.
	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	/// Request decoration applied before every dispatch.
	pub fn request_interceptor(&self) -> &RequestInterceptor {
		&self.inner.request
	}

	/// Refresh counters for this instance.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.inner.metrics
	}

	/// Dispatches `request`, recovering from at most one expired-token 401.
	///
	/// Non-2xx responses resolve to [`TransportError::Status`](crate::error::TransportError::Status).
	pub async fn send(&self, mut request: RequestContext) -> Result<ApiResponse> {
		let inner = self.inner.as_ref();
		let span = DispatchSpan::new(&inner.base_url, "send");

		span.instrument(async move {
			request.resolve(&inner.base_url);

			loop {
				if let Err(err) = inner.request.apply(&mut request).await {
					request.advance(RetryState::Settled);

					return Err(err);
				}

				let outcome = inner.transport.send(&request).await;

				match inner.response.intercept(&mut request, outcome).await {
					Transition::Replay => inner.metrics.record_replay(),
					Transition::Settled(result) => return result,
				}
			}
		})
		.await
	}

	/// Sends a `GET` request for `path`.
	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		self.send(RequestContext::get(path)).await
	}

	/// Sends a `DELETE` request for `path`.
	pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
		self.send(RequestContext::delete(path)).await
	}

	/// Sends a `POST` request with a JSON body.
	pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send_json(Method::POST, path, body).await
	}

	/// Sends a `PUT` request with a JSON body.
	pub async fn put_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send_json(Method::PUT, path, body).await
	}

	/// Sends a `PATCH` request with a JSON body.
	pub async fn patch_json<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send_json(Method::PATCH, path, body).await
	}

	async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send(RequestContext::new(method, path).json(body)?).await
	}
}
impl<T> Clone for ClientInstance<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}
impl<T> Debug for ClientInstance<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientInstance")
			.field("base_url", &self.inner.base_url)
			.field("request", &self.inner.request)
			.finish()
	}
}
