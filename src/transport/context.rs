//! Per-request mutable state shared by the interceptors and the transport.

// crates.io
use http::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	error::TransportError,
	interceptor::RetryState,
	token::TokenSecret,
};

/// One outgoing request: method, target, headers, body, and its private retry state.
///
/// The path is resolved against the owning client's base URL right before dispatch.
/// The retry state is readable by anyone but only the wrapper advances it, so each
/// request carries its own at-most-once refresh guarantee.
#[derive(Clone, Debug)]
pub struct RequestContext {
	method: Method,
	path: String,
	url: String,
	headers: HeaderMap,
	body: Option<Vec<u8>>,
	retry: RetryState,
}
impl RequestContext {
	/// Creates a request for `path`, relative to the client base URL unless absolute.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		let path = path.into();

		Self {
			method,
			url: path.clone(),
			path,
			headers: HeaderMap::new(),
			body: None,
			retry: RetryState::Unretried,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Sets a header, replacing existing values under the same name.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets a raw body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Serializes `body` as JSON and sets `content-type: application/json`.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(body).map_err(|source| Error::Encode { source })?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(bytes);

		Ok(self)
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Path as supplied by the caller.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Target URL; equals the path until the owning client resolves it.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Request headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Mutable request headers.
	pub fn headers_mut(&mut self) -> &mut HeaderMap {
		&mut self.headers
	}

	/// Request body, if any.
	pub fn body_bytes(&self) -> Option<&[u8]> {
		self.body.as_deref()
	}

	/// Current retry state.
	pub fn retry_state(&self) -> RetryState {
		self.retry
	}

	/// Whether the single refresh-and-replay cycle has already been spent.
	pub fn is_retried(&self) -> bool {
		!matches!(self.retry, RetryState::Unretried)
	}

	pub(crate) fn advance(&mut self, next: RetryState) {
		crate::obs::trace_transition(self.retry, next);

		self.retry = next;
	}

	pub(crate) fn resolve(&mut self, base_url: &str) {
		self.url = resolve_url(base_url, &self.path);
	}

	pub(crate) fn set_bearer(&mut self, token: &TokenSecret) -> Result<(), TransportError> {
		let value = token
			.bearer_header()
			.map_err(|source| TransportError::InvalidHeader { name: "authorization", source })?;

		self.headers.insert(AUTHORIZATION, value);

		Ok(())
	}
}

fn resolve_url(base_url: &str, path: &str) -> String {
	if path.is_empty() {
		return base_url.to_owned();
	}
	if path.starts_with("http://") || path.starts_with("https://") {
		return path.to_owned();
	}
	if path.starts_with(['?', '#']) {
		return format!("{base_url}{path}");
	}

	format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
