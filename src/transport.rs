//! Transport primitives the wrapper dispatches through.
//!
//! [`HttpTransport`] is the wrapper's only dependency on an HTTP stack. It receives a
//! fully resolved [`RequestContext`] and reports every HTTP status as
//! `Ok(`[`ApiResponse`]`)`; only failures that produce no response at all (DNS, TCP,
//! TLS, malformed URLs) come back as [`TransportError`]. Status classification, the
//! 401 recovery included, happens above this layer.

pub mod context;
pub mod response;

pub use context::*;
pub use response::*;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP clients capable of executing one request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back many
/// client instances and concurrent requests.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Issues `request` and resolves once the full response body is available.
	fn send<'a>(&'a self, request: &'a RequestContext) -> TransportFuture<'a, ApiResponse>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send<'a>(&'a self, request: &'a RequestContext) -> TransportFuture<'a, ApiResponse> {
		Box::pin(async move {
			let url = Url::parse(request.url()).map_err(|source| TransportError::InvalidUrl {
				url: request.url().to_owned(),
				source,
			})?;
			let mut builder =
				self.0.request(request.method().clone(), url).headers(request.headers().clone());

			if let Some(body) = request.body_bytes() {
				builder = builder.body(body.to_vec());
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse::new(status, headers, body))
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn malformed_urls_fail_before_dispatch() {
		let transport = ReqwestTransport::default();
		let request = RequestContext::get("not a url");
		let err = transport
			.send(&request)
			.await
			.expect_err("Unparsable URLs should be rejected by the transport.");

		assert!(matches!(err, TransportError::InvalidUrl { ref url, .. } if url == "not a url"));
	}
}
