//! Outgoing-request decoration: bearer injection and caller header merge.

// self
use crate::{
	_prelude::*,
	store::TokenStore,
	token::TokenSlot,
	transport::RequestContext,
};

/// Injects the stored access token into private requests and merges extra headers.
#[derive(Clone)]
pub struct RequestInterceptor {
	store: Arc<dyn TokenStore>,
	private: bool,
	headers: HeaderMap,
}
impl RequestInterceptor {
	/// Creates an interceptor reading tokens from `store`.
	pub fn new(store: Arc<dyn TokenStore>, private: bool, headers: HeaderMap) -> Self {
		Self { store, private, headers }
	}

	/// Whether requests get the stored bearer token.
	pub fn is_private(&self) -> bool {
		self.private
	}

	/// Extra headers merged into every request.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Decorates `request` in place.
	///
	/// A private request without a stored token proceeds unauthenticated. Extra headers
	/// are merged last, so they win over both the caller's headers and `Authorization`.
	pub async fn apply(&self, request: &mut RequestContext) -> Result<()> {
		if self.private
			&& let Some(token) = self.store.get(TokenSlot::Access).await?
		{
			request.set_bearer(&token)?;
		}

		let target = request.headers_mut();

		for name in self.headers.keys() {
			target.remove(name);

			for value in self.headers.get_all(name) {
				target.append(name.clone(), value.clone());
			}
		}

		Ok(())
	}
}
impl Debug for RequestInterceptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestInterceptor")
			.field("private", &self.private)
			.field("headers", &self.headers)
			.finish()
	}
}
