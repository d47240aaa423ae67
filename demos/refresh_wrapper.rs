//! Demonstrates the refresh-and-replay cycle against an in-process transport.
//!
//! 1. Implement [`HttpTransport`] so requests never leave the process.
//! 2. Seed a [`MemoryKv`] medium with an expired access token and a refresh token.
//! 3. Obtain a client for `/users`; the first call answers 401, the wrapper refreshes once
//!    and replays with the renewed bearer.

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use color_eyre::Result;
// self
use bearer_guard::{
	client::AuthWrapper,
	config::{StorageStrategy, WrapperConfig},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	store::{KeyValueStore, MemoryKv},
	transport::{ApiResponse, HttpTransport, RequestContext, TransportFuture},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config =
		WrapperConfig::builder("https://api.example.com", "/auth/refresh", StorageStrategy::LocalKeyValue)
			.version("v1")
			.access_token_key("at")
			.refresh_token_key("rt")
			.build()?;
	let medium = Arc::new(MemoryKv::with_entries([("at", "expired"), ("rt", "R1")]));
	let transport = Arc::new(InProcessApi::default());
	let wrapper: AuthWrapper<InProcessApi> = AuthWrapper::with_transport(
		config,
		Arc::clone(&transport),
		Arc::clone(&medium) as Arc<dyn KeyValueStore>,
	);
	let users = wrapper.obtain_client("/users");
	let response = users.get("").await?;

	println!("GET {} -> {} {}", users.base_url(), response.status(), response.text());
	println!(
		"Stored tokens after refresh: at={:?}, rt={:?}; refresh calls: {}.",
		medium.peek("at"),
		medium.peek("rt"),
		transport.refreshes.load(Ordering::Relaxed),
	);

	Ok(())
}

/// Fake API: `/auth/refresh` rotates tokens, everything else requires `Bearer fresh`.
#[derive(Default)]
struct InProcessApi {
	refreshes: AtomicUsize,
}
impl HttpTransport for InProcessApi {
	fn send<'a>(&'a self, request: &'a RequestContext) -> TransportFuture<'a, ApiResponse> {
		Box::pin(async move {
			if request.url().ends_with("/auth/refresh") {
				self.refreshes.fetch_add(1, Ordering::Relaxed);

				return Ok(json(StatusCode::OK, r#"{"at":"fresh","rt":"R2"}"#));
			}

			let authorized = request
				.headers()
				.get(AUTHORIZATION)
				.is_some_and(|value| value.as_bytes() == b"Bearer fresh");

			if authorized {
				Ok(json(StatusCode::OK, r#"[{"id":1,"name":"ada"}]"#))
			} else {
				Ok(json(StatusCode::UNAUTHORIZED, r#"{"error":"token expired"}"#))
			}
		})
	}
}

fn json(status: StatusCode, body: &str) -> ApiResponse {
	ApiResponse::new(status, HeaderMap::new(), body.as_bytes().to_vec())
}
