//! Retry-once state machine driven by each request's response.
//!
//! Every request starts [`Unretried`](RetryState::Unretried). A 401 on an unretried
//! request moves it to [`Retrying`](RetryState::Retrying): the stored refresh token is
//! exchanged, the renewed pair is persisted, the new bearer is written onto the request,
//! and the caller replays it. Anything else (a success, any other status, a network
//! failure, or a 401 on a request that already retried) settles the request with the
//! outcome unchanged. A failed refresh settles with the [`RefreshError`] in place of the
//! original 401.
//!
//! [`RefreshError`]: crate::error::RefreshError

// self
use crate::{
	_prelude::*,
	error::TransportError,
	obs::{self, RefreshOutcome},
	refresh::{RefreshInvoker, RefreshMetrics},
	store::TokenStore,
	token::{TokenPair, TokenSlot},
	transport::{ApiResponse, HttpTransport, RequestContext},
};

/// Per-request position in the retry-once cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RetryState {
	/// No refresh has been attempted for this request.
	#[default]
	Unretried,
	/// A refresh succeeded and the request is being replayed.
	Retrying,
	/// The final outcome has been handed to the caller.
	Settled,
}
impl RetryState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RetryState::Unretried => "unretried",
			RetryState::Retrying => "retrying",
			RetryState::Settled => "settled",
		}
	}
}
impl Display for RetryState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What the dispatcher must do after a response was intercepted.
#[derive(Debug)]
pub enum Transition {
	/// Re-dispatch the same request; its bearer has been renewed.
	Replay,
	/// Hand this result to the caller.
	Settled(Result<ApiResponse>),
}

/// Inspects responses and drives the single refresh-and-replay cycle.
pub struct ResponseInterceptor<T>
where
	T: ?Sized + HttpTransport,
{
	store: Arc<dyn TokenStore>,
	invoker: Arc<RefreshInvoker<T>>,
	metrics: Arc<RefreshMetrics>,
}
impl<T> ResponseInterceptor<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an interceptor that refreshes through `invoker` and persists into `store`.
	pub fn new(
		store: Arc<dyn TokenStore>,
		invoker: Arc<RefreshInvoker<T>>,
		metrics: Arc<RefreshMetrics>,
	) -> Self {
		Self { store, invoker, metrics }
	}

	/// Classifies `outcome` for `request` and advances its retry state.
	pub async fn intercept(
		&self,
		request: &mut RequestContext,
		outcome: Result<ApiResponse, TransportError>,
	) -> Transition {
		let response = match outcome {
			Ok(response) => response,
			Err(err) => return settle(request, Err(err.into())),
		};

		if response.status() == StatusCode::UNAUTHORIZED && !request.is_retried() {
			return self.recover(request).await;
		}
		if response.is_success() {
			settle(request, Ok(response))
		} else {
			settle(request, Err(TransportError::status(response).into()))
		}
	}

	async fn recover(&self, request: &mut RequestContext) -> Transition {
		request.advance(RetryState::Retrying);

		let pair = match self.refresh_and_persist().await {
			Ok(pair) => pair,
			Err(err) => return settle(request, Err(err)),
		};

		match request.set_bearer(&pair.access_token) {
			Ok(()) => Transition::Replay,
			Err(err) => settle(request, Err(err.into())),
		}
	}

	async fn refresh_and_persist(&self) -> Result<TokenPair> {
		self.metrics.record_attempt();
		obs::record_refresh_outcome(RefreshOutcome::Attempt);

		let result: Result<TokenPair> = async {
			let refresh_token = self.store.get(TokenSlot::Refresh).await?;
			let pair = self.invoker.refresh(refresh_token.as_ref()).await?;

			self.store.set(pair.clone()).await?;

			Ok(pair)
		}
		.await;

		match &result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_refresh_outcome(RefreshOutcome::Success);
			},
			Err(_) => {
				self.metrics.record_failure();
				obs::record_refresh_outcome(RefreshOutcome::Failure);
			},
		}

		result
	}
}
impl<T> Debug for ResponseInterceptor<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResponseInterceptor").field("invoker", &self.invoker).finish()
	}
}

fn settle(request: &mut RequestContext, result: Result<ApiResponse>) -> Transition {
	request.advance(RetryState::Settled);

	Transition::Settled(result)
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::VecDeque;
	// crates.io
	use http::header::AUTHORIZATION;
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::{
		config::{RefreshFields, StorageKeys},
		error::{Error, RefreshError},
		store::{KeyValueTokenStore, MemoryKv},
		transport::TransportFuture,
	};

	/// Replays canned refresh-endpoint outcomes and records what it was asked to send.
	#[derive(Default)]
	struct ScriptedTransport {
		outcomes: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
		sent: Mutex<Vec<String>>,
	}
	impl ScriptedTransport {
		fn push_json(&self, status: StatusCode, body: &str) {
			self.outcomes.lock().push_back(Ok(ApiResponse::new(
				status,
				HeaderMap::new(),
				body.as_bytes().to_vec(),
			)));
		}

		fn sent(&self) -> Vec<String> {
			self.sent.lock().clone()
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn send<'a>(&'a self, request: &'a RequestContext) -> TransportFuture<'a, ApiResponse> {
			Box::pin(async move {
				self.sent
					.lock()
					.push(String::from_utf8_lossy(request.body_bytes().unwrap_or_default()).into());
				self.outcomes.lock().pop_front().unwrap_or_else(|| {
					Err(TransportError::network(std::io::Error::other("script exhausted")))
				})
			})
		}
	}

	struct Harness {
		transport: Arc<ScriptedTransport>,
		medium: Arc<MemoryKv>,
		metrics: Arc<RefreshMetrics>,
		interceptor: ResponseInterceptor<ScriptedTransport>,
	}

	fn harness() -> Harness {
		let transport = Arc::new(ScriptedTransport::default());
		let medium = Arc::new(MemoryKv::with_entries([("at", "A1"), ("rt", "R1")]));
		let keys = StorageKeys { access_token: "at".into(), refresh_token: "rt".into() };
		let store: Arc<dyn TokenStore> =
			Arc::new(KeyValueTokenStore::new(keys.clone(), medium.clone()));
		let invoker: Arc<RefreshInvoker<ScriptedTransport>> = Arc::new(RefreshInvoker::new(
			transport.clone(),
			"https://api.x/v1/auth/refresh",
			RefreshFields::from(&keys),
		));
		let metrics = Arc::new(RefreshMetrics::default());
		let interceptor = ResponseInterceptor::new(store, invoker, metrics.clone());

		Harness { transport, medium, metrics, interceptor }
	}

	fn response(status: StatusCode) -> Result<ApiResponse, TransportError> {
		Ok(ApiResponse::new(status, HeaderMap::new(), Vec::new()))
	}

	#[tokio::test]
	async fn first_unauthorized_refreshes_and_requests_replay() {
		let h = harness();
		let mut request = RequestContext::get("https://api.x/v1/users");

		h.transport.push_json(StatusCode::OK, r#"{"at":"A2","rt":"R2"}"#);

		let transition =
			h.interceptor.intercept(&mut request, response(StatusCode::UNAUTHORIZED)).await;

		assert!(matches!(transition, Transition::Replay));
		assert_eq!(request.retry_state(), RetryState::Retrying);
		assert_eq!(request.headers()[AUTHORIZATION], "Bearer A2");
		assert_eq!(h.medium.peek("at"), Some("A2".into()));
		assert_eq!(h.medium.peek("rt"), Some("R2".into()));
		assert_eq!(h.transport.sent(), vec![r#"{"refresh_token":"R1"}"#.to_owned()]);
		assert_eq!(h.metrics.successes(), 1);
	}

	#[tokio::test]
	async fn second_unauthorized_settles_without_refresh() {
		let h = harness();
		let mut request = RequestContext::get("https://api.x/v1/users");

		h.transport.push_json(StatusCode::OK, r#"{"at":"A2","rt":"R2"}"#);

		let first =
			h.interceptor.intercept(&mut request, response(StatusCode::UNAUTHORIZED)).await;

		assert!(matches!(first, Transition::Replay));

		let second =
			h.interceptor.intercept(&mut request, response(StatusCode::UNAUTHORIZED)).await;

		match second {
			Transition::Settled(Err(err)) =>
				assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED)),
			other => panic!("Replayed 401 should settle with the 401, got {other:?}."),
		}

		assert_eq!(request.retry_state(), RetryState::Settled);
		assert_eq!(h.metrics.attempts(), 1);
		assert_eq!(h.transport.sent().len(), 1);
	}

	#[tokio::test]
	async fn refresh_failure_replaces_the_unauthorized_outcome() {
		let h = harness();
		let mut request = RequestContext::get("https://api.x/v1/users");

		h.transport.push_json(StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#);

		let transition =
			h.interceptor.intercept(&mut request, response(StatusCode::UNAUTHORIZED)).await;

		match transition {
			Transition::Settled(Err(Error::Refresh(RefreshError::Rejected { status, .. }))) =>
				assert_eq!(status, StatusCode::BAD_REQUEST),
			other => panic!("Refresh rejection should settle with a RefreshError, got {other:?}."),
		}

		assert_eq!(h.medium.peek("at"), Some("A1".into()));
		assert_eq!(h.metrics.failures(), 1);
	}

	#[tokio::test]
	async fn non_unauthorized_outcomes_settle_unchanged() {
		let h = harness();
		let mut ok = RequestContext::get("https://api.x/v1/users");
		let mut forbidden = RequestContext::get("https://api.x/v1/users");
		let mut offline = RequestContext::get("https://api.x/v1/users");
		let network = Err(TransportError::network(std::io::Error::other("connection reset")));

		assert!(matches!(
			h.interceptor.intercept(&mut ok, response(StatusCode::OK)).await,
			Transition::Settled(Ok(_))
		));
		match h.interceptor.intercept(&mut forbidden, response(StatusCode::FORBIDDEN)).await {
			Transition::Settled(Err(err @ Error::Transport(TransportError::Status { .. }))) =>
				assert_eq!(err.status(), Some(StatusCode::FORBIDDEN)),
			other => panic!("A 403 should settle as a transport status error, got {other:?}."),
		}
		assert!(matches!(
			h.interceptor.intercept(&mut offline, network).await,
			Transition::Settled(Err(Error::Transport(TransportError::Network { .. })))
		));
		assert!(h.transport.sent().is_empty());
		assert_eq!(h.metrics.attempts(), 0);
	}
}
