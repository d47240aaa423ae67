//! Out-of-band call to the refresh endpoint.
//!
//! [`RefreshInvoker::refresh`] POSTs `{"refresh_token": <token>}` to the configured
//! refresh URL directly on the transport, so neither interceptor runs for it and a
//! failing refresh is never itself refreshed. The renewed pair is read from the JSON
//! response under the configured [`RefreshFields`].

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use http::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	config::{RefreshFields, WrapperConfig},
	error::RefreshError,
	token::{TokenPair, TokenSecret},
	transport::{HttpTransport, RequestContext},
};

/// Fixed request-body field carrying the refresh token.
pub const REFRESH_TOKEN_FIELD: &str = "refresh_token";

/// Issues refresh calls against one refresh URL.
pub struct RefreshInvoker<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	url: String,
	fields: RefreshFields,
}
impl<T> RefreshInvoker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an invoker that POSTs to `url` and reads `fields` from the response.
	pub fn new(transport: impl Into<Arc<T>>, url: impl Into<String>, fields: RefreshFields) -> Self {
		Self { transport: transport.into(), url: url.into(), fields }
	}

	/// Creates an invoker for the refresh endpoint described by `config`.
	pub fn from_config(transport: impl Into<Arc<T>>, config: &WrapperConfig) -> Self {
		Self::new(transport, config.refresh_url(), config.response_fields().clone())
	}

	/// Full refresh URL.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Exchanges `refresh_token` for a renewed pair.
	///
	/// An absent token is sent as JSON `null`; the endpoint decides whether that is
	/// acceptable (for example when it authenticates through cookies).
	pub async fn refresh(
		&self,
		refresh_token: Option<&TokenSecret>,
	) -> Result<TokenPair, RefreshError> {
		let mut body = Map::new();

		body.insert(
			REFRESH_TOKEN_FIELD.to_owned(),
			refresh_token.map_or(Value::Null, |token| Value::from(token.expose())),
		);

		let request = RequestContext::post(self.url.as_str())
			.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.header(ACCEPT, HeaderValue::from_static("application/json"))
			.body(Value::Object(body).to_string());
		let response = self
			.transport
			.send(&request)
			.await
			.map_err(|source| RefreshError::Transport { source })?;

		if !response.is_success() {
			return Err(RefreshError::Rejected {
				status: response.status(),
				body: response.text().into_owned(),
			});
		}

		let payload: Map<String, Value> =
			response.json().map_err(|source| RefreshError::Parse { source })?;
		let access_token = take_string(&payload, &self.fields.access_token)?;
		let refresh_token = take_string(&payload, &self.fields.refresh_token)?;

		Ok(TokenPair::new(access_token, refresh_token))
	}
}
impl<T> Debug for RefreshInvoker<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshInvoker")
			.field("url", &self.url)
			.field("fields", &self.fields)
			.finish()
	}
}

fn take_string(payload: &Map<String, Value>, field: &str) -> Result<String, RefreshError> {
	payload
		.get(field)
		.and_then(Value::as_str)
		.map(str::to_owned)
		.ok_or_else(|| RefreshError::MissingField { field: field.to_owned() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_or_non_string_fields_are_reported() {
		let payload: Map<String, Value> =
			serde_json::from_str(r#"{"at":"A2","rt":7}"#).expect("Fixture should parse.");

		assert_eq!(take_string(&payload, "at").expect("String field should be read."), "A2");
		assert!(matches!(
			take_string(&payload, "rt"),
			Err(RefreshError::MissingField { ref field }) if field == "rt"
		));
		assert!(matches!(take_string(&payload, "absent"), Err(RefreshError::MissingField { .. })));
	}
}
