//! Buffered HTTP response handed back to callers.

// std
use std::borrow::Cow;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl ApiResponse {
	/// Assembles a response from its parts.
	pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
		Self { status, headers, body }
	}

	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Raw response body.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response and returns its body.
	pub fn into_body(self) -> Vec<u8> {
		self.body
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}

	/// Deserializes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct User {
		#[allow(dead_code)]
		id: u64,
	}

	#[test]
	fn json_errors_carry_the_failing_path() {
		let response =
			ApiResponse::new(StatusCode::OK, HeaderMap::new(), br#"{"id":"seven"}"#.to_vec());
		let err = response.json::<User>().expect_err("String ids should not parse as u64.");

		assert_eq!(err.path().to_string(), "id");
	}

	#[test]
	fn text_is_lossy() {
		let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), vec![b'o', b'k', 0xff]);

		assert_eq!(response.text(), "ok\u{fffd}");
		assert!(response.is_success());
	}
}
