//! Renewed access/refresh token pair and the slot addressing used by stores.

// self
use crate::{_prelude::*, token::TokenSecret};

/// The two token slots every [`TokenStore`](crate::store::TokenStore) can address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSlot {
	/// Short-lived bearer token attached to private requests.
	Access,
	/// Long-lived token exchanged at the refresh endpoint.
	Refresh,
}
impl TokenSlot {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenSlot::Access => "access",
			TokenSlot::Refresh => "refresh",
		}
	}
}
impl Display for TokenSlot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Access + refresh tokens returned by the refresh endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret; callers must avoid logging it.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Builds a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}

	/// Returns the secret stored in `slot`.
	pub fn get(&self, slot: TokenSlot) -> &TokenSecret {
		match slot {
			TokenSlot::Access => &self.access_token,
			TokenSlot::Refresh => &self.refresh_token,
		}
	}
}
