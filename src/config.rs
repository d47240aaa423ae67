//! Immutable wrapper configuration and its validating builder.
//!
//! A [`WrapperConfig`] can only be obtained through [`WrapperConfigBuilder::build`], so a
//! strategy that needs named storage slots never runs without both key names.

// self
use crate::{_prelude::*, client, error::ConfigError, token::TokenSlot};

/// Storage strategy selecting where renewed tokens are persisted.
///
/// Deserialization goes through [`StorageStrategy::from_name`], so unknown names
/// degrade the same way they do when parsed by hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum StorageStrategy {
	/// Persist both tokens into a key-value medium under the configured key names.
	#[default]
	LocalKeyValue,
	/// No persistence: reads yield nothing and writes are dropped.
	Detached,
}
impl StorageStrategy {
	/// Resolves a strategy from its textual name.
	///
	/// Unknown names degrade to [`StorageStrategy::Detached`] instead of failing.
	pub fn from_name(name: &str) -> Self {
		match name.trim() {
			"local" | "local_storage" | "localStorage" | "local_key_value" => Self::LocalKeyValue,
			"detached" => Self::Detached,
			_other => {
				#[cfg(feature = "tracing")]
				tracing::warn!(strategy = _other, "unknown storage strategy, tokens will not persist");

				Self::Detached
			},
		}
	}

	/// Whether the strategy addresses tokens through named key-value slots.
	pub const fn requires_named_slots(self) -> bool {
		matches!(self, Self::LocalKeyValue)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::LocalKeyValue => "local_key_value",
			Self::Detached => "detached",
		}
	}
}
impl From<String> for StorageStrategy {
	fn from(name: String) -> Self {
		Self::from_name(&name)
	}
}
impl Display for StorageStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Key names addressing the two token slots inside a key-value medium.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKeys {
	/// Key under which the access token is stored.
	pub access_token: String,
	/// Key under which the refresh token is stored.
	pub refresh_token: String,
}
impl StorageKeys {
	/// Returns the key name for `slot`.
	pub fn key_for(&self, slot: TokenSlot) -> &str {
		match slot {
			TokenSlot::Access => &self.access_token,
			TokenSlot::Refresh => &self.refresh_token,
		}
	}
}

/// JSON field names read from the refresh endpoint's response body.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefreshFields {
	/// Field carrying the renewed access token.
	pub access_token: String,
	/// Field carrying the renewed refresh token.
	pub refresh_token: String,
}
impl Default for RefreshFields {
	fn default() -> Self {
		Self { access_token: "access_token".into(), refresh_token: "refresh_token".into() }
	}
}
impl From<&StorageKeys> for RefreshFields {
	fn from(keys: &StorageKeys) -> Self {
		Self { access_token: keys.access_token.clone(), refresh_token: keys.refresh_token.clone() }
	}
}

/// Validated, immutable wrapper configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperConfig {
	base_url: String,
	version: Option<String>,
	refresh_endpoint: String,
	strategy: StorageStrategy,
	storage_keys: Option<StorageKeys>,
	response_fields: RefreshFields,
}
impl WrapperConfig {
	/// Returns a builder seeded with the required fields.
	pub fn builder(
		base_url: impl Into<String>,
		refresh_endpoint: impl Into<String>,
		strategy: StorageStrategy,
	) -> WrapperConfigBuilder {
		WrapperConfigBuilder::new(base_url, refresh_endpoint, strategy)
	}

	/// Root base URL shared by every endpoint.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Optional API version segment inserted after the base URL.
	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}

	/// Path of the refresh endpoint, relative to the versioned base URL.
	pub fn refresh_endpoint(&self) -> &str {
		&self.refresh_endpoint
	}

	/// Configured storage strategy.
	pub fn strategy(&self) -> StorageStrategy {
		self.strategy
	}

	/// Storage key names; always present when the strategy requires named slots.
	pub fn storage_keys(&self) -> Option<&StorageKeys> {
		self.storage_keys.as_ref()
	}

	/// Response field names used to read renewed tokens.
	pub fn response_fields(&self) -> &RefreshFields {
		&self.response_fields
	}

	/// Full refresh URL: `{base_url}[/{version}]{refresh_endpoint}`.
	pub fn refresh_url(&self) -> String {
		client::join_url(&self.base_url, self.version(), &self.refresh_endpoint)
	}
}

/// Builder for [`WrapperConfig`] values.
#[derive(Debug)]
pub struct WrapperConfigBuilder {
	/// Root base URL.
	pub base_url: String,
	/// Optional version segment; empty strings count as absent.
	pub version: Option<String>,
	/// Refresh endpoint path.
	pub refresh_endpoint: String,
	/// Storage strategy.
	pub strategy: StorageStrategy,
	/// Storage key for the access token.
	pub access_token_key: Option<String>,
	/// Storage key for the refresh token.
	pub refresh_token_key: Option<String>,
	/// Response field overrides; defaults to the storage key names when unset.
	pub response_fields: Option<RefreshFields>,
}
impl WrapperConfigBuilder {
	/// Creates a new builder seeded with the required fields.
	pub fn new(
		base_url: impl Into<String>,
		refresh_endpoint: impl Into<String>,
		strategy: StorageStrategy,
	) -> Self {
		Self {
			base_url: base_url.into(),
			version: None,
			refresh_endpoint: refresh_endpoint.into(),
			strategy,
			access_token_key: None,
			refresh_token_key: None,
			response_fields: None,
		}
	}

	/// Sets the API version segment.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());

		self
	}

	/// Sets the storage key for the access token.
	pub fn access_token_key(mut self, key: impl Into<String>) -> Self {
		self.access_token_key = Some(key.into());

		self
	}

	/// Sets the storage key for the refresh token.
	pub fn refresh_token_key(mut self, key: impl Into<String>) -> Self {
		self.refresh_token_key = Some(key.into());

		self
	}

	/// Overrides the JSON field names read from refresh responses.
	pub fn response_fields(mut self, fields: RefreshFields) -> Self {
		self.response_fields = Some(fields);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<WrapperConfig, ConfigError> {
		if self.base_url.is_empty() {
			return Err(ConfigError::EmptyField { field: "base_url" });
		}
		if self.refresh_endpoint.is_empty() {
			return Err(ConfigError::EmptyField { field: "refresh_endpoint" });
		}

		let storage_keys = if self.strategy.requires_named_slots() {
			let access_token = require_key(self.strategy, "access_token_key", self.access_token_key)?;
			let refresh_token =
				require_key(self.strategy, "refresh_token_key", self.refresh_token_key)?;

			Some(StorageKeys { access_token, refresh_token })
		} else {
			None
		};
		let response_fields = match (self.response_fields, storage_keys.as_ref()) {
			(Some(fields), _) => fields,
			(None, Some(keys)) => RefreshFields::from(keys),
			(None, None) => RefreshFields::default(),
		};

		Ok(WrapperConfig {
			base_url: self.base_url,
			version: self.version.filter(|v| !v.is_empty()),
			refresh_endpoint: self.refresh_endpoint,
			strategy: self.strategy,
			storage_keys,
			response_fields,
		})
	}
}

fn require_key(
	strategy: StorageStrategy,
	key: &'static str,
	value: Option<String>,
) -> Result<String, ConfigError> {
	value.filter(|v| !v.is_empty()).ok_or(ConfigError::MissingStorageKey { strategy, key })
}
