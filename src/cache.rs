//! Cache contracts and built-in cache implementations for OAuth tokens.
//!
//! The credential manager only ever stores bare strings under fixed keys with a TTL, so the
//! contract is a minimal async key-value interface. Any backend failure is treated by callers
//! as a cache miss; correctness never depends on the cache, only the number of token requests
//! does.

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Key-value cache with per-entry expiry.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Returns the live value stored under `key`, or `None` when absent or expired.
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

	/// Stores or replaces `value` under `key`, expiring after `ttl`.
	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()>;

	/// Evicts `key`. Evicting a missing key succeeds.
	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// The key is empty or contains reserved characters.
	#[error("Cache key `{key}` is invalid.")]
	InvalidKey {
		/// Rejected key.
		key: String,
	},
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// A cached value together with its absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
	/// Cached value.
	pub value: String,
	/// Instant after which the entry is treated as absent.
	pub expires_at: OffsetDateTime,
}
impl CacheEntry {
	/// Creates an entry that expires `ttl` after `now`.
	pub fn new(value: impl Into<String>, now: OffsetDateTime, ttl: Duration) -> Self {
		Self { value: value.into(), expires_at: now + ttl }
	}

	/// Returns true while the entry has not yet expired.
	pub fn is_live_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}
}

const RESERVED_KEY_CHARS: &[char] = &['{', '}', '(', ')', '/', '\\', '@', ':'];

/// Rejects keys that are empty or contain reserved characters.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
	if key.is_empty() || key.contains(RESERVED_KEY_CHARS) {
		Err(CacheError::InvalidKey { key: key.to_owned() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn entries_expire_at_their_deadline() {
		let now = OffsetDateTime::now_utc();
		let entry = CacheEntry::new("token", now, Duration::minutes(59));

		assert!(entry.is_live_at(now));
		assert!(entry.is_live_at(now + Duration::minutes(58)));
		assert!(!entry.is_live_at(now + Duration::minutes(59)));
	}

	#[test]
	fn reserved_characters_are_rejected() {
		assert!(validate_key("zoho_sign_access_token").is_ok());
		assert!(matches!(validate_key(""), Err(CacheError::InvalidKey { .. })));
		assert!(matches!(validate_key("zoho:sign"), Err(CacheError::InvalidKey { .. })));
	}

	#[test]
	fn cache_error_can_be_serialized() {
		let payload = serde_json::to_string(&CacheError::Backend { message: "down".into() })
			.expect("CacheError should serialize to JSON.");
		let round_trip: CacheError =
			serde_json::from_str(&payload).expect("Serialized error should deserialize.");

		assert_eq!(round_trip, CacheError::Backend { message: "down".into() });
	}
}
