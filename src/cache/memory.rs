//! Thread-safe in-memory [`TokenCache`] implementation.

// self
use crate::{
	_prelude::*,
	cache::{CacheEntry, CacheFuture, TokenCache, validate_key},
};

type CacheMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

/// Process-local cache; clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Number of entries currently held, including expired ones not yet pruned.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when no entries are held.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns the raw entry for `key`, live or expired.
	pub fn entry(&self, key: &str) -> Option<CacheEntry> {
		self.0.read().get(key).cloned()
	}

	fn get_now(map: &CacheMap, key: &str, now: OffsetDateTime) -> Option<String> {
		{
			let guard = map.read();

			match guard.get(key) {
				Some(entry) if entry.is_live_at(now) => return Some(entry.value.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = map.write();

		if guard.get(key).is_some_and(|entry| !entry.is_live_at(now)) {
			guard.remove(key);
		}

		None
	}
}
impl TokenCache for MemoryCache {
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move {
			validate_key(key)?;

			Ok(Self::get_now(&map, key, OffsetDateTime::now_utc()))
		})
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			validate_key(key)?;

			let entry = CacheEntry::new(value, OffsetDateTime::now_utc(), ttl);

			map.write().insert(key.to_owned(), entry);

			Ok(())
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			validate_key(key)?;
			map.write().remove(key);

			Ok(())
		})
	}
}
